//! lexocr - OCR pipeline for scanned legal documents.
//!
//! Core library: a deterministic image preprocessing pass, a
//! Tesseract-backed recognition boundary, whitespace normalization, and
//! batch orchestration with per-document failure isolation.

pub mod batch;
pub mod cli;
pub mod config;
pub mod normalize;
pub mod ocr;
pub mod output;
pub mod pipeline;
pub mod preprocess;
