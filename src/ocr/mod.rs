//! Text recognition boundary.
//!
//! The pipeline talks to the external recognition engine through the
//! [`Recognizer`] trait, so tests can inject a double that returns canned
//! text. Tesseract via the system binary is the engine this tool ships.

mod engine;
mod tesseract;

pub use engine::{EngineError, EngineMode, PageSegmentation, RecognitionConfig, Recognizer};
pub use tesseract::TesseractEngine;
