//! Single-document pipeline: decode, preprocess, recognize, normalize.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use image::DynamicImage;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::PreprocessConfig;
use crate::normalize::normalize;
use crate::ocr::{EngineError, RecognitionConfig, Recognizer};
use crate::output::ResultWriter;
use crate::preprocess::preprocess;

/// A per-document failure. Batch runs record these and continue; the
/// single-document path aborts the invocation with one.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("recognition failed on {}: {source}", path.display())]
    Engine {
        path: PathBuf,
        #[source]
        source: EngineError,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Line, word, and character counts for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStats {
    /// Lines containing at least one non-whitespace character.
    pub lines: usize,
    /// Whitespace-separated words.
    pub words: usize,
    /// Unicode scalar values, newlines included.
    pub chars: usize,
}

/// Compute reporting statistics over normalized text.
pub fn text_stats(text: &str) -> TextStats {
    TextStats {
        lines: text.lines().filter(|line| !line.trim().is_empty()).count(),
        words: text.split_whitespace().count(),
        chars: text.chars().count(),
    }
}

/// The cleaned text for one document plus reporting statistics.
#[derive(Debug, Clone)]
pub struct NormalizedDocument {
    /// Input file the text came from.
    pub source: PathBuf,
    /// Normalized recognition output.
    pub text: String,
    pub stats: TextStats,
    /// Input raster dimensions in pixels.
    pub width: u32,
    pub height: u32,
    /// Input file size in bytes.
    pub source_bytes: u64,
    /// Wall-clock time for the full pipeline run.
    pub elapsed: Duration,
}

/// Composes preprocessing, recognition, and normalization for one
/// document at a time.
///
/// The recognizer is injected behind the [`Recognizer`] trait; all other
/// collaborators are plain values. Every intermediate raster is owned by
/// one `run` call and dropped before it returns.
pub struct DocumentPipeline {
    recognizer: Box<dyn Recognizer>,
    recognition: RecognitionConfig,
    preprocess: PreprocessConfig,
    writer: ResultWriter,
}

impl DocumentPipeline {
    pub fn new(
        recognizer: Box<dyn Recognizer>,
        recognition: RecognitionConfig,
        preprocess: PreprocessConfig,
        writer: ResultWriter,
    ) -> Self {
        Self {
            recognizer,
            recognition,
            preprocess,
            writer,
        }
    }

    /// Run the full pipeline on one document.
    ///
    /// A failed save of the preprocessed diagnostic image is logged and
    /// ignored; any other failure aborts this document. No retries.
    pub fn run(&self, path: &Path) -> Result<NormalizedDocument, DocumentError> {
        let started = Instant::now();

        let image = image::open(path).map_err(|source| DocumentError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let (width, height) = (image.width(), image.height());
        let source_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        debug!(
            "decoded {} ({}x{} px, {} bytes)",
            path.display(),
            width,
            height,
            source_bytes
        );

        let recognized = if self.preprocess.enabled {
            let prepared = preprocess(&image);
            if self.preprocess.save_preprocessed {
                match self.writer.write_preprocessed(path, &prepared) {
                    Ok(saved) => debug!("saved preprocessed image to {}", saved.display()),
                    Err(e) => warn!(
                        "could not save preprocessed image for {}: {}",
                        path.display(),
                        e
                    ),
                }
            }
            self.recognizer
                .recognize(&DynamicImage::ImageLuma8(prepared), &self.recognition)
        } else {
            self.recognizer.recognize(&image, &self.recognition)
        };
        let raw = recognized.map_err(|source| DocumentError::Engine {
            path: path.to_path_buf(),
            source,
        })?;

        let text = normalize(&raw);
        let stats = text_stats(&text);

        Ok(NormalizedDocument {
            source: path.to_path_buf(),
            text,
            stats,
            width,
            height,
            source_bytes,
            elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_on_two_line_text() {
        let stats = text_stats("one two\nthree");
        assert_eq!(stats.words, 3);
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.chars, "one two\nthree".len());
    }

    #[test]
    fn test_stats_skip_blank_lines() {
        let stats = text_stats("uno\n\ndos");
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.words, 2);
    }

    #[test]
    fn test_stats_count_unicode_scalars() {
        // "Adiós" is 5 characters even though ó is two bytes.
        let stats = text_stats("Adiós");
        assert_eq!(stats.chars, 5);
        assert_eq!(stats.words, 1);
        assert_eq!(stats.lines, 1);
    }

    #[test]
    fn test_stats_on_empty_text() {
        let stats = text_stats("");
        assert_eq!(
            stats,
            TextStats {
                lines: 0,
                words: 0,
                chars: 0
            }
        );
    }
}
