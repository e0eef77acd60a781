//! Recognition engine abstraction and configuration.

use image::DynamicImage;
use thiserror::Error;

/// Errors from the external recognition engine boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine binary is not installed or not on PATH.
    #[error("{0}")]
    EngineMissing(String),
    /// The engine ran but failed, e.g. missing language data or an input
    /// it cannot segment.
    #[error("{0}")]
    RecognitionFailed(String),
    /// The raster could not be handed to the engine.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Page layout assumption passed to the engine.
///
/// Legal notices are dense single-block paragraphs, so the pipeline always
/// requests uniform-block segmentation instead of automatic layout
/// analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSegmentation {
    /// Assume a single uniform block of text.
    #[default]
    SingleBlock,
}

impl PageSegmentation {
    /// Value for Tesseract's `--psm` flag.
    pub fn as_flag(&self) -> &'static str {
        match self {
            PageSegmentation::SingleBlock => "6",
        }
    }
}

/// Which internal recognition algorithms the engine combines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineMode {
    /// Neural (LSTM) plus legacy recognition, the most accurate pairing.
    #[default]
    Combined,
}

impl EngineMode {
    /// Value for Tesseract's `--oem` flag.
    pub fn as_flag(&self) -> &'static str {
        match self {
            EngineMode::Combined => "3",
        }
    }
}

/// Engine configuration for one recognition call.
///
/// The language hint is an ordered list tried primary-first. Segmentation
/// and engine mode are fixed policy for this tool and always passed to the
/// engine unchanged.
#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    pub languages: Vec<String>,
    pub segmentation: PageSegmentation,
    pub engine_mode: EngineMode,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            languages: vec!["spa".to_string(), "eng".to_string()],
            segmentation: PageSegmentation::SingleBlock,
            engine_mode: EngineMode::Combined,
        }
    }
}

impl RecognitionConfig {
    /// Language hint in the engine's `primary+secondary` argument form.
    pub fn language_arg(&self) -> String {
        self.languages.join("+")
    }
}

/// A text recognition engine.
///
/// The sole boundary to the external engine; nothing else in the pipeline
/// shells out or links against recognition code.
pub trait Recognizer {
    /// Short engine name for logs and status output.
    fn name(&self) -> &str;

    /// Whether the engine can run on this machine.
    fn is_available(&self) -> bool;

    /// Human-readable install guidance when the engine is unavailable.
    fn availability_hint(&self) -> String;

    /// Recognize text in one raster image, returning the engine's raw
    /// output.
    fn recognize(
        &self,
        image: &DynamicImage,
        config: &RecognitionConfig,
    ) -> Result<String, EngineError>;
}
