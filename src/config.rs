//! Runtime configuration for the OCR pipeline.
//!
//! Configuration is built once by the CLI layer and passed by value into
//! the core. There is no global state and no environment-driven setup.

use std::path::PathBuf;

/// Controls the image preprocessing pass.
#[derive(Debug, Clone, Copy)]
pub struct PreprocessConfig {
    /// Run the grayscale/contrast/sharpen pass before recognition.
    pub enabled: bool,
    /// Persist the preprocessed raster next to the text output for
    /// inspection. Only applies while the pass itself is enabled.
    pub save_preprocessed: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            save_preprocessed: false,
        }
    }
}

/// Where and how results are written.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Directory for output artifacts, created on first write.
    pub dir: PathBuf,
    /// Also write a Markdown report with source and timestamp metadata.
    pub include_metadata: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            include_metadata: true,
        }
    }
}
