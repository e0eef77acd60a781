//! Tesseract recognition engine.
//!
//! Invokes the system `tesseract` binary on a temporary PNG rendering of
//! the in-memory raster. This is the traditional, widely-available OCR
//! option and the only engine this tool ships.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use image::{DynamicImage, ImageFormat};
use tempfile::TempDir;

use super::engine::{EngineError, RecognitionConfig, Recognizer};

const TESSERACT_BINARY: &str = "tesseract";

/// Recognition engine backed by the system Tesseract install.
#[derive(Debug, Default)]
pub struct TesseractEngine;

impl TesseractEngine {
    pub fn new() -> Self {
        Self
    }

    /// Languages the local Tesseract install can recognize.
    pub fn installed_languages(&self) -> Result<Vec<String>, EngineError> {
        let output = Command::new(TESSERACT_BINARY).arg("--list-langs").output();

        match output {
            Ok(output) if output.status.success() => Ok(parse_language_listing(
                &String::from_utf8_lossy(&output.stdout),
            )),
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(EngineError::RecognitionFailed(format!(
                    "tesseract --list-langs failed: {}",
                    stderr.trim()
                )))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_installed()),
            Err(e) => Err(EngineError::Io(e)),
        }
    }

    /// Run Tesseract on an image file, reading text from stdout.
    fn run_tesseract(
        &self,
        image_path: &Path,
        config: &RecognitionConfig,
    ) -> Result<String, EngineError> {
        let output = Command::new(TESSERACT_BINARY)
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &config.language_arg()])
            .args(["--oem", config.engine_mode.as_flag()])
            .args(["--psm", config.segmentation.as_flag()])
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(EngineError::RecognitionFailed(format!(
                        "tesseract failed: {}",
                        stderr.trim()
                    )))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_installed()),
            Err(e) => Err(EngineError::Io(e)),
        }
    }
}

impl Recognizer for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        which::which(TESSERACT_BINARY).is_ok()
    }

    fn availability_hint(&self) -> String {
        match which::which(TESSERACT_BINARY) {
            Ok(path) => format!("found at {}", path.display()),
            Err(_) => {
                "Tesseract not installed. Install with: apt install tesseract-ocr tesseract-ocr-spa"
                    .to_string()
            }
        }
    }

    fn recognize(
        &self,
        image: &DynamicImage,
        config: &RecognitionConfig,
    ) -> Result<String, EngineError> {
        // Tesseract reads from a file, so render the raster to a scratch PNG.
        let scratch = TempDir::new()?;
        let image_path = scratch.path().join("document.png");
        image.save_with_format(&image_path, ImageFormat::Png)?;

        self.run_tesseract(&image_path, config)
    }
}

fn not_installed() -> EngineError {
    EngineError::EngineMissing(
        "tesseract not found (install tesseract-ocr and the spa/eng language packs)".to_string(),
    )
}

/// Parse `tesseract --list-langs` output: a header line followed by one
/// language code per line.
fn parse_language_listing(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
