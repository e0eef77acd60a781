//! Result persistence: plain text, Markdown report, preprocessed raster.
//!
//! All artifacts land in one configured output directory, named after the
//! input file's stem. The Markdown report wraps the text in a fixed
//! template carrying the source filename and a processing timestamp.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use image::GrayImage;

use crate::config::OutputConfig;
use crate::pipeline::{DocumentError, NormalizedDocument};

/// Writes pipeline output into the configured output directory.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    config: OutputConfig,
}

impl ResultWriter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Directory artifacts are written into.
    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Persist the normalized text as UTF-8, plus a Markdown report when
    /// metadata inclusion is enabled. Returns the paths written.
    pub fn persist(&self, document: &NormalizedDocument) -> Result<Vec<PathBuf>, DocumentError> {
        self.ensure_dir()?;
        let base = base_name(&document.source);
        let mut written = Vec::new();

        let txt_path = self.config.dir.join(format!("{base}.txt"));
        fs::write(&txt_path, &document.text).map_err(|source| DocumentError::Write {
            path: txt_path.clone(),
            source,
        })?;
        written.push(txt_path);

        if self.config.include_metadata {
            let md_path = self.config.dir.join(format!("{base}.md"));
            fs::write(&md_path, markdown_report(document)).map_err(|source| {
                DocumentError::Write {
                    path: md_path.clone(),
                    source,
                }
            })?;
            written.push(md_path);
        }

        Ok(written)
    }

    /// Persist the preprocessed raster beside the text output, suffixed
    /// so it cannot collide with the final artifacts.
    pub fn write_preprocessed(
        &self,
        source: &Path,
        image: &GrayImage,
    ) -> Result<PathBuf, DocumentError> {
        self.ensure_dir()?;
        let path = self
            .config
            .dir
            .join(format!("{}_preprocessed.png", base_name(source)));
        image.save(&path).map_err(|e| DocumentError::Write {
            path: path.clone(),
            source: io_from_image(e),
        })?;
        Ok(path)
    }

    fn ensure_dir(&self) -> Result<(), DocumentError> {
        fs::create_dir_all(&self.config.dir).map_err(|source| DocumentError::Write {
            path: self.config.dir.clone(),
            source,
        })
    }
}

fn base_name(source: &Path) -> String {
    source
        .file_stem()
        .unwrap_or_else(|| OsStr::new("document"))
        .to_string_lossy()
        .into_owned()
}

/// Fixed Markdown report template with source and processing timestamp.
fn markdown_report(document: &NormalizedDocument) -> String {
    let base = base_name(&document.source);
    let source_name = document
        .source
        .file_name()
        .unwrap_or_else(|| OsStr::new("document"))
        .to_string_lossy();
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    format!(
        "# Documento: {base}\n\n\
         **Fuente:** `{source_name}`  \n\
         **Fecha de procesamiento:** {timestamp}\n\n\
         ---\n\n\
         {text}\n",
        text = document.text
    )
}

/// PNG encode failures are almost always the underlying file I/O; unwrap
/// that layer when present.
fn io_from_image(err: image::ImageError) -> std::io::Error {
    match err {
        image::ImageError::IoError(e) => e,
        other => std::io::Error::other(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::text_stats;
    use image::Luma;
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample_document(source: &str) -> NormalizedDocument {
        let text = "VISTO el expediente\n\nSE RESUELVE".to_string();
        NormalizedDocument {
            source: PathBuf::from(source),
            stats: text_stats(&text),
            text,
            width: 100,
            height: 60,
            source_bytes: 1024,
            elapsed: Duration::from_millis(250),
        }
    }

    #[test]
    fn test_persist_writes_text_and_markdown() {
        let dir = TempDir::new().unwrap();
        let writer = ResultWriter::new(OutputConfig {
            dir: dir.path().to_path_buf(),
            include_metadata: true,
        });

        let written = writer.persist(&sample_document("input/nota.png")).unwrap();
        assert_eq!(written.len(), 2);

        let txt = fs::read_to_string(dir.path().join("nota.txt")).unwrap();
        assert_eq!(txt, "VISTO el expediente\n\nSE RESUELVE");

        let md = fs::read_to_string(dir.path().join("nota.md")).unwrap();
        assert!(md.starts_with("# Documento: nota\n"));
        assert!(md.contains("**Fuente:** `nota.png`"));
        assert!(md.contains("**Fecha de procesamiento:** "));
        assert!(md.ends_with("---\n\nVISTO el expediente\n\nSE RESUELVE\n"));
    }

    #[test]
    fn test_persist_without_metadata_skips_markdown() {
        let dir = TempDir::new().unwrap();
        let writer = ResultWriter::new(OutputConfig {
            dir: dir.path().to_path_buf(),
            include_metadata: false,
        });

        let written = writer.persist(&sample_document("nota.jpg")).unwrap();
        assert_eq!(written.len(), 1);
        assert!(dir.path().join("nota.txt").exists());
        assert!(!dir.path().join("nota.md").exists());
    }

    #[test]
    fn test_persist_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("results").join("batch");
        let writer = ResultWriter::new(OutputConfig {
            dir: nested.clone(),
            include_metadata: true,
        });

        writer.persist(&sample_document("acta.png")).unwrap();
        assert!(nested.join("acta.txt").exists());
    }

    #[test]
    fn test_write_preprocessed_names_artifact_after_stem() {
        let dir = TempDir::new().unwrap();
        let writer = ResultWriter::new(OutputConfig {
            dir: dir.path().to_path_buf(),
            include_metadata: true,
        });

        let raster = GrayImage::from_pixel(4, 2, Luma([127]));
        let saved = writer
            .write_preprocessed(Path::new("scans/resolución.tiff"), &raster)
            .unwrap();

        assert_eq!(saved, dir.path().join("resolución_preprocessed.png"));
        let reloaded = image::open(&saved).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (4, 2));
    }
}
