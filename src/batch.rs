//! Batch orchestration over a directory of scanned documents.
//!
//! Every discovered file is processed independently: one document's
//! failure is recorded in its entry and the batch moves on. Progress is
//! surfaced to callers through a [`BatchEvent`] observer.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::output::ResultWriter;
use crate::pipeline::{DocumentError, DocumentPipeline, NormalizedDocument};

/// File extensions treated as scanned-document input (case-sensitive).
const DOCUMENT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "bmp"];

/// Failure to even start a batch. Per-document failures never surface
/// here; they are recorded in the report's entries.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The scan found no processable documents. Advisory: callers report
    /// it and exit cleanly.
    #[error("no documents found in {}", dir.display())]
    NoInput { dir: PathBuf },
    /// The source directory could not be read at all.
    #[error("cannot read {}: {source}", dir.display())]
    Scan {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Scan a directory (non-recursive) for processable documents.
///
/// Extensions are matched case-sensitively. Results are name-sorted so a
/// batch runs in a stable order.
pub fn discover_documents(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext));
        if matches {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Progress notifications emitted while a batch runs.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    /// A document is about to be processed. `index` is 1-based.
    Started {
        index: usize,
        total: usize,
        path: &'a Path,
    },
    /// A document finished, successfully or not.
    Finished {
        index: usize,
        total: usize,
        path: &'a Path,
        outcome: &'a Result<NormalizedDocument, DocumentError>,
    },
}

/// Outcome for one document in a batch.
#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub result: Result<NormalizedDocument, DocumentError>,
}

/// Aggregated outcome of one batch run.
///
/// Entries are in discovery order and the entry count always equals the
/// discovered-file count, failures included.
#[derive(Debug)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    /// Wall-clock span of the whole run.
    pub total_elapsed: Duration,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }

    /// Average wall-clock time per discovered document, failures included
    /// in the denominator.
    pub fn average_elapsed(&self) -> Duration {
        if self.entries.is_empty() {
            Duration::ZERO
        } else {
            self.total_elapsed / self.entries.len() as u32
        }
    }
}

/// Applies the document pipeline to every file discovered in a directory,
/// persisting each success before moving to the next document.
pub struct BatchRunner {
    pipeline: DocumentPipeline,
    writer: ResultWriter,
}

impl BatchRunner {
    pub fn new(pipeline: DocumentPipeline, writer: ResultWriter) -> Self {
        Self { pipeline, writer }
    }

    /// Process every document under `dir`.
    pub fn run_all(&self, dir: &Path) -> Result<BatchReport, BatchError> {
        self.run_all_with(dir, |_| {})
    }

    /// Like `run_all`, with an observer called before and after each
    /// document. The CLI uses this to drive its progress bar.
    pub fn run_all_with<F>(&self, dir: &Path, mut observer: F) -> Result<BatchReport, BatchError>
    where
        F: FnMut(BatchEvent<'_>),
    {
        let documents = discover_documents(dir).map_err(|source| BatchError::Scan {
            dir: dir.to_path_buf(),
            source,
        })?;
        if documents.is_empty() {
            return Err(BatchError::NoInput {
                dir: dir.to_path_buf(),
            });
        }

        info!("processing {} documents from {}", documents.len(), dir.display());
        let started = Instant::now();
        let total = documents.len();
        let mut entries = Vec::with_capacity(total);

        for (index, path) in documents.into_iter().enumerate() {
            let index = index + 1;
            observer(BatchEvent::Started {
                index,
                total,
                path: &path,
            });

            // A write failure counts against the document, same as a
            // decode or recognition failure.
            let result = self.pipeline.run(&path).and_then(|document| {
                self.writer.persist(&document)?;
                Ok(document)
            });

            if let Err(e) = &result {
                warn!("document failed: {}", e);
            }

            observer(BatchEvent::Finished {
                index,
                total,
                path: &path,
                outcome: &result,
            });
            entries.push(BatchEntry { path, result });
        }

        Ok(BatchReport {
            entries,
            total_elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_discovery_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.jpg");
        touch(dir.path(), "a.png");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "scan.jpeg");
        touch(dir.path(), "old.tiff");
        touch(dir.path(), "fax.bmp");

        let found = discover_documents(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.png", "b.jpg", "fax.bmp", "old.tiff", "scan.jpeg"]);
    }

    #[test]
    fn test_discovery_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "upper.PNG");
        touch(dir.path(), "lower.png");

        let found = discover_documents(dir.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("lower.png"));
    }

    #[test]
    fn test_discovery_does_not_recurse() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested"), "inner.png");
        touch(dir.path(), "outer.png");

        let found = discover_documents(dir.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("outer.png"));
    }

    #[test]
    fn test_discovery_of_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(discover_documents(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_report_counts_and_average() {
        let ok_text = "texto".to_string();
        let entries = vec![
            BatchEntry {
                path: PathBuf::from("a.png"),
                result: Ok(crate::pipeline::NormalizedDocument {
                    source: PathBuf::from("a.png"),
                    stats: crate::pipeline::text_stats(&ok_text),
                    text: ok_text,
                    width: 1,
                    height: 1,
                    source_bytes: 10,
                    elapsed: Duration::from_millis(5),
                }),
            },
            BatchEntry {
                path: PathBuf::from("b.png"),
                result: Err(DocumentError::Write {
                    path: PathBuf::from("b.txt"),
                    source: io::Error::other("disk full"),
                }),
            },
        ];
        let report = BatchReport {
            entries,
            total_elapsed: Duration::from_secs(3),
        };

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.average_elapsed(), Duration::from_millis(1500));
    }

    #[test]
    fn test_empty_report_average_is_zero() {
        let report = BatchReport {
            entries: Vec::new(),
            total_elapsed: Duration::ZERO,
        };
        assert_eq!(report.average_elapsed(), Duration::ZERO);
    }
}
