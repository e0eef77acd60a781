//! CLI commands implementation.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::{BatchError, BatchEvent, BatchRunner};
use crate::config::{OutputConfig, PreprocessConfig};
use crate::ocr::{RecognitionConfig, Recognizer, TesseractEngine};
use crate::output::ResultWriter;
use crate::pipeline::{DocumentPipeline, NormalizedDocument};

#[derive(Parser)]
#[command(name = "lexocr")]
#[command(about = "OCR pipeline for scanned legal documents")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize text in a scanned document or a directory of them
    Run {
        /// Image file or directory to process
        path: PathBuf,
        /// Skip image preprocessing (grayscale, contrast, sharpen)
        #[arg(long)]
        no_preprocess: bool,
        /// Save the preprocessed image alongside the text output
        #[arg(long)]
        save_preprocessed: bool,
        /// Language hint passed to the engine, primary first
        #[arg(long, default_value = "spa+eng")]
        lang: String,
        /// Directory for output artifacts
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
    },

    /// Check that the recognition engine is installed and usable
    Check,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            path,
            no_preprocess,
            save_preprocessed,
            lang,
            output_dir,
        } => cmd_run(&path, no_preprocess, save_preprocessed, &lang, output_dir),
        Commands::Check => cmd_check(),
    }
}

fn cmd_run(
    path: &Path,
    no_preprocess: bool,
    save_preprocessed: bool,
    lang: &str,
    output_dir: PathBuf,
) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("no such file or directory: {}", path.display());
    }

    let languages: Vec<String> = lang
        .split('+')
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect();
    if languages.is_empty() {
        anyhow::bail!("--lang must name at least one language, e.g. spa+eng");
    }

    let recognition = RecognitionConfig {
        languages,
        ..RecognitionConfig::default()
    };
    let preprocess = PreprocessConfig {
        enabled: !no_preprocess,
        save_preprocessed,
    };
    let writer = ResultWriter::new(OutputConfig {
        dir: output_dir,
        include_metadata: true,
    });
    let pipeline = DocumentPipeline::new(
        Box::new(TesseractEngine::new()),
        recognition,
        preprocess,
        writer.clone(),
    );

    if path.is_dir() {
        cmd_run_batch(path, pipeline, writer)
    } else {
        cmd_run_single(path, pipeline, writer)
    }
}

fn cmd_run_single(
    path: &Path,
    pipeline: DocumentPipeline,
    writer: ResultWriter,
) -> anyhow::Result<()> {
    println!("{} Processing {}", style("→").cyan(), path.display());

    let document = pipeline.run(path)?;

    println!("\n{}", document.text);
    print_document_stats(&document);

    let written = writer.persist(&document)?;
    for artifact in &written {
        println!("{} Saved {}", style("✓").green(), artifact.display());
    }

    Ok(())
}

fn cmd_run_batch(
    dir: &Path,
    pipeline: DocumentPipeline,
    writer: ResultWriter,
) -> anyhow::Result<()> {
    let output_dir = writer.dir().to_path_buf();
    let runner = BatchRunner::new(pipeline, writer);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );

    let result = runner.run_all_with(dir, |event| match event {
        BatchEvent::Started { total, path, .. } => {
            pb.set_length(total as u64);
            pb.set_message(truncate(&file_label(path), 36));
        }
        BatchEvent::Finished { path, outcome, .. } => {
            match outcome {
                Ok(document) => pb.println(format!(
                    "  {} {} ({:.2}s, {} words)",
                    style("✓").green(),
                    file_label(path),
                    document.elapsed.as_secs_f64(),
                    document.stats.words
                )),
                Err(e) => pb.println(format!("  {} {}", style("✗").red(), e)),
            }
            pb.inc(1);
        }
    });

    let report = match result {
        Ok(report) => report,
        Err(BatchError::NoInput { dir }) => {
            pb.finish_and_clear();
            println!(
                "{} No documents found in {}",
                style("!").yellow(),
                dir.display()
            );
            return Ok(());
        }
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };
    pb.finish_and_clear();

    println!(
        "\n{} Batch complete: {} succeeded, {} failed",
        style("✓").green(),
        report.succeeded(),
        report.failed()
    );
    println!(
        "  {:.2}s total, {:.2}s per document",
        report.total_elapsed.as_secs_f64(),
        report.average_elapsed().as_secs_f64()
    );
    println!(
        "  {}",
        style(format!("results in {}", output_dir.display())).dim()
    );

    Ok(())
}

/// Check that the recognition engine and its language data are installed.
fn cmd_check() -> anyhow::Result<()> {
    let engine = TesseractEngine::new();

    println!("\n{}", style("Recognition Engine Status").bold());
    println!("{}", "-".repeat(50));

    let status = if engine.is_available() {
        style("✓ available").green()
    } else {
        style("✗ not available").red()
    };
    println!("  {:<12} {}", engine.name(), status);
    println!("               {}", style(engine.availability_hint()).dim());

    if engine.is_available() {
        match engine.installed_languages() {
            Ok(languages) => {
                println!("\n{}", style("Language Data:").cyan());
                for lang in ["spa", "eng"] {
                    let status = if languages.iter().any(|l| l == lang) {
                        style("✓ installed").green()
                    } else {
                        style("✗ missing").red()
                    };
                    println!("  {:<12} {}", lang, status);
                }
            }
            Err(e) => println!("  {} {}", style("✗").red(), e),
        }
    }

    println!();
    Ok(())
}

fn print_document_stats(document: &NormalizedDocument) {
    println!(
        "\n{} Completed in {:.2}s",
        style("✓").green(),
        document.elapsed.as_secs_f64()
    );
    println!(
        "  {}x{} px, {}",
        document.width,
        document.height,
        format_bytes(document.source_bytes)
    );
    println!(
        "  {} lines, {} words, {} characters",
        document.stats.lines, document.stats.words, document.stats.chars
    );
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_000_000 {
        format!("{:.2} MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.2} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("nota.png", 36), "nota.png");
    }

    #[test]
    fn test_truncate_long_string() {
        let long = "a".repeat(50);
        let cut = truncate(&long, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_truncate_multibyte_names() {
        let name = "resolución_número_ochocientos_doce.png";
        let cut = truncate(name, 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 bytes");
        assert_eq!(format_bytes(2_048), "2.05 KB");
        assert_eq!(format_bytes(3_500_000), "3.50 MB");
    }
}
