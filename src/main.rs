//! lexocr - OCR pipeline for scanned legal documents.
//!
//! Converts scanned notes and resolutions into normalized plain text
//! using the system Tesseract engine, with image preprocessing tuned for
//! low-quality document scans.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lexocr::cli;

fn main() -> anyhow::Result<()> {
    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "lexocr=info"
    } else {
        "lexocr=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run()
}
