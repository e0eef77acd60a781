//! Whitespace normalization for raw recognition output.
//!
//! OCR engines emit ragged whitespace: trailing spaces on every line, runs
//! of blank lines between paragraphs, multi-space gaps where glyph spacing
//! was guessed. Normalization reduces this to a canonical form while
//! keeping intentional paragraph breaks.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of two or more spaces. Tabs and other whitespace are left alone.
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Runs of three or more newlines, collapsed to one paragraph break.
static NEWLINE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalize raw OCR text into canonical whitespace form.
///
/// Every line is trimmed, interior space runs collapse to a single space,
/// and runs of blank lines collapse to one blank line. The result carries
/// no leading or trailing whitespace. Applying `normalize` to its own
/// output returns it unchanged.
pub fn normalize(raw: &str) -> String {
    // Trim lines before collapsing newlines, so whitespace-only lines
    // cannot survive as hidden blank runs.
    let trimmed = raw.split('\n').map(str::trim).collect::<Vec<_>>().join("\n");

    let collapsed = SPACE_RUNS.replace_all(&trimmed, " ");
    let collapsed = NEWLINE_RUNS.replace_all(&collapsed, "\n\n");

    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_space_runs() {
        assert_eq!(normalize("Hola   mundo"), "Hola mundo");
    }

    #[test]
    fn test_leaves_tabs_alone() {
        assert_eq!(normalize("col1\t\tcol2"), "col1\t\tcol2");
    }

    #[test]
    fn test_collapses_blank_line_runs() {
        assert_eq!(normalize("uno\n\n\n\ndos"), "uno\n\ndos");
    }

    #[test]
    fn test_keeps_single_paragraph_break() {
        assert_eq!(normalize("uno\n\ndos"), "uno\n\ndos");
    }

    #[test]
    fn test_trims_every_line() {
        assert_eq!(normalize("  uno  \n   dos   "), "uno\ndos");
    }

    #[test]
    fn test_whitespace_only_lines_become_paragraph_breaks() {
        assert_eq!(normalize("uno\n \n \n \ndos"), "uno\n\ndos");
    }

    #[test]
    fn test_concrete_scanned_note() {
        assert_eq!(normalize("Hola   mundo\n\n\n\nAdiós"), "Hola mundo\n\nAdiós");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_whitespace_only_input() {
        assert_eq!(normalize(" \n\t\n  \n"), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "Hola   mundo\n\n\n\nAdiós",
            "  VISTO:  el expediente   \n\n\n\n\n  y CONSIDERANDO  ",
            "a\n \n \n \nb",
            "\t\n\t\n\t\nfin",
            "sin cambios",
        ];
        for raw in samples {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not a fixed point for {:?}", raw);
        }
    }
}
