//! Human-readable rendering of command results.

use crate::encoding::{BatchReport, BatchResult, NormalizeOutcome};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::Path;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn status_cell(result: &BatchResult) -> (String, String) {
    match result {
        BatchResult::Outcome(NormalizeOutcome::Rewritten { from }) => {
            ("rewritten".to_string(), format!("from {}", from))
        }
        BatchResult::Outcome(NormalizeOutcome::AlreadyNormalized) => {
            ("unchanged".to_string(), String::new())
        }
        BatchResult::Outcome(NormalizeOutcome::Rejected { encoding, reason }) => {
            ("rejected".to_string(), format!("{}: {}", encoding, reason))
        }
        BatchResult::Failed { error, .. } => ("failed".to_string(), error.clone()),
    }
}

/// Format a normalization batch as a table plus totals.
///
/// Paths are shown relative to `base` when possible.
pub fn format_batch_report_text(report: &BatchReport, base: &Path) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Encoding repair")));

    if report.entries.is_empty() {
        out.push_str("  No .json files found\n");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["File", "Status", "Detail"]);
    for entry in &report.entries {
        let shown = entry.path.strip_prefix(base).unwrap_or(&entry.path);
        let (status, detail) = status_cell(&entry.result);
        table.add_row(vec![shown.display().to_string(), status, detail]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!(
        "  Total: {}  Rewritten: {}  Unchanged: {}  Rejected: {}  Failed: {}\n",
        report.total(),
        report.rewritten,
        report.unchanged,
        report.rejected,
        report.failed
    ));
    out
}
