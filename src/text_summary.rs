//! Text summary builder for CLI output.
//!
//! Formats human-readable lines describing a completed run for text mode.

use crate::model::{RenameOutcome, RunRecord};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build a text summary from a completed run record.
pub(crate) fn build_text_summary(record: &RunRecord) -> TextSummary {
    let mut lines = Vec::new();

    lines.push(format!("Command: {}", record.command_line));
    lines.push(format!(
        "Mode: {}",
        if record.analysis_run {
            "analysis"
        } else {
            "illumination correction"
        }
    ));
    match record.tool_exit_code {
        Some(code) => lines.push(format!("Tool exit: {}", code)),
        None => lines.push("Tool exit: unknown".to_string()),
    }
    match record.rename.as_ref() {
        Some(RenameOutcome::Renamed { to }) => {
            lines.push(format!("Renamed: {}", to.display()));
        }
        Some(RenameOutcome::SourceMissing { expected }) => {
            lines.push(format!("Rename skipped: {} was missing", expected.display()));
        }
        None => {}
    }
    if let Some(comments) = record.comments.as_deref() {
        if !comments.trim().is_empty() {
            lines.push(format!("Comments: {}", comments));
        }
    }

    TextSummary { lines }
}
