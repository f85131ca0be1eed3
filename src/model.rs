use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Extension CellProfiler uses for its measurements database.
pub const SQLITE_EXT: &str = "sqlite";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub cellprofiler_bin: String,
    pub run_id: String,
    #[serde(default)]
    pub comments: Option<String>,
    pub pipeline_path: PathBuf,
    pub output_dir: PathBuf,
    pub loaddata_path: PathBuf,
    pub analysis_run: bool,
    /// Target name for the measurements database; only meaningful for analysis runs.
    #[serde(default)]
    pub sqlite_name: Option<String>,
    /// Base name the pipeline hardcodes for the database it writes.
    pub hardcoded_sqlite_name: String,
}

/// Structured info events emitted during a run and consumed by the CLI layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InfoEvent {
    // CLI messages generated outside the engine.
    Message(String),
    ToolExit { code: Option<i32> },
    ToolSpawnFailed { error: String },
    Renamed { to: PathBuf },
    SourceMissing { expected: PathBuf },
}

impl InfoEvent {
    /// Render a human-readable message for the CLI layer.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Message(msg) => msg.clone(),
            InfoEvent::ToolExit { code: Some(code) } => {
                format!("CellProfiler exited with status {}", code)
            }
            InfoEvent::ToolExit { code: None } => {
                "CellProfiler was terminated by a signal".to_string()
            }
            InfoEvent::ToolSpawnFailed { error } => {
                format!("Failed to launch CellProfiler: {}", error)
            }
            InfoEvent::Renamed { to } => {
                format!(
                    "Renamed measurements database to {}",
                    to.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| to.display().to_string())
                )
            }
            InfoEvent::SourceMissing { expected } => {
                format!(
                    "{} was not found in the output directory; either the pipeline \
                     did not run properly or the file was already renamed",
                    expected.display()
                )
            }
        }
    }
}

/// Outcome of the post-run rename step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenameOutcome {
    Renamed { to: PathBuf },
    SourceMissing { expected: PathBuf },
}

/// Record of a single batch run, serialized for auto-save and exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    #[serde(default)]
    pub timestamp_utc: String,
    pub run_id: String,
    #[serde(default)]
    pub comments: Option<String>,
    /// The composed command line, exactly as invoked.
    pub command_line: String,
    pub pipeline_path: PathBuf,
    pub output_dir: PathBuf,
    pub loaddata_path: PathBuf,
    pub analysis_run: bool,
    /// Exit code reported by the tool. Informational only; never drives
    /// control flow (a failed run and a successful run look the same to
    /// the guard/rename logic).
    #[serde(default)]
    pub tool_exit_code: Option<i32>,
    #[serde(default)]
    pub rename: Option<RenameOutcome>,
}
