//! Run record persistence.
//!
//! Auto-saved records go to the per-user data directory; exports go to a
//! caller-specified path.

use crate::model::RunRecord;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "cellprofiler-batch-cli";

fn runs_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("no user data directory available")?;
    Ok(base.join(APP_DIR).join("runs"))
}

/// Save a run record to the auto-save location and return its path.
pub fn save_run(record: &RunRecord) -> Result<PathBuf> {
    let dir = runs_dir()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    let file_name = format!(
        "run-{}-{}.json",
        record.timestamp_utc.replace(':', "-").replace('T', "_"),
        &record.run_id[..8.min(record.run_id.len())]
    );
    let path = dir.join(file_name);
    export_json(&path, record)?;
    Ok(path)
}

/// Write a run record as pretty JSON to an explicit path.
pub fn export_json(path: &Path, record: &RunRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
