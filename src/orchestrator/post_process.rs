//! Post-run processing utilities.
//!
//! Handles the duplicate-run guard and the rename of the fixed-named
//! measurements database after an analysis run completes.

use crate::model::{InfoEvent, RenameOutcome, SQLITE_EXT};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use std::sync::mpsc;

/// Fail if the output directory already holds a file whose name starts with
/// the target SQLite name. CellProfiler pipelines hardcode the database
/// name, so a file carrying the target name means this plate was already
/// analyzed and renamed by a previous run.
pub(crate) fn ensure_not_already_analyzed(output_dir: &Path, sqlite_name: &str) -> Result<()> {
    let entries = fs::read_dir(output_dir)
        .with_context(|| format!("scan output directory {}", output_dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in {}", output_dir.display()))?;
        let file_name = entry.file_name();
        if file_name.to_string_lossy().starts_with(sqlite_name) {
            bail!(
                "a file starting with {} already exists in {}; this plate was \
                 probably already analyzed",
                sqlite_name,
                output_dir.display()
            );
        }
    }
    Ok(())
}

/// Rename `<hardcoded>.sqlite` in the output directory to `<name>.sqlite`.
///
/// A missing source file is reported as an event and a `SourceMissing`
/// outcome, not an error: it means the pipeline did not run properly or the
/// file was already renamed, and either way execution continues.
pub(crate) fn rename_sqlite_file(
    output_dir: &Path,
    name: &str,
    hardcoded_sqlite_name: &str,
    events: &mpsc::Sender<InfoEvent>,
) -> Result<RenameOutcome> {
    let source = output_dir.join(format!("{}.{}", hardcoded_sqlite_name, SQLITE_EXT));
    let target = output_dir.join(format!("{}.{}", name, SQLITE_EXT));

    match fs::rename(&source, &target) {
        Ok(()) => {
            let _ = events.send(InfoEvent::Renamed { to: target.clone() });
            Ok(RenameOutcome::Renamed { to: target })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let _ = events.send(InfoEvent::SourceMissing {
                expected: source.clone(),
            });
            Ok(RenameOutcome::SourceMissing { expected: source })
        }
        Err(e) => Err(e).with_context(|| {
            format!("rename {} to {}", source.display(), target.display())
        }),
    }
}
