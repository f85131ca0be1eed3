//! Run lifecycle controller.
//!
//! Owns the analysis-run state machine: check for a duplicate run, invoke
//! the tool, then rename the measurements database or log that it is
//! missing. Correction runs skip the guard and the rename.

use super::post_process;
use crate::engine::ToolEngine;
use crate::model::{InfoEvent, RunConfig, RunRecord};
use anyhow::{Context, Result};
use std::sync::mpsc::Sender;

/// Drive one batch run to completion and build its record.
///
/// For analysis runs the duplicate guard fires before any tool invocation;
/// a guard hit is a hard error and the tool never runs. The rename step is
/// best effort and cannot fail the run on a missing source file.
pub(crate) fn run_batch(cfg: &RunConfig, events: &Sender<InfoEvent>) -> Result<RunRecord> {
    let sqlite_name = if cfg.analysis_run {
        let name = cfg
            .sqlite_name
            .as_deref()
            .context("an analysis run requires a SQLite name")?;
        post_process::ensure_not_already_analyzed(&cfg.output_dir, name)?;
        Some(name)
    } else {
        None
    };

    let engine = ToolEngine::new(cfg.clone());
    let invocation = engine.run(events);

    let rename = match sqlite_name {
        Some(name) => Some(post_process::rename_sqlite_file(
            &cfg.output_dir,
            name,
            &cfg.hardcoded_sqlite_name,
            events,
        )?),
        None => None,
    };

    Ok(RunRecord {
        timestamp_utc: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "now".into()),
        run_id: cfg.run_id.clone(),
        comments: cfg.comments.clone(),
        command_line: invocation.command_line,
        pipeline_path: cfg.pipeline_path.clone(),
        output_dir: cfg.output_dir.clone(),
        loaddata_path: cfg.loaddata_path.clone(),
        analysis_run: cfg.analysis_run,
        tool_exit_code: invocation.exit_code,
        rename,
    })
}
