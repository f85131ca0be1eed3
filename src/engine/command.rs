//! Headless command-line construction for the CellProfiler binary.

use crate::model::RunConfig;

/// Compose the argv for a headless batch run: `-c` (no GUI), `-r` (run the
/// pipeline on startup), then the pipeline file, output directory, and
/// LoadData CSV.
pub fn build_command_line(cfg: &RunConfig) -> Vec<String> {
    vec![
        cfg.cellprofiler_bin.clone(),
        "-c".to_string(),
        "-r".to_string(),
        "-p".to_string(),
        cfg.pipeline_path.display().to_string(),
        "-o".to_string(),
        cfg.output_dir.display().to_string(),
        "--data-file".to_string(),
        cfg.loaddata_path.display().to_string(),
    ]
}

/// Render an argv as a single command-line string for logging and run records.
pub fn render_command_line(argv: &[String]) -> String {
    argv.join(" ")
}
