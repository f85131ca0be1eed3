use crate::model::{InfoEvent, RunConfig};
use anyhow::Result;
use clap::Parser;
use rand::RngCore;
use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;

/// Spawn a blocking writer so event messages reach stderr line by line
/// while the tool invocation holds the main thread.
fn spawn_event_writer() -> (mpsc::Sender<InfoEvent>, std::thread::JoinHandle<()>) {
    let (tx, rx) = mpsc::channel::<InfoEvent>();
    let handle = std::thread::spawn(move || {
        let stderr = std::io::stderr();
        let mut err = std::io::LineWriter::new(stderr.lock());

        for ev in rx {
            let _ = writeln!(err, "{}", ev.to_message());
        }

        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "cellprofiler-batch-cli",
    version,
    about = "Headless CellProfiler batch runs with SQLite output renaming"
)]
pub struct Cli {
    /// Path to the CellProfiler .cppipe pipeline file
    #[arg(long)]
    pub pipeline: PathBuf,

    /// Output directory the pipeline writes into
    #[arg(long)]
    pub output: PathBuf,

    /// Path to the LoadData CSV enumerating images for the batch
    #[arg(long)]
    pub loaddata: PathBuf,

    /// Run as an analysis pipeline: guard against duplicate runs and rename
    /// the SQLite measurements database afterwards
    #[arg(long)]
    pub analysis: bool,

    /// New name for the SQLite measurements database (analysis runs only)
    #[arg(long)]
    pub sqlite_name: Option<String>,

    /// Base name the pipeline hardcodes for its SQLite output
    #[arg(long, default_value = "Plate1")]
    pub hardcoded_sqlite_name: String,

    /// CellProfiler binary to invoke
    #[arg(long, default_value = "cellprofiler")]
    pub cellprofiler_bin: String,

    /// Print the run record as JSON instead of a text summary
    #[arg(long)]
    pub json: bool,

    /// Export the run record as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Use --auto-save true or --auto-save false to override
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub auto_save: bool,

    /// Attach custom comments to this run
    #[arg(long)]
    pub comments: Option<String>,
}

pub fn run(args: Cli) -> Result<()> {
    // Validate the mode/name pairing up front
    if args.analysis && args.sqlite_name.is_none() {
        return Err(anyhow::anyhow!(
            "--sqlite-name is required with --analysis. Use --analysis --sqlite-name <NAME> together."
        ));
    }
    if !args.analysis && args.sqlite_name.is_some() {
        return Err(anyhow::anyhow!(
            "--sqlite-name can only be used with --analysis."
        ));
    }

    let cfg = build_config(&args);
    let (evt_tx, evt_handle) = spawn_event_writer();

    let outcome = crate::orchestrator::run_batch(&cfg, &evt_tx);

    // Close the channel and let the writer drain before printing results.
    drop(evt_tx);
    let _ = evt_handle.join();
    let record = outcome?;

    if let Some(p) = args.export_json.as_deref() {
        crate::storage::export_json(p, &record)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        let summary = crate::text_summary::build_text_summary(&record);
        for line in summary.lines {
            println!("{}", line);
        }
    }

    if args.auto_save {
        if let Ok(p) = crate::storage::save_run(&record) {
            eprintln!("Saved: {}", p.display());
        }
    }

    Ok(())
}

/// Generate a random id for the run record.
fn gen_run_id() -> String {
    let mut b = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut b);
    u64::from_le_bytes(b).to_string()
}

/// Build a `RunConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> RunConfig {
    RunConfig {
        cellprofiler_bin: args.cellprofiler_bin.clone(),
        run_id: gen_run_id(),
        comments: args.comments.clone(),
        pipeline_path: args.pipeline.clone(),
        output_dir: args.output.clone(),
        loaddata_path: args.loaddata.clone(),
        analysis_run: args.analysis,
        sqlite_name: args.sqlite_name.clone(),
        hardcoded_sqlite_name: args.hardcoded_sqlite_name.clone(),
    }
}
