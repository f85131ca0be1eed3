//! End-to-end runs of the binary against a stub tool script.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// Stub that behaves like a headless CellProfiler run: it drops a marker so
// tests can tell whether it was invoked, and writes the hardcoded-named
// measurements database into the -o directory.
const PRODUCING_STUB: &str = "#!/bin/sh
out=
while [ $# -gt 0 ]; do
  case \"$1\" in
    -o) out=\"$2\"; shift 2 ;;
    *) shift ;;
  esac
done
printf 'invoked' > \"$out/invoked.marker\"
printf 'measurements' > \"$out/Plate1.sqlite\"
";

// Stub that runs but never produces the database.
const SILENT_STUB: &str = "#!/bin/sh
out=
while [ $# -gt 0 ]; do
  case \"$1\" in
    -o) out=\"$2\"; shift 2 ;;
    *) shift ;;
  esac
done
printf 'invoked' > \"$out/invoked.marker\"
";

fn write_stub_tool(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-cellprofiler.sh");
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn run_cli(stub: &Path, output_dir: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cellprofiler-batch-cli"))
        .arg("--pipeline")
        .arg("analysis.cppipe")
        .arg("--output")
        .arg(output_dir)
        .arg("--loaddata")
        .arg("plate1.csv")
        .arg("--cellprofiler-bin")
        .arg(stub)
        .arg("--auto-save")
        .arg("false")
        .args(extra)
        .output()
        .expect("spawn cellprofiler-batch-cli")
}

#[test]
fn analysis_run_renames_the_measurements_database() {
    let tmp = tempfile::tempdir().unwrap();
    let out_dir = tmp.path().join("CellProfiler_output");
    fs::create_dir(&out_dir).unwrap();
    let stub = write_stub_tool(tmp.path(), PRODUCING_STUB);

    let output = run_cli(&stub, &out_dir, &["--analysis", "--sqlite-name", "IC1"]);

    assert!(output.status.success());
    assert!(!out_dir.join("Plate1.sqlite").exists());
    assert_eq!(fs::read(out_dir.join("IC1.sqlite")).unwrap(), b"measurements");
}

#[test]
fn duplicate_run_aborts_before_invoking_the_tool() {
    let tmp = tempfile::tempdir().unwrap();
    let out_dir = tmp.path().join("CellProfiler_output");
    fs::create_dir(&out_dir).unwrap();
    fs::write(out_dir.join("IC1_old.sqlite"), b"stale").unwrap();
    let stub = write_stub_tool(tmp.path(), PRODUCING_STUB);

    let output = run_cli(&stub, &out_dir, &["--analysis", "--sqlite-name", "IC1"]);

    assert!(!output.status.success());
    assert!(!out_dir.join("invoked.marker").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already analyzed"));
}

#[test]
fn missing_measurements_database_is_reported_not_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let out_dir = tmp.path().join("CellProfiler_output");
    fs::create_dir(&out_dir).unwrap();
    let stub = write_stub_tool(tmp.path(), SILENT_STUB);

    let output = run_cli(&stub, &out_dir, &["--analysis", "--sqlite-name", "IC1"]);

    assert!(output.status.success());
    assert!(out_dir.join("invoked.marker").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("was not found"));
}

#[test]
fn correction_run_leaves_output_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let out_dir = tmp.path().join("CellProfiler_output");
    fs::create_dir(&out_dir).unwrap();
    let stub = write_stub_tool(tmp.path(), PRODUCING_STUB);

    let output = run_cli(&stub, &out_dir, &[]);

    assert!(output.status.success());
    // No rename outside analysis mode; the hardcoded name stays.
    assert!(out_dir.join("Plate1.sqlite").exists());
}

#[test]
fn sqlite_name_requires_analysis_mode() {
    let tmp = tempfile::tempdir().unwrap();
    let out_dir = tmp.path().join("CellProfiler_output");
    fs::create_dir(&out_dir).unwrap();
    let stub = write_stub_tool(tmp.path(), PRODUCING_STUB);

    let output = run_cli(&stub, &out_dir, &["--sqlite-name", "IC1"]);

    assert!(!output.status.success());
    assert!(!out_dir.join("invoked.marker").exists());
}

#[test]
fn json_mode_emits_the_run_record() {
    let tmp = tempfile::tempdir().unwrap();
    let out_dir = tmp.path().join("CellProfiler_output");
    fs::create_dir(&out_dir).unwrap();
    let stub = write_stub_tool(tmp.path(), PRODUCING_STUB);

    let output = run_cli(
        &stub,
        &out_dir,
        &["--analysis", "--sqlite-name", "IC1", "--json"],
    );

    assert!(output.status.success());
    let record: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("run record JSON on stdout");
    let command_line = record["command_line"].as_str().unwrap();
    assert!(command_line.contains("analysis.cppipe"));
    assert!(command_line.contains("plate1.csv"));
    assert!(command_line.contains("-c -r"));
    assert_eq!(record["tool_exit_code"], 0);
    assert!(record["rename"]["Renamed"]["to"]
        .as_str()
        .unwrap()
        .ends_with("IC1.sqlite"));
}

#[test]
fn export_json_writes_the_record_to_the_given_path() {
    let tmp = tempfile::tempdir().unwrap();
    let out_dir = tmp.path().join("CellProfiler_output");
    fs::create_dir(&out_dir).unwrap();
    let stub = write_stub_tool(tmp.path(), PRODUCING_STUB);
    let export = tmp.path().join("record.json");

    let output = run_cli(
        &stub,
        &out_dir,
        &[
            "--analysis",
            "--sqlite-name",
            "IC1",
            "--export-json",
            export.to_str().unwrap(),
        ],
    );

    assert!(output.status.success());
    let record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(record["analysis_run"], true);
}
