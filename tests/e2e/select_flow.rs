//! Select E2E tests: listing in, selection out, across output formats.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

fn fixture_path(name: &str) -> PathBuf {
    workspace_root().join("tests").join("fixtures").join(name)
}

fn msel() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_msel"));
    for (key, _) in std::env::vars() {
        if key.starts_with("MSEL_") {
            command.env_remove(key);
        }
    }
    command
}

fn run_with_stdin(command: &mut Command, input: &str) -> io::Result<Output> {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("stdin not piped"))?
        .write_all(input.as_bytes())?;
    child.wait_with_output()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn select_from_stdin_applies_inclusions_and_exclusions() -> io::Result<()> {
    let listing = std::fs::read_to_string(fixture_path("listing.txt"))?;
    let output = run_with_stdin(
        msel().args([
            "--no-progress",
            "select",
            "Object:wait",
            "String",
            "!Builder",
            "Util:add:(int,float)",
            "--stdin",
        ]),
        &listing,
    )?;

    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        [
            "java.lang.Object:wait:(J)V",
            "java.lang.String:length:()I",
            "com.example.Util:add:(IF)V",
        ]
    );
    Ok(())
}

#[test]
fn exclusion_wins_regardless_of_pattern_order() -> io::Result<()> {
    let listing = fixture_path("listing.txt");
    let forward = msel()
        .args(["--no-progress", "select", "^java.lang", "!Object:wait", "--candidates"])
        .arg(&listing)
        .output()?;
    let reversed = msel()
        .args(["--no-progress", "select", "!Object:wait", "^java.lang", "--candidates"])
        .arg(&listing)
        .output()?;

    assert!(forward.status.success());
    assert_eq!(forward.stdout, reversed.stdout);
    assert!(
        !stdout_lines(&forward)
            .iter()
            .any(|line| line.contains(":wait:"))
    );
    Ok(())
}

#[test]
fn descriptor_signatures_match_source_syntax_fragments() -> io::Result<()> {
    let output = msel()
        .args(["--no-progress", "select", "Util:add:(int,int)", "--candidates"])
        .arg(fixture_path("listing.txt"))
        .output()?;

    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        ["com.example.Util:add:(II)V"]
    );
    Ok(())
}

#[test]
fn empty_pattern_list_selects_everything_by_default() -> io::Result<()> {
    let listing = fixture_path("listing.txt");
    let output = msel()
        .args(["--no-progress", "select", "--candidates"])
        .arg(&listing)
        .output()?;
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).len(), 9);

    let output = msel()
        .args(["--no-progress", "select", "--select-none-when-empty", "--candidates"])
        .arg(&listing)
        .output()?;
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn ndjson_listing_and_ndjson_output() -> io::Result<()> {
    let output = msel()
        .args([
            "--output",
            "ndjson",
            "select",
            "Util:add",
            "--format",
            "ndjson",
            "--candidates",
        ])
        .arg(fixture_path("listing.ndjson"))
        .output()?;
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 3);

    let summary: serde_json::Value = serde_json::from_str(
        lines
            .last()
            .ok_or_else(|| io::Error::other("missing summary"))?,
    )
    .map_err(io::Error::other)?;
    assert_eq!(summary.get("type"), Some(&serde_json::json!("summary")));
    assert_eq!(summary.get("total"), Some(&serde_json::json!(4)));
    assert_eq!(summary.get("selected"), Some(&serde_json::json!(2)));
    Ok(())
}

#[test]
fn json_report_counts_exclusions() -> io::Result<()> {
    let output = msel()
        .args(["--json", "select", "^java.", "!^java.lang.String", "--candidates"])
        .arg(fixture_path("listing.txt"))
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    let report = value
        .get("report")
        .ok_or_else(|| io::Error::other("missing report"))?;
    assert_eq!(report.get("total"), Some(&serde_json::json!(9)));
    assert_eq!(report.get("excludedCount"), Some(&serde_json::json!(2)));
    assert_eq!(
        report
            .get("selected")
            .and_then(serde_json::Value::as_array)
            .map(Vec::len),
        Some(5)
    );
    Ok(())
}

#[test]
fn malformed_pattern_reports_json_error() -> io::Result<()> {
    let output = msel()
        .args(["--json", "select", "!^^", "--candidates"])
        .arg(fixture_path("listing.txt"))
        .output()?;
    assert_eq!(output.status.code(), Some(2));

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(value.get("status"), Some(&serde_json::json!("error")));
    assert_eq!(
        value.get("error").and_then(|error| error.get("code")),
        Some(&serde_json::json!("ERR_PATTERN_EMPTY_CLASS_SPEC"))
    );
    Ok(())
}

#[test]
fn bad_pattern_is_reported_before_the_listing_is_read() -> io::Result<()> {
    let missing = workspace_root().join("target").join("no-such-listing.txt");
    let output = msel()
        .args(["--no-progress", "select", "A:B:C:D", "--candidates"])
        .arg(&missing)
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(
        String::from_utf8_lossy(&output.stdout).contains("code: ERR_PATTERN_TOO_MANY_SEPARATORS")
    );

    let output = msel()
        .args(["--json", "select", "A:B:C:D", "--format", "ndjson", "--candidates"])
        .arg(fixture_path("listing.txt"))
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(
        value.get("error").and_then(|error| error.get("code")),
        Some(&serde_json::json!("ERR_PATTERN_TOO_MANY_SEPARATORS"))
    );
    Ok(())
}

#[test]
fn missing_listing_reports_json_error() -> io::Result<()> {
    let missing = workspace_root().join("target").join("no-such-listing.txt");
    let output = msel()
        .args(["--json", "select", "String", "--candidates"])
        .arg(&missing)
        .output()?;
    assert_eq!(output.status.code(), Some(3));

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(value.get("status"), Some(&serde_json::json!("error")));
    assert_eq!(
        value.get("error").and_then(|error| error.get("code")),
        Some(&serde_json::json!("ERR_CORE_NOT_FOUND"))
    );

    let output = msel()
        .args(["--output", "ndjson", "select", "String", "--candidates"])
        .arg(&missing)
        .output()?;
    assert_eq!(output.status.code(), Some(3));
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    assert!(lines.iter().all(|line| line.contains("\"type\":\"error\"")));
    Ok(())
}
