//! Config E2E tests: file, overrides, and env precedence through the CLI.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

fn config_fixture(name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join("config")
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn listing_fixture() -> PathBuf {
    workspace_root()
        .join("tests")
        .join("fixtures")
        .join("listing.txt")
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

fn effective_selection(output: &[u8]) -> io::Result<serde_json::Value> {
    let value: serde_json::Value = serde_json::from_slice(output).map_err(io::Error::other)?;
    value
        .get("effectiveConfig")
        .and_then(|config| config.get("selection"))
        .cloned()
        .ok_or_else(|| io::Error::other("missing effectiveConfig.selection"))
}

#[test]
fn config_show_merges_file_overrides_and_env() -> io::Result<()> {
    let output = msel()
        .args(["--json", "config", "show", "--path"])
        .arg(config_fixture("selector-config.valid.json"))
        .args(["--overrides-json", r#"{"selection":{"parallelThreshold":1024}}"#])
        .env("MSEL_SIGNATURE_MATCHING", "both")
        .output()?;
    assert!(output.status.success());

    let selection = effective_selection(&output.stdout)?;
    assert_eq!(
        selection.get("emptyPatternPolicy"),
        Some(&serde_json::json!("selectNone"))
    );
    assert_eq!(
        selection.get("parallelThreshold"),
        Some(&serde_json::json!(1024))
    );
    assert_eq!(
        selection.get("signatureMatching"),
        Some(&serde_json::json!("bothSyntaxes"))
    );
    Ok(())
}

#[test]
fn toml_config_is_accepted() -> io::Result<()> {
    let output = msel()
        .args(["config", "check", "--path"])
        .arg(config_fixture("selector-config.default.toml"))
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.starts_with("status: ok\nconfig: ok\npath: "));
    Ok(())
}

#[test]
fn out_of_range_threshold_fails_with_limit_error() -> io::Result<()> {
    let output = msel()
        .args(["--json", "config", "check", "--path"])
        .arg(config_fixture("selector-config.invalid-threshold.json"))
        .output()?;
    assert_eq!(output.status.code(), Some(2));

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(
        value.get("error").and_then(|error| error.get("code")),
        Some(&serde_json::json!("ERR_CONFIG_INVALID_LIMIT"))
    );
    Ok(())
}

#[test]
fn configured_policy_and_format_drive_select() -> io::Result<()> {
    // The fixture sets selectNone, literal signatures, and NDJSON output.
    let output = msel()
        .args(["select", "--candidates"])
        .arg(listing_fixture())
        .arg("--config")
        .arg(config_fixture("selector-config.valid.json"))
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines.iter().all(|line| line.contains("\"type\":\"summary\"")));

    let literal = msel()
        .args(["select", "Util:add:(int,float)", "--candidates"])
        .arg(listing_fixture())
        .arg("--config")
        .arg(config_fixture("selector-config.valid.json"))
        .output()?;
    let stdout = String::from_utf8_lossy(&literal.stdout);
    assert!(literal.status.success());
    assert!(stdout.contains("\"selected\":0"));
    Ok(())
}

#[test]
fn env_output_format_is_overridden_by_flag() -> io::Result<()> {
    let output = msel()
        .args(["--output", "text", "--no-progress", "select", "String:length", "--candidates"])
        .arg(listing_fixture())
        .env("MSEL_OUTPUT_FORMAT", "json")
        .output()?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "java.lang.String:length:()I\n"
    );
    Ok(())
}
