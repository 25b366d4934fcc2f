//! Config check/show handlers.

use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use crate::{CliOutput, format_error_output, format_ndjson_summary, log_info};
use method_selector_config::{
    SelectorEnv, ValidatedSelectorConfig, load_selector_config_from_path, to_pretty_toml,
};
use method_selector_shared::ErrorEnvelope;
use std::collections::BTreeMap;
use std::path::Path;

/// Run `config check`: load and validate the effective config.
pub fn run_config_check(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<CliOutput, CliError> {
    let config = match load_effective_config(env, path, overrides_json) {
        Ok(config) => config,
        Err(error) => return Ok(format_error_output(mode, &error, ExitCode::InvalidInput)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "config check completed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        format_ndjson_summary("ok", "config", None)
    } else if mode.is_json() {
        format_config_json(path, &config)?
    } else {
        path.map_or_else(
            || "status: ok\nconfig: ok\n".to_string(),
            |path| format!("status: ok\nconfig: ok\npath: {}\n", path.to_string_lossy()),
        )
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Run `config show`: print the effective config (TOML in text mode).
pub fn run_config_show(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<CliOutput, CliError> {
    let config = match load_effective_config(env, path, overrides_json) {
        Ok(config) => config,
        Err(error) => return Ok(format_error_output(mode, &error, ExitCode::InvalidInput)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "config show completed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        let effective = serde_json::to_value(config.as_ref())?;
        format_ndjson_summary(
            "ok",
            "config",
            Some(serde_json::json!({ "effectiveConfig": effective })),
        )
    } else if mode.is_json() {
        format_config_json(path, &config)?
    } else {
        let rendered = match to_pretty_toml(&config) {
            Ok(rendered) => rendered,
            Err(error) => {
                return Ok(format_error_output(mode, &error, ExitCode::Internal));
            },
        };
        format!("status: ok\nconfig:\n{rendered}")
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

fn load_effective_config(
    env: &BTreeMap<String, String>,
    path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<ValidatedSelectorConfig, ErrorEnvelope> {
    let env = SelectorEnv::from_map(env)?;
    load_selector_config_from_path(path, overrides_json, &env)
}

fn format_config_json(
    path: Option<&Path>,
    config: &ValidatedSelectorConfig,
) -> Result<String, CliError> {
    let config_value = serde_json::to_value(config.as_ref())?;
    let payload = serde_json::json!({
        "status": "ok",
        "configPath": path.map(|value| value.to_string_lossy().to_string()),
        "effectiveConfig": config_value,
    });
    let mut output = serde_json::to_string_pretty(&payload)?;
    output.push('\n');
    Ok(output)
}
