//! Config loading helpers (env + file + overrides).
//!
//! The loader is responsible for deterministic merge order and surfacing
//! user-facing errors as typed `ErrorEnvelope`s.

use crate::schema::{OutputFormatSetting, SelectorConfig, ValidatedSelectorConfig};
use crate::{SelectorEnv, apply_env_overrides};
use method_selector_domain::{EmptyPatternPolicy, SignatureMatching};
use method_selector_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

/// Load the selector config from sources using a deterministic precedence order.
///
/// Precedence (highest wins):
/// - env overrides (`SelectorEnv`)
/// - overrides JSON (partial config)
/// - config JSON (file content)
/// - defaults (`SelectorConfig::default()`)
pub fn load_selector_config_from_sources(
    config_json: Option<&str>,
    overrides_json: Option<&str>,
    env: &SelectorEnv,
) -> Result<ValidatedSelectorConfig, ErrorEnvelope> {
    let config = match config_json {
        None => SelectorConfig::default(),
        Some(input) => parse_config_unvalidated(input, ConfigFormat::Json)?,
    };

    merge_and_validate(config, overrides_json, env)
}

/// Load the selector config from an optional file path.
pub fn load_selector_config_from_path(
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
    env: &SelectorEnv,
) -> Result<ValidatedSelectorConfig, ErrorEnvelope> {
    let config = match config_path {
        None => SelectorConfig::default(),
        Some(path) => {
            let config_text = read_config_file(path)?;
            let format = detect_config_format(path)?;
            tracing::debug!(path = %path.display(), ?format, "config.load");
            parse_config_unvalidated(&config_text, format)?
        },
    };

    merge_and_validate(config, overrides_json, env)
}

/// Serialize the config as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(config: &SelectorConfig) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize config TOML: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

fn merge_and_validate(
    mut config: SelectorConfig,
    overrides_json: Option<&str>,
    env: &SelectorEnv,
) -> Result<ValidatedSelectorConfig, ErrorEnvelope> {
    if let Some(input) = overrides_json {
        let overrides = parse_overrides_json(input)?;
        apply_overrides(&mut config, &overrides);
    }

    // env is applied last and also validates the resulting config.
    apply_env_overrides(config, env)
}

fn parse_config_unvalidated(
    input: &str,
    format: ConfigFormat,
) -> Result<SelectorConfig, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid config JSON: {error}"),
            )
            .with_metadata("source", "config")
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid config TOML: {error}"),
            )
            .with_metadata("source", "config")
        }),
    }
}

fn parse_overrides_json(input: &str) -> Result<SelectorConfigOverrides, ErrorEnvelope> {
    serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid overrides JSON: {error}"),
        )
        .with_metadata("source", "overrides")
    })
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "config_file_permission_denied")
            },
            _ => ErrorCode::new("config", "config_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read config file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}

fn detect_config_format(path: &Path) -> Result<ConfigFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported config format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct SelectorConfigOverrides {
    version: Option<u32>,
    selection: SelectionConfigOverrides,
    output: OutputConfigOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct SelectionConfigOverrides {
    empty_pattern_policy: Option<EmptyPatternPolicy>,
    signature_matching: Option<SignatureMatching>,
    parallel_threshold: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct OutputConfigOverrides {
    format: Option<OutputFormatSetting>,
}

fn apply_overrides(config: &mut SelectorConfig, overrides: &SelectorConfigOverrides) {
    set(&mut config.version, overrides.version);

    let selection = &overrides.selection;
    set(
        &mut config.selection.empty_pattern_policy,
        selection.empty_pattern_policy,
    );
    set(
        &mut config.selection.signature_matching,
        selection.signature_matching,
    );
    set(
        &mut config.selection.parallel_threshold,
        selection.parallel_threshold,
    );

    set(&mut config.output.format, overrides.output.format);
}

fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_config(name: &str, contents: &str) -> Result<PathBuf, std::io::Error> {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(std::io::Error::other)?
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("msel-config-{nanos}"));
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    #[test]
    fn override_precedence_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
        let config_json = r#"{
          "version": 1,
          "selection": { "parallelThreshold": 100, "signatureMatching": "literal" }
        }"#;

        let overrides_json = r#"{
          "selection": { "parallelThreshold": 200 }
        }"#;

        let env = SelectorEnv {
            parallel_threshold: Some(300),
            ..SelectorEnv::default()
        };

        let config =
            load_selector_config_from_sources(Some(config_json), Some(overrides_json), &env)?;
        assert_eq!(config.parallel_threshold(), 300);
        assert_eq!(
            config.selection.signature_matching,
            SignatureMatching::Literal
        );

        let without_env = load_selector_config_from_sources(
            Some(config_json),
            Some(overrides_json),
            &SelectorEnv::default(),
        )?;
        assert_eq!(without_env.parallel_threshold(), 200);
        Ok(())
    }

    #[test]
    fn serialization_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
        let config = load_selector_config_from_sources(None, None, &SelectorEnv::default())?;
        let first = to_pretty_toml(&config)?;
        let second = to_pretty_toml(&config)?;
        assert_eq!(first, second);
        assert!(first.contains("emptyPatternPolicy = \"selectAll\""));
        assert!(first.contains("signatureMatching = \"bothSyntaxes\""));
        Ok(())
    }

    #[test]
    fn invalid_config_value_overridden_by_valid_env_succeeds()
    -> Result<(), Box<dyn std::error::Error>> {
        let config_json = r#"{ "selection": { "parallelThreshold": 0 } }"#;
        let env = SelectorEnv {
            parallel_threshold: Some(64),
            ..SelectorEnv::default()
        };

        let config = load_selector_config_from_sources(Some(config_json), None, &env)?;
        assert_eq!(config.parallel_threshold(), 64);
        Ok(())
    }

    #[test]
    fn malformed_overrides_report_their_source() -> Result<(), Box<dyn std::error::Error>> {
        let overrides_json = r#"{ "selection": { "parallelThreshold": }"#;

        let error =
            load_selector_config_from_sources(None, Some(overrides_json), &SelectorEnv::default())
                .err()
                .ok_or_else(|| std::io::Error::other("expected overrides error"))?;
        assert_eq!(error.code, ErrorCode::new("config", "invalid_json"));
        assert_eq!(
            error.metadata.get("source").map(String::as_str),
            Some("overrides")
        );
        Ok(())
    }

    #[test]
    fn toml_file_is_detected_by_extension() -> Result<(), Box<dyn std::error::Error>> {
        let path = temp_config(
            "msel.toml",
            "version = 1\n[selection]\nemptyPatternPolicy = \"selectNone\"\n",
        )?;

        let config = load_selector_config_from_path(Some(&path), None, &SelectorEnv::default())?;
        assert_eq!(
            config.selection.empty_pattern_policy,
            EmptyPatternPolicy::SelectNone
        );
        Ok(())
    }

    #[test]
    fn unsupported_extension_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let path = temp_config("msel.yaml", "version: 1\n")?;

        let error = load_selector_config_from_path(Some(&path), None, &SelectorEnv::default())
            .err()
            .ok_or_else(|| std::io::Error::other("expected format error"))?;
        assert_eq!(error.code, ErrorCode::new("config", "unsupported_format"));
        assert_eq!(
            error.metadata.get("extension").map(String::as_str),
            Some("yaml")
        );
        Ok(())
    }

    #[test]
    fn missing_file_maps_to_not_found_code() -> Result<(), Box<dyn std::error::Error>> {
        let path = std::env::temp_dir().join("msel-config-does-not-exist.json");

        let error = load_selector_config_from_path(Some(&path), None, &SelectorEnv::default())
            .err()
            .ok_or_else(|| std::io::Error::other("expected io error"))?;
        assert_eq!(
            error.code,
            ErrorCode::new("config", "config_file_not_found")
        );
        Ok(())
    }
}
