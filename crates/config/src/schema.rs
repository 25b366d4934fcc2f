//! Selector configuration schema, defaults, and validation.
//!
//! - Deserialization uses `serde` (JSON or TOML).
//! - Validation is manual and returns typed errors mapped to `ErrorEnvelope`.

use method_selector_domain::{EmptyPatternPolicy, SelectionOptions, SignatureMatching};
use method_selector_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current supported configuration schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Default batch size above which selection runs on the parallel pool.
pub const DEFAULT_PARALLEL_THRESHOLD: u32 = 4_096;

const PARALLEL_THRESHOLD_MIN: u32 = 1;
const PARALLEL_THRESHOLD_MAX: u32 = 10_000_000;

/// Top-level selector configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SelectorConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Pattern evaluation settings.
    pub selection: SelectionConfig,
    /// CLI output settings.
    pub output: OutputConfig,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            selection: SelectionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl SelectorConfig {
    /// Validate the config.
    pub fn validate(self) -> Result<ValidatedSelectorConfig, ConfigSchemaError> {
        self.validate_version()?;
        self.selection.validate()?;
        Ok(ValidatedSelectorConfig { raw: self })
    }

    const fn validate_version(&self) -> Result<(), ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        Ok(())
    }
}

/// Validated config wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSelectorConfig {
    raw: SelectorConfig,
}

impl ValidatedSelectorConfig {
    /// Borrow the raw config.
    #[must_use]
    pub const fn as_ref(&self) -> &SelectorConfig {
        &self.raw
    }

    /// Options the pattern set is compiled with.
    #[must_use]
    pub const fn selection_options(&self) -> SelectionOptions {
        SelectionOptions {
            empty_pattern_policy: self.raw.selection.empty_pattern_policy,
            signature_matching: self.raw.selection.signature_matching,
        }
    }

    /// Batch size above which selection runs in parallel.
    #[must_use]
    pub const fn parallel_threshold(&self) -> usize {
        self.raw.selection.parallel_threshold as usize
    }
}

impl AsRef<SelectorConfig> for ValidatedSelectorConfig {
    fn as_ref(&self) -> &SelectorConfig {
        &self.raw
    }
}

impl std::ops::Deref for ValidatedSelectorConfig {
    type Target = SelectorConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Parse a selector config from a JSON string, applying validation.
pub fn parse_selector_config_json(input: &str) -> Result<ValidatedSelectorConfig, ErrorEnvelope> {
    let config: SelectorConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    config.validate().map_err(Into::into)
}

/// Parse a selector config from a TOML string, applying validation.
pub fn parse_selector_config_toml(input: &str) -> Result<ValidatedSelectorConfig, ErrorEnvelope> {
    let config: SelectorConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    config.validate().map_err(Into::into)
}

/// Pattern evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SelectionConfig {
    /// Verdict when no inclusion pattern is supplied.
    pub empty_pattern_policy: EmptyPatternPolicy,
    /// Whether signature fragments also match the alternate syntax.
    pub signature_matching: SignatureMatching,
    /// Batch size above which candidates are evaluated in parallel.
    pub parallel_threshold: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            empty_pattern_policy: EmptyPatternPolicy::default(),
            signature_matching: SignatureMatching::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl SelectionConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if !(PARALLEL_THRESHOLD_MIN..=PARALLEL_THRESHOLD_MAX).contains(&self.parallel_threshold) {
            return Err(ConfigSchemaError::LimitOutOfRange {
                section: "selection",
                field: "parallelThreshold",
                value: u64::from(self.parallel_threshold),
                min: u64::from(PARALLEL_THRESHOLD_MIN),
                max: u64::from(PARALLEL_THRESHOLD_MAX),
            });
        }
        Ok(())
    }
}

/// CLI output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct OutputConfig {
    /// Default output format when no CLI flag is given.
    pub format: OutputFormatSetting,
}

/// Output format stored in config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormatSetting {
    /// Human-readable text.
    #[default]
    Text,
    /// A single JSON document.
    Json,
    /// One JSON object per line.
    Ndjson,
}

impl OutputFormatSetting {
    /// Return the canonical config string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
        }
    }

    /// Parse from user or env input.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "ndjson" => Some(Self::Ndjson),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormatSetting {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Typed validation errors for the configuration schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this binary.
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// A numeric limit is out of bounds.
    LimitOutOfRange {
        /// Schema section (e.g. `selection`).
        section: &'static str,
        /// Field name in the config file (e.g. `parallelThreshold`).
        field: &'static str,
        /// Value provided.
        value: u64,
        /// Minimum allowed value.
        min: u64,
        /// Maximum allowed value.
        max: u64,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::LimitOutOfRange { .. } => ErrorCode::new("config", "invalid_limit"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => {
                write!(
                    formatter,
                    "unsupported config version: {found} (supported: {supported})"
                )
            },
            Self::LimitOutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => write!(
                formatter,
                "{section}.{field} must be between {min} and {max} (got {value})"
            ),
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => envelope
                .with_metadata("found", found.to_string())
                .with_metadata("supported", supported.to_string()),
            ConfigSchemaError::LimitOutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => envelope
                .with_metadata("section", section)
                .with_metadata("field", field)
                .with_metadata("value", value.to_string())
                .with_metadata("min", min.to_string())
                .with_metadata("max", max.to_string()),
        }
    }
}
