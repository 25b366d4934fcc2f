//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict: a variable that is present but empty or invalid
//! fails fast instead of being ignored.

use crate::schema::{OutputFormatSetting, SelectorConfig, ValidatedSelectorConfig};
use method_selector_domain::{EmptyPatternPolicy, SignatureMatching};
use method_selector_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;

/// Env var: verdict when no inclusion pattern is supplied.
pub const ENV_EMPTY_PATTERN_POLICY: &str = "MSEL_EMPTY_PATTERN_POLICY";
/// Env var: signature matching mode.
pub const ENV_SIGNATURE_MATCHING: &str = "MSEL_SIGNATURE_MATCHING";
/// Env var: parallel evaluation threshold.
pub const ENV_PARALLEL_THRESHOLD: &str = "MSEL_PARALLEL_THRESHOLD";
/// Env var: default output format.
pub const ENV_OUTPUT_FORMAT: &str = "MSEL_OUTPUT_FORMAT";
/// Env var: `tracing` filter directive read by the CLI.
pub const ENV_LOG: &str = "MSEL_LOG";

/// Typed env-derived overrides for `SelectorConfig`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorEnv {
    /// Override for `selection.emptyPatternPolicy`.
    pub empty_pattern_policy: Option<EmptyPatternPolicy>,
    /// Override for `selection.signatureMatching`.
    pub signature_matching: Option<SignatureMatching>,
    /// Override for `selection.parallelThreshold`.
    pub parallel_threshold: Option<u32>,
    /// Override for `output.format`.
    pub output_format: Option<OutputFormatSetting>,
}

impl SelectorEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            empty_pattern_policy: parse_optional_enum(
                map,
                ENV_EMPTY_PATTERN_POLICY,
                parse_empty_pattern_policy,
            )?,
            signature_matching: parse_optional_enum(
                map,
                ENV_SIGNATURE_MATCHING,
                parse_signature_matching,
            )?,
            parallel_threshold: parse_optional_u32(map, ENV_PARALLEL_THRESHOLD)?,
            output_format: parse_optional_enum(map, ENV_OUTPUT_FORMAT, OutputFormatSetting::parse)?,
        })
    }

    /// Returns true when no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.empty_pattern_policy.is_none()
            && self.signature_matching.is_none()
            && self.parallel_threshold.is_none()
            && self.output_format.is_none()
    }
}

/// Apply env overrides to a base config (env wins over file/default values).
pub fn apply_env_overrides(
    base: SelectorConfig,
    env: &SelectorEnv,
) -> Result<ValidatedSelectorConfig, ErrorEnvelope> {
    let mut config = base;
    if let Some(policy) = env.empty_pattern_policy {
        config.selection.empty_pattern_policy = policy;
    }
    if let Some(matching) = env.signature_matching {
        config.selection.signature_matching = matching;
    }
    if let Some(threshold) = env.parallel_threshold {
        config.selection.parallel_threshold = threshold;
    }
    if let Some(format) = env.output_format {
        config.output.format = format;
    }

    config.validate().map_err(Into::into)
}

/// Validation failures when parsing env variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Integer env var had an invalid value.
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidInt { .. } => ErrorCode::new("config", "invalid_env_int"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidInt { var, .. } => write!(formatter, "{var} must be an integer"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidInt { var, value } | EnvParseError::InvalidEnum { var, value } => {
                envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", value)
            },
        }
    }
}

fn parse_empty_pattern_policy(input: &str) -> Option<EmptyPatternPolicy> {
    match input.to_ascii_lowercase().as_str() {
        "selectall" | "select_all" | "select-all" | "all" => Some(EmptyPatternPolicy::SelectAll),
        "selectnone" | "select_none" | "select-none" | "none" => {
            Some(EmptyPatternPolicy::SelectNone)
        },
        _ => None,
    }
}

fn parse_signature_matching(input: &str) -> Option<SignatureMatching> {
    match input.to_ascii_lowercase().as_str() {
        "bothsyntaxes" | "both_syntaxes" | "both-syntaxes" | "both" => {
            Some(SignatureMatching::BothSyntaxes)
        },
        "literal" => Some(SignatureMatching::Literal),
        _ => None,
    }
}

fn parse_optional_trimmed<'a>(
    map: &'a BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<&'a str>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    Ok(Some(trimmed))
}

fn parse_optional_u32(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u32>, EnvParseError> {
    let Some(trimmed) = parse_optional_trimmed(map, var)? else {
        return Ok(None);
    };

    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: trimmed.to_owned(),
        })
}

fn parse_optional_enum<T>(
    map: &BTreeMap<String, String>,
    var: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, EnvParseError> {
    let Some(trimmed) = parse_optional_trimmed(map, var)? else {
        return Ok(None);
    };

    parse(trimmed)
        .map(Some)
        .ok_or_else(|| EnvParseError::InvalidEnum {
            var,
            value: trimmed.to_owned(),
        })
}
