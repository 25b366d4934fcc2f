//! # method-selector-config
//!
//! Configuration schema, env overrides, and loading for the selector.
//! This crate depends on `domain` and `shared` only.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file + overrides).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use env::{
    ENV_EMPTY_PATTERN_POLICY, ENV_LOG, ENV_OUTPUT_FORMAT, ENV_PARALLEL_THRESHOLD,
    ENV_SIGNATURE_MATCHING, EnvParseError, SelectorEnv, apply_env_overrides,
};
pub use load::{
    load_selector_config_from_path, load_selector_config_from_sources, to_pretty_toml,
};
pub use schema::{
    CURRENT_CONFIG_VERSION, ConfigSchemaError, DEFAULT_PARALLEL_THRESHOLD, OutputConfig,
    OutputFormatSetting, SelectionConfig, SelectorConfig, ValidatedSelectorConfig,
    parse_selector_config_json, parse_selector_config_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
