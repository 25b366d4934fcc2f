//! Output format helpers for CLI commands.

use clap::{Args, ValueEnum};
use method_selector_config::OutputFormatSetting;

/// Output format choices for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-friendly text output.
    Text,
    /// Machine-friendly JSON output.
    Json,
    /// Line-delimited JSON (NDJSON) output.
    Ndjson,
}

impl From<OutputFormatSetting> for OutputFormat {
    fn from(value: OutputFormatSetting) -> Self {
        match value {
            OutputFormatSetting::Text => Self::Text,
            OutputFormatSetting::Json => Self::Json,
            OutputFormatSetting::Ndjson => Self::Ndjson,
        }
    }
}

/// Output-related CLI flags.
#[derive(Debug, Args)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "CLI flags are intentionally boolean to keep UX predictable."
)]
pub struct OutputArgs {
    /// Output format for command responses.
    #[arg(long, global = true, value_enum)]
    pub output: Option<OutputFormat>,
    /// Emit machine-friendly defaults (NDJSON output, no progress).
    #[arg(long, global = true)]
    pub agent: bool,
    /// Suppress progress/logging output.
    #[arg(long, global = true)]
    pub no_progress: bool,
    /// Re-enable progress output when combined with `--no-progress` in scripts.
    #[arg(long, global = true)]
    pub interactive: bool,
    /// Emit machine-readable JSON output (alias for `--output json`).
    #[arg(long, global = true, hide = true)]
    pub json: bool,
}

/// Output mode derived from CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub format: OutputFormat,
    pub no_progress: bool,
}

impl OutputMode {
    /// Build output mode from CLI flags, falling back to text.
    #[must_use]
    pub const fn from_args(args: &OutputArgs) -> Self {
        Self::from_args_or(args, OutputFormat::Text)
    }

    /// Build output mode from CLI flags, falling back to `default` (usually the
    /// configured `output.format`).
    #[must_use]
    pub const fn from_args_or(args: &OutputArgs, default: OutputFormat) -> Self {
        let format = match (args.output, args.json, args.agent) {
            (Some(value), _, _) => value,
            (None, true, _) => OutputFormat::Json,
            (None, false, true) => OutputFormat::Ndjson,
            (None, false, false) => default,
        };

        let no_progress = if args.agent {
            true
        } else if args.interactive {
            false
        } else {
            args.no_progress
        };

        Self {
            format,
            no_progress,
        }
    }

    /// Returns true when JSON output is requested.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Returns true when NDJSON output is requested.
    #[must_use]
    pub const fn is_ndjson(self) -> bool {
        matches!(self.format, OutputFormat::Ndjson)
    }
}
