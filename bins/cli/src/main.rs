//! CLI binary entrypoint.

mod commands;
mod error;
mod format;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{
    CandidateSource, SelectCommandInput, run_compile, run_config_check, run_config_show, run_info,
    run_patterns, run_select,
};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode};
use method_selector_app::CandidateFormat;
use method_selector_config::ENV_LOG;
use method_selector_shared::ErrorEnvelope;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const ENV_PREFIX: &str = "MSEL_";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Parser)]
#[command(
    name = "msel",
    version,
    about = "Select JVM methods with class/method/signature patterns",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show build and version details.
    Info,
    /// Describe the pattern grammar.
    Patterns,
    /// Compile patterns and show the resulting matchers.
    Compile {
        /// Patterns of the form `[!]<class>[:<method>[:<signature>]]`.
        #[arg(required = true)]
        patterns: Vec<String>,
    },
    /// Filter a candidate listing through patterns.
    Select {
        /// Patterns of the form `[!]<class>[:<method>[:<signature>]]`.
        patterns: Vec<String>,
        /// Candidate listing file.
        #[arg(long, conflicts_with = "stdin")]
        candidates: Option<PathBuf>,
        /// Read the candidate listing from stdin.
        #[arg(long)]
        stdin: bool,
        /// Candidate listing format.
        #[arg(long, value_enum, default_value_t = ListingFormat::Text)]
        format: ListingFormat,
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Optional JSON overrides (partial config).
        #[arg(long)]
        overrides_json: Option<String>,
        /// Select nothing when no inclusion pattern is given.
        #[arg(long)]
        select_none_when_empty: bool,
    },
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Validate config loading, merging, and limits.
    Check {
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        path: Option<PathBuf>,
        /// Optional JSON overrides (partial config).
        #[arg(long)]
        overrides_json: Option<String>,
    },
    /// Show the effective config after applying overrides.
    Show {
        /// Optional config file path (JSON/TOML).
        #[arg(long)]
        path: Option<PathBuf>,
        /// Optional JSON overrides (partial config).
        #[arg(long)]
        overrides_json: Option<String>,
    },
}

/// Candidate listing formats accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListingFormat {
    /// `<class> <method> [<signature>]` per line.
    Text,
    /// One JSON candidate object per line.
    Ndjson,
}

impl From<ListingFormat> for CandidateFormat {
    fn from(value: ListingFormat) -> Self {
        match value {
            ListingFormat::Text => Self::Text,
            ListingFormat::Ndjson => Self::Ndjson,
        }
    }
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);
    init_tracing(mode);
    tracing::debug!(format = ?mode.format, "cli.start");

    match run(&cli, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(mode, error),
        },
        Err(error) => exit_with_error(mode, error),
    }
}

/// Machine-readable modes get an error document on stdout; text mode gets a
/// single `error:` line on stderr.
fn exit_with_error(mode: OutputMode, error: CliError) -> std::process::ExitCode {
    let exit_code = error.exit_code();
    let message = error.to_string();
    let rendered = (mode.is_json() || mode.is_ndjson())
        && write_output(&format_error_output(mode, &error.into_envelope(), exit_code)).is_ok();
    if !rendered {
        let _ = writeln!(io::stderr(), "error: {message}");
    }
    std::process::ExitCode::from(exit_code.as_u8())
}

/// Diagnostics go to stderr so stdout stays parseable; NDJSON mode logs JSON.
fn init_tracing(mode: OutputMode) {
    let filter =
        EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    let _ = if mode.is_ndjson() {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.try_init()
    };
}

fn run(cli: &Cli, mode: OutputMode) -> Result<CliOutput, CliError> {
    match &cli.command {
        Commands::Info => run_info(mode),
        Commands::Patterns => run_patterns(mode),
        Commands::Compile { patterns } => run_compile(mode, patterns),
        Commands::Select {
            patterns,
            candidates,
            stdin,
            format,
            config,
            overrides_json,
            select_none_when_empty,
        } => {
            let source = resolve_candidate_source(candidates.as_ref(), *stdin)?;
            let env = collect_scoped_env(ENV_PREFIX);
            run_select(
                &cli.output,
                &env,
                &SelectCommandInput {
                    patterns,
                    source,
                    candidate_format: (*format).into(),
                    config_path: config.as_deref(),
                    overrides_json: overrides_json.as_deref(),
                    select_none_when_empty: *select_none_when_empty,
                },
            )
        },
        Commands::Config { command } => {
            let env = collect_scoped_env(ENV_PREFIX);
            match command {
                ConfigCommands::Check {
                    path,
                    overrides_json,
                } => run_config_check(mode, &env, path.as_deref(), overrides_json.as_deref()),
                ConfigCommands::Show {
                    path,
                    overrides_json,
                } => run_config_show(mode, &env, path.as_deref(), overrides_json.as_deref()),
            }
        },
    }
}

fn resolve_candidate_source(
    candidates: Option<&PathBuf>,
    from_stdin: bool,
) -> Result<CandidateSource<'_>, CliError> {
    match (candidates, from_stdin) {
        (Some(path), _) => Ok(CandidateSource::File(path.as_path())),
        (None, true) => Ok(CandidateSource::Stdin),
        (None, false) => Err(CliError::InvalidInput(
            "candidate listing required: pass --candidates <PATH> or --stdin".to_string(),
        )),
    }
}

/// Wire shape of an error in JSON and NDJSON output.
#[derive(Debug, Serialize)]
struct ErrorDto<'a> {
    code: String,
    message: &'a str,
    kind: String,
    class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a BTreeMap<String, String>>,
}

impl<'a> ErrorDto<'a> {
    fn from_envelope(error: &'a ErrorEnvelope) -> Self {
        Self {
            code: error.code.to_wire(),
            message: &error.message,
            kind: error.kind.to_string().to_ascii_uppercase(),
            class: error.class.to_string(),
            meta: (!error.metadata.is_empty()).then_some(&error.metadata),
        }
    }
}

pub(crate) fn format_error_output(
    mode: OutputMode,
    error: &ErrorEnvelope,
    exit_code: ExitCode,
) -> CliOutput {
    let dto = ErrorDto::from_envelope(error);

    let mut stderr = String::new();
    log_info(&mut stderr, "command failed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        format_ndjson_error(&dto)
    } else if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": dto,
        });

        // This is a CLI boundary, so JSON serialization errors are internal.
        let mut output = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"error\":{\"code\":\"ERR_CORE_INTERNAL\",\"message\":\"internal error\",\"kind\":\"UNEXPECTED\"}}".to_string()
        });
        output.push('\n');
        output
    } else {
        format_error_text(&dto)
    };

    CliOutput {
        stdout,
        stderr,
        exit_code,
    }
}

fn format_error_text(error: &ErrorDto<'_>) -> String {
    let mut out = String::new();
    out.push_str("status: error\n");
    out.push_str("code: ");
    out.push_str(&error.code);
    out.push('\n');
    out.push_str("message: ");
    out.push_str(error.message);
    out.push('\n');
    out.push_str("kind: ");
    out.push_str(&error.kind);
    out.push('\n');

    if let Some(meta) = error.meta {
        out.push_str("meta:\n");
        for (key, value) in meta {
            out.push_str("  ");
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }

    out
}

pub(crate) fn log_info(stderr: &mut String, message: &str, no_progress: bool) {
    if no_progress {
        return;
    }
    stderr.push_str("info: ");
    stderr.push_str(message);
    stderr.push('\n');
}

pub(crate) fn format_ndjson_summary(
    status: &str,
    kind: &str,
    extra: Option<serde_json::Value>,
) -> String {
    let mut payload = serde_json::Map::new();
    payload.insert(
        "type".to_string(),
        serde_json::Value::String("summary".to_string()),
    );
    payload.insert(
        "status".to_string(),
        serde_json::Value::String(status.to_string()),
    );
    payload.insert(
        "kind".to_string(),
        serde_json::Value::String(kind.to_string()),
    );
    if let Some(serde_json::Value::Object(map)) = extra {
        for (key, value) in map {
            payload.insert(key, value);
        }
    }
    let mut out = serde_json::to_string(&serde_json::Value::Object(payload)).unwrap_or_else(|_| {
        "{\"type\":\"summary\",\"status\":\"error\",\"kind\":\"internal\"}".to_string()
    });
    out.push('\n');
    out
}

fn format_ndjson_error(error: &ErrorDto<'_>) -> String {
    let payload = serde_json::json!({
        "type": "error",
        "status": "error",
        "error": error,
    });
    let mut out = serde_json::to_string(&payload).unwrap_or_else(|_| {
        "{\"type\":\"error\",\"status\":\"error\",\"error\":{\"code\":\"ERR_CORE_INTERNAL\",\"message\":\"internal error\",\"kind\":\"UNEXPECTED\"}}".to_string()
    });
    out.push('\n');
    out
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}

fn collect_scoped_env(prefix: &str) -> BTreeMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with(prefix))
        .collect()
}
