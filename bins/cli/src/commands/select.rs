//! Select command handler: filters a candidate listing through patterns.

use crate::error::{CliError, ExitCode};
use crate::format::{OutputArgs, OutputMode};
use crate::{CliOutput, format_error_output, format_ndjson_summary, log_info};
use method_selector_app::{
    CandidateFormat, SelectCandidatesInput, SelectionReport, compile_patterns, parse_candidates,
    select_candidates,
};
use method_selector_config::{SelectorEnv, load_selector_config_from_path};
use method_selector_domain::{EmptyPatternPolicy, PatternSet};
use method_selector_shared::ErrorEnvelope;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::io::Read;
use std::path::Path;

/// Where the candidate listing is read from.
#[derive(Debug, Clone, Copy)]
pub enum CandidateSource<'a> {
    /// A listing file.
    File(&'a Path),
    /// Standard input.
    Stdin,
}

/// Inputs for select command execution.
pub struct SelectCommandInput<'a> {
    pub patterns: &'a [String],
    pub source: CandidateSource<'a>,
    pub candidate_format: CandidateFormat,
    pub config_path: Option<&'a Path>,
    pub overrides_json: Option<&'a str>,
    pub select_none_when_empty: bool,
}

/// Patterns compiled under the effective config, ready to run over a listing.
struct PreparedSelection {
    mode: OutputMode,
    patterns: PatternSet,
    parallel_threshold: usize,
}

/// Run the select command.
///
/// Config and patterns are resolved before the listing is read, so a bad
/// pattern is reported even when the listing is missing or malformed.
pub fn run_select(
    args: &OutputArgs,
    env: &BTreeMap<String, String>,
    input: &SelectCommandInput<'_>,
) -> Result<CliOutput, CliError> {
    let prepared = match prepare_selection(args, env, input) {
        Ok(prepared) => prepared,
        Err(output) => return Ok(output),
    };
    let listing = read_listing(input.source)?;
    select_listing(&prepared, input, &listing)
}

fn read_listing(source: CandidateSource<'_>) -> Result<String, CliError> {
    match source {
        CandidateSource::File(path) => Ok(std::fs::read_to_string(path)?),
        CandidateSource::Stdin => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        },
    }
}

fn prepare_selection(
    args: &OutputArgs,
    env: &BTreeMap<String, String>,
    input: &SelectCommandInput<'_>,
) -> Result<PreparedSelection, CliOutput> {
    let fallback_mode = OutputMode::from_args(args);
    let config = SelectorEnv::from_map(env)
        .map_err(ErrorEnvelope::from)
        .and_then(|env| {
            load_selector_config_from_path(input.config_path, input.overrides_json, &env)
        })
        .map_err(|error| fail(fallback_mode, &error))?;
    let mode = OutputMode::from_args_or(args, config.output.format.into());

    let mut options = config.selection_options();
    if input.select_none_when_empty {
        options.empty_pattern_policy = EmptyPatternPolicy::SelectNone;
    }

    let patterns = compile_patterns(input.patterns, options).map_err(|error| fail(mode, &error))?;
    Ok(PreparedSelection {
        mode,
        patterns,
        parallel_threshold: config.parallel_threshold(),
    })
}

fn select_listing(
    prepared: &PreparedSelection,
    input: &SelectCommandInput<'_>,
    listing: &str,
) -> Result<CliOutput, CliError> {
    let mode = prepared.mode;
    let candidates = match parse_candidates(listing, input.candidate_format) {
        Ok(candidates) => candidates,
        Err(error) => return Ok(fail(mode, &ErrorEnvelope::from(error))),
    };

    let report = select_candidates(
        &prepared.patterns,
        SelectCandidatesInput {
            candidates,
            parallel_threshold: prepared.parallel_threshold,
        },
    );

    let mut stderr = String::new();
    log_info(
        &mut stderr,
        &format!(
            "selected {} of {} candidates ({} excluded)",
            report.selected.len(),
            report.total,
            report.excluded_count
        ),
        mode.no_progress,
    );

    let stdout = if mode.is_ndjson() {
        format_select_ndjson(&report)?
    } else if mode.is_json() {
        format_select_json(&report)?
    } else {
        format_select_text(&report)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

fn fail(mode: OutputMode, error: &ErrorEnvelope) -> CliOutput {
    format_error_output(mode, error, ExitCode::for_envelope(error))
}

fn format_select_json(report: &SelectionReport) -> Result<String, CliError> {
    let payload = serde_json::json!({
        "status": "ok",
        "report": report,
    });
    let mut out = serde_json::to_string_pretty(&payload)?;
    out.push('\n');
    Ok(out)
}

fn format_select_ndjson(report: &SelectionReport) -> Result<String, CliError> {
    let mut out = String::new();
    for candidate in &report.selected {
        let payload = serde_json::json!({
            "type": "candidate",
            "candidate": candidate,
        });
        out.push_str(&serde_json::to_string(&payload)?);
        out.push('\n');
    }
    out.push_str(&format_ndjson_summary(
        "ok",
        "select",
        Some(serde_json::json!({
            "total": report.total,
            "selected": report.selected.len(),
            "excluded": report.excluded_count,
            "unmatched": report.unmatched_count(),
        })),
    ));
    Ok(out)
}

fn format_select_text(report: &SelectionReport) -> String {
    let mut out = String::new();
    for candidate in &report.selected {
        let _ = writeln!(out, "{candidate}");
    }
    out
}
