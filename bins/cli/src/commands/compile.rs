//! Compile command handler: parses patterns and reports their matchers.

use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use crate::{CliOutput, format_error_output, format_ndjson_summary};
use method_selector_app::compile_patterns;
use method_selector_domain::{CompiledPattern, PatternSet, SelectionOptions};
use std::fmt::Write;

/// Run the compile command.
pub fn run_compile(mode: OutputMode, raw_patterns: &[String]) -> Result<CliOutput, CliError> {
    let patterns = match compile_patterns(raw_patterns, SelectionOptions::default()) {
        Ok(patterns) => patterns,
        Err(error) => {
            let exit_code = ExitCode::for_envelope(&error);
            return Ok(format_error_output(mode, &error, exit_code));
        },
    };

    let stdout = if mode.is_ndjson() {
        format_compile_ndjson(&patterns)?
    } else if mode.is_json() {
        format_compile_json(&patterns)?
    } else {
        format_compile_text(&patterns)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

fn format_compile_json(patterns: &PatternSet) -> Result<String, CliError> {
    let payload = serde_json::json!({
        "status": "ok",
        "inclusions": patterns.inclusion_count(),
        "exclusions": patterns.exclusion_count(),
        "patterns": patterns.patterns(),
    });
    let mut out = serde_json::to_string_pretty(&payload)?;
    out.push('\n');
    Ok(out)
}

fn format_compile_ndjson(patterns: &PatternSet) -> Result<String, CliError> {
    let mut out = String::new();
    for pattern in patterns.patterns() {
        let payload = serde_json::json!({
            "type": "pattern",
            "pattern": pattern,
        });
        out.push_str(&serde_json::to_string(&payload)?);
        out.push('\n');
    }
    out.push_str(&format_ndjson_summary(
        "ok",
        "compile",
        Some(serde_json::json!({
            "inclusions": patterns.inclusion_count(),
            "exclusions": patterns.exclusion_count(),
        })),
    ));
    Ok(out)
}

fn format_compile_text(patterns: &PatternSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "status: ok");
    let _ = writeln!(out, "inclusions: {}", patterns.inclusion_count());
    let _ = writeln!(out, "exclusions: {}", patterns.exclusion_count());
    for pattern in patterns.patterns() {
        out.push_str(&describe_pattern(pattern));
        out.push('\n');
    }
    out
}

fn describe_pattern(pattern: &CompiledPattern) -> String {
    let role = if pattern.is_negated() {
        "exclude"
    } else {
        "include"
    };
    let class = pattern.class_matcher();
    let mut line = format!(
        "{role} {raw} class={mode}({needle})",
        raw = pattern.raw(),
        mode = class.mode(),
        needle = class.needle(),
    );
    if let Some(method) = pattern.method_matcher() {
        let _ = write!(line, " method={}({})", method.mode(), method.needle());
    }
    if let Some(signature) = pattern.signature_fragment() {
        let _ = write!(line, " signature=contains({signature})");
    }
    line
}
