//! Patterns command handler: prints the pattern grammar.

use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use crate::{CliOutput, format_ndjson_summary};
use method_selector_domain::PATTERN_HELP;

/// Run the patterns command.
pub fn run_patterns(mode: OutputMode) -> Result<CliOutput, CliError> {
    let stdout = if mode.is_ndjson() {
        format_ndjson_summary(
            "ok",
            "patterns",
            Some(serde_json::json!({ "help": PATTERN_HELP })),
        )
    } else if mode.is_json() {
        let payload = serde_json::json!({ "status": "ok", "help": PATTERN_HELP });
        let mut output = serde_json::to_string_pretty(&payload)?;
        output.push('\n');
        output
    } else {
        PATTERN_HELP.to_string()
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
