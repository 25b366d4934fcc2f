//! Info command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use method_selector_app::app_crate_version;
use method_selector_config::config_crate_version;
use method_selector_domain::domain_crate_version;

struct BuildInfo {
    name: &'static str,
    version: &'static str,
    domain_version: &'static str,
    config_version: &'static str,
    app_version: &'static str,
    target: String,
    profile: &'static str,
}

impl BuildInfo {
    fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            domain_version: domain_crate_version(),
            config_version: config_crate_version(),
            app_version: app_crate_version(),
            target: format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS),
            profile: if cfg!(debug_assertions) {
                "debug"
            } else {
                "release"
            },
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "version": self.version,
            "domainVersion": self.domain_version,
            "configVersion": self.config_version,
            "appVersion": self.app_version,
            "target": self.target,
            "profile": self.profile,
        })
    }
}

/// Run the info command.
pub fn run_info(mode: OutputMode) -> Result<CliOutput, CliError> {
    let build = BuildInfo::current();

    let stdout = if mode.is_ndjson() {
        let payload = serde_json::json!({
            "type": "summary",
            "status": "ok",
            "kind": "info",
            "build": build.to_json(),
        });
        let mut output = serde_json::to_string(&payload)?;
        output.push('\n');
        output
    } else if mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "build": build.to_json(),
        });
        let mut output = serde_json::to_string_pretty(&payload)?;
        output.push('\n');
        output
    } else {
        format!(
            "status: ok\nname: {}\nversion: {}\ndomain: {}\nconfig: {}\napp: {}\ntarget: {}\nprofile: {}\n",
            build.name,
            build.version,
            build.domain_version,
            build.config_version,
            build.app_version,
            build.target,
            build.profile,
        )
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
