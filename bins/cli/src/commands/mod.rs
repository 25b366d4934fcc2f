//! CLI command handlers.

pub mod compile;
pub mod config;
pub mod info;
pub mod patterns;
pub mod select;

pub use compile::run_compile;
pub use config::{run_config_check, run_config_show};
pub use info::run_info;
pub use patterns::run_patterns;
pub use select::{CandidateSource, SelectCommandInput, run_select};
