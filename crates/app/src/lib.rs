//! # method-selector-app
//!
//! Batch use cases built on the selector engine: candidate listing parsing
//! and parallel selection with structured `tracing` events.
//! This crate depends on `domain` and `shared`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod candidates;
pub mod select;

pub use candidates::{CandidateFormat, CandidateParseError, parse_candidates};
pub use select::{
    DEFAULT_PARALLEL_THRESHOLD, SelectCandidatesInput, SelectionReport, compile_patterns,
    select_candidates,
};

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
