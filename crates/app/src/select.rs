//! Batch selection: compile patterns once, then evaluate a candidate listing.

use method_selector_domain::{Candidate, PatternSet, SelectionOptions, Verdict};
use method_selector_shared::{ErrorEnvelope, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

/// Default batch size above which candidates are evaluated on the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4_096;

/// Input payload for [`select_candidates`].
#[derive(Debug, Clone)]
pub struct SelectCandidatesInput {
    /// Candidates in listing order.
    pub candidates: Vec<Candidate>,
    /// Batches larger than this run in parallel.
    pub parallel_threshold: usize,
}

impl SelectCandidatesInput {
    /// Wrap candidates with the default threshold.
    #[must_use]
    pub const fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Outcome of a batch selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionReport {
    /// Selected candidates, in input order.
    pub selected: Vec<Candidate>,
    /// Number of candidates evaluated.
    pub total: usize,
    /// Candidates rejected because an exclusion pattern matched.
    pub excluded_count: usize,
}

impl SelectionReport {
    /// Candidates rejected because no inclusion pattern matched.
    #[must_use]
    pub const fn unmatched_count(&self) -> usize {
        self.total - self.selected.len() - self.excluded_count
    }
}

/// Compile raw patterns into a [`PatternSet`], mapping failures to envelopes.
pub fn compile_patterns<I, S>(raw_patterns: I, options: SelectionOptions) -> Result<PatternSet>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let set = PatternSet::compile(raw_patterns, options).map_err(ErrorEnvelope::from)?;
    tracing::debug!(
        inclusions = set.inclusion_count(),
        exclusions = set.exclusion_count(),
        "patterns.compiled"
    );
    Ok(set)
}

/// Evaluate every candidate against `patterns`.
///
/// Output order follows input order whether or not the batch ran in parallel.
#[tracing::instrument(name = "selection", skip_all, fields(total = input.candidates.len()))]
pub fn select_candidates(patterns: &PatternSet, input: SelectCandidatesInput) -> SelectionReport {
    let started_at = Instant::now();
    let SelectCandidatesInput {
        candidates,
        parallel_threshold,
    } = input;
    let total = candidates.len();
    let parallel = total > parallel_threshold;

    tracing::debug!(
        parallel,
        inclusions = patterns.inclusion_count(),
        exclusions = patterns.exclusion_count(),
        "selection.start"
    );

    let verdicts: Vec<Verdict> = if parallel {
        candidates
            .par_iter()
            .map(|candidate| patterns.verdict(candidate))
            .collect()
    } else {
        candidates
            .iter()
            .map(|candidate| patterns.verdict(candidate))
            .collect()
    };

    let excluded_count = verdicts
        .iter()
        .filter(|verdict| **verdict == Verdict::Excluded)
        .count();
    let selected: Vec<Candidate> = candidates
        .into_iter()
        .zip(verdicts)
        .filter_map(|(candidate, verdict)| verdict.is_selected().then_some(candidate))
        .collect();

    tracing::info!(
        selected = selected.len(),
        excluded = excluded_count,
        duration_ms = duration_ms(started_at),
        "selection.completed"
    );

    SelectionReport {
        selected,
        total,
        excluded_count,
    }
}

fn duration_ms(started_at: Instant) -> u64 {
    u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
}
