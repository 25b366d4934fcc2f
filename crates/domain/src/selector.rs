//! Selection over an ordered set of compiled patterns.
//!
//! A candidate is selected iff at least one inclusion pattern matches it and no
//! exclusion pattern matches it. Inclusions combine with OR and exclusions with
//! AND-NOT, so the verdict never depends on pattern order.

use crate::candidate::Candidate;
use crate::pattern::{CompiledPattern, PatternError};
use crate::signature::SignatureMatching;
use serde::{Deserialize, Serialize};

/// Verdict when a pattern list contains no inclusion patterns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptyPatternPolicy {
    /// Every candidate not matched by an exclusion is selected.
    #[default]
    SelectAll,
    /// Nothing is selected.
    SelectNone,
}

/// Evaluation knobs fixed when a [`PatternSet`] is compiled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionOptions {
    /// Behaviour when no inclusion pattern is present.
    pub empty_pattern_policy: EmptyPatternPolicy,
    /// How signature fragments are compared.
    pub signature_matching: SignatureMatching,
}

/// Outcome of evaluating one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    /// Included and not excluded.
    Selected,
    /// Matched at least one exclusion pattern.
    Excluded,
    /// No inclusion pattern matched.
    Unmatched,
}

impl Verdict {
    /// Returns true for [`Verdict::Selected`].
    #[must_use]
    pub const fn is_selected(self) -> bool {
        matches!(self, Self::Selected)
    }
}

/// Compile raw patterns in order. The first malformed pattern aborts the compile.
pub fn compile<I, S>(raw_patterns: I) -> Result<Vec<CompiledPattern>, PatternError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw_patterns
        .into_iter()
        .map(|raw| CompiledPattern::parse(raw.as_ref()))
        .collect()
}

/// Decide whether `candidate` is selected by `patterns` under default options.
#[must_use]
pub fn is_selected(candidate: &Candidate, patterns: &[CompiledPattern]) -> bool {
    evaluate(candidate, patterns, SelectionOptions::default()).is_selected()
}

fn evaluate(
    candidate: &Candidate,
    patterns: &[CompiledPattern],
    options: SelectionOptions,
) -> Verdict {
    let accepts = |pattern: &&CompiledPattern| pattern.matches(candidate, options.signature_matching);

    if patterns
        .iter()
        .filter(|pattern| pattern.is_negated())
        .any(|pattern| accepts(&pattern))
    {
        return Verdict::Excluded;
    }

    let mut inclusions = patterns
        .iter()
        .filter(|pattern| !pattern.is_negated())
        .peekable();
    let included = if inclusions.peek().is_none() {
        matches!(options.empty_pattern_policy, EmptyPatternPolicy::SelectAll)
    } else {
        inclusions.any(|pattern| accepts(&pattern))
    };

    if included {
        Verdict::Selected
    } else {
        Verdict::Unmatched
    }
}

/// Immutable compiled pattern list plus the options it is evaluated with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSet {
    patterns: Vec<CompiledPattern>,
    options: SelectionOptions,
}

impl PatternSet {
    /// Compile raw patterns with explicit options.
    pub fn compile<I, S>(raw_patterns: I, options: SelectionOptions) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            patterns: compile(raw_patterns)?,
            options,
        })
    }

    /// Wrap already compiled patterns.
    #[must_use]
    pub const fn from_patterns(patterns: Vec<CompiledPattern>, options: SelectionOptions) -> Self {
        Self { patterns, options }
    }

    /// Compiled patterns in input order.
    #[must_use]
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Options in force.
    #[must_use]
    pub const fn options(&self) -> SelectionOptions {
        self.options
    }

    /// Number of inclusion patterns.
    #[must_use]
    pub fn inclusion_count(&self) -> usize {
        self.patterns.iter().filter(|pattern| !pattern.is_negated()).count()
    }

    /// Number of exclusion patterns.
    #[must_use]
    pub fn exclusion_count(&self) -> usize {
        self.patterns.len() - self.inclusion_count()
    }

    /// Returns true when no patterns were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Evaluate one candidate.
    #[must_use]
    pub fn verdict(&self, candidate: &Candidate) -> Verdict {
        evaluate(candidate, &self.patterns, self.options)
    }

    /// Returns true when the candidate is selected.
    #[must_use]
    pub fn is_selected(&self, candidate: &Candidate) -> bool {
        self.verdict(candidate).is_selected()
    }
}
