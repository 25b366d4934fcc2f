//! Raw pattern parsing into immutable compiled patterns.
//!
//! Grammar: `[!]<class name>[:<method name>[:<signature>]]`.

use crate::candidate::Candidate;
use crate::matcher::StringMatcher;
use crate::signature::SignatureMatching;
use method_selector_shared::{ErrorCode, ErrorEnvelope};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Prefix marking an exclusion pattern.
pub const EXCLUSION_MARKER: char = '!';
/// Separator between class, method, and signature specs.
pub const COMPONENT_SEPARATOR: char = ':';
/// Maximum number of separators in one pattern.
pub const MAX_SEPARATORS: usize = 2;

/// Malformed raw pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// More than two `:` separators.
    #[error(
        "invalid pattern `{pattern}`: found {separators} ':' separators, at most 2 allowed in <class name>[:<method name>[:<signature>]]"
    )]
    TooManySeparators {
        /// Offending raw pattern.
        pattern: String,
        /// Number of separators found.
        separators: usize,
    },
    /// Class spec is empty once `!` and `^` anchors are stripped.
    #[error("invalid pattern `{pattern}`: class name must be non-empty")]
    EmptyClassSpec {
        /// Offending raw pattern.
        pattern: String,
    },
}

impl PatternError {
    /// Raw pattern text that failed to compile.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::TooManySeparators { pattern, .. } | Self::EmptyClassSpec { pattern } => pattern,
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            Self::TooManySeparators { .. } => ErrorCode::new("pattern", "too_many_separators"),
            Self::EmptyClassSpec { .. } => ErrorCode::new("pattern", "empty_class_spec"),
        }
    }
}

impl From<PatternError> for ErrorEnvelope {
    fn from(error: PatternError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string())
            .with_metadata("pattern", error.pattern());
        match error {
            PatternError::TooManySeparators { separators, .. } => {
                envelope.with_metadata("separators", separators.to_string())
            },
            PatternError::EmptyClassSpec { .. } => envelope,
        }
    }
}

/// A raw pattern compiled into matchers. Built only by parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledPattern {
    raw: Box<str>,
    negated: bool,
    class_matcher: StringMatcher,
    #[serde(skip_serializing_if = "Option::is_none")]
    method_matcher: Option<StringMatcher>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature_fragment: Option<Box<str>>,
}

impl CompiledPattern {
    /// Compile one raw pattern string.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let (negated, body) = raw
            .strip_prefix(EXCLUSION_MARKER)
            .map_or((false, raw), |body| (true, body));

        let separators = body.matches(COMPONENT_SEPARATOR).count();
        if separators > MAX_SEPARATORS {
            return Err(PatternError::TooManySeparators {
                pattern: raw.to_owned(),
                separators,
            });
        }

        let mut components = body.splitn(MAX_SEPARATORS + 1, COMPONENT_SEPARATOR);
        let class_spec = components.next().unwrap_or_default();
        let method_spec = components.next();
        let signature_spec = components.next();

        let class_matcher = StringMatcher::compile(class_spec);
        if class_matcher.needle().is_empty() {
            return Err(PatternError::EmptyClassSpec {
                pattern: raw.to_owned(),
            });
        }

        Ok(Self {
            raw: raw.into(),
            negated,
            class_matcher,
            method_matcher: method_spec.map(StringMatcher::compile),
            signature_fragment: signature_spec.map(Into::into),
        })
    }

    /// The pattern text as supplied.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// True for `!`-prefixed exclusion patterns.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        self.negated
    }

    /// Matcher applied to the class name.
    #[must_use]
    pub const fn class_matcher(&self) -> &StringMatcher {
        &self.class_matcher
    }

    /// Matcher applied to the method name; `None` matches every method.
    #[must_use]
    pub const fn method_matcher(&self) -> Option<&StringMatcher> {
        self.method_matcher.as_ref()
    }

    /// Substring required in the signature; `None` matches every signature.
    #[must_use]
    pub fn signature_fragment(&self) -> Option<&str> {
        self.signature_fragment.as_deref()
    }

    /// Returns true when every component of this pattern accepts the candidate.
    ///
    /// Negation is not applied here; see [`crate::PatternSet`].
    #[must_use]
    pub fn matches(&self, candidate: &Candidate, signature_matching: SignatureMatching) -> bool {
        self.class_matcher.matches(candidate.class_name())
            && self
                .method_matcher
                .as_ref()
                .is_none_or(|matcher| matcher.matches(candidate.method_name()))
            && self
                .signature_fragment
                .as_deref()
                .is_none_or(|fragment| candidate.signature().contains(fragment, signature_matching))
    }
}

impl FromStr for CompiledPattern {
    type Err = PatternError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<CompiledPattern, PatternError> {
        CompiledPattern::parse(raw)
    }

    #[test]
    fn class_and_method_default_to_contains() -> Result<(), PatternError> {
        let pattern = parse("Object:wait")?;
        assert!(!pattern.is_negated());
        assert_eq!(
            pattern.class_matcher(),
            &StringMatcher::Contains("Object".into())
        );
        assert_eq!(
            pattern.method_matcher(),
            Some(&StringMatcher::Contains("wait".into()))
        );
        assert_eq!(pattern.signature_fragment(), None);
        Ok(())
    }

    #[test]
    fn anchors_apply_per_component() -> Result<(), PatternError> {
        let pattern = parse("^java.util:^toString^")?;
        assert_eq!(
            pattern.class_matcher(),
            &StringMatcher::Prefix("java.util".into())
        );
        assert_eq!(
            pattern.method_matcher(),
            Some(&StringMatcher::Equals("toString".into()))
        );
        Ok(())
    }

    #[test]
    fn signature_is_kept_verbatim() -> Result<(), PatternError> {
        let pattern = parse("Util:add:(int,float)")?;
        assert_eq!(pattern.signature_fragment(), Some("(int,float)"));

        let anchored = parse("Util:add:^(I")?;
        assert_eq!(anchored.signature_fragment(), Some("^(I"));
        Ok(())
    }

    #[test]
    fn class_only_pattern_matches_all_methods() -> Result<(), PatternError> {
        let pattern = parse("String")?;
        assert_eq!(pattern.method_matcher(), None);
        let candidate = Candidate::new("java.lang.String", "length", "()I");
        assert!(pattern.matches(&candidate, SignatureMatching::BothSyntaxes));
        Ok(())
    }

    #[test]
    fn empty_method_spec_matches_all_methods() -> Result<(), PatternError> {
        let pattern = parse("String:")?;
        assert_eq!(
            pattern.method_matcher(),
            Some(&StringMatcher::Contains("".into()))
        );
        let candidate = Candidate::new("java.lang.String", "length", "");
        assert!(pattern.matches(&candidate, SignatureMatching::BothSyntaxes));
        Ok(())
    }

    #[test]
    fn leading_bang_marks_exclusion() -> Result<(), PatternError> {
        let pattern = parse("!java.lang.StringBuilder")?;
        assert!(pattern.is_negated());
        assert_eq!(
            pattern.class_matcher(),
            &StringMatcher::Contains("java.lang.StringBuilder".into())
        );
        assert_eq!(pattern.raw(), "!java.lang.StringBuilder");
        Ok(())
    }

    #[test]
    fn bare_negation_is_rejected() {
        assert!(matches!(
            parse("!"),
            Err(PatternError::EmptyClassSpec { ref pattern }) if pattern == "!"
        ));
    }

    #[test]
    fn empty_class_specs_are_rejected() {
        for raw in ["", "^", "^^", ":run", "!^:run"] {
            assert!(
                matches!(parse(raw), Err(PatternError::EmptyClassSpec { .. })),
                "expected rejection for {raw:?}"
            );
        }
    }

    #[test]
    fn three_separators_are_rejected() {
        let error = parse("A:B:C:D").err();
        assert!(matches!(
            error,
            Some(PatternError::TooManySeparators { separators: 3, ref pattern }) if pattern == "A:B:C:D"
        ));
    }

    #[test]
    fn errors_convert_to_envelopes_with_pattern_metadata() {
        let envelope = ErrorEnvelope::from(PatternError::TooManySeparators {
            pattern: "A:B:C:D".to_owned(),
            separators: 3,
        });
        assert!(envelope.is_expected());
        assert_eq!(
            envelope.code,
            ErrorCode::new("pattern", "too_many_separators")
        );
        assert_eq!(
            envelope.metadata.get("pattern").map(String::as_str),
            Some("A:B:C:D")
        );
        assert!(envelope.message.contains("A:B:C:D"));
    }

    #[test]
    fn signature_fragment_uses_both_syntaxes() -> Result<(), PatternError> {
        let pattern = parse("Util:add:(int,float)")?;
        let candidate = Candidate::new("com.example.Util", "add", "(IF)V");
        assert!(pattern.matches(&candidate, SignatureMatching::BothSyntaxes));
        assert!(!pattern.matches(&candidate, SignatureMatching::Literal));
        Ok(())
    }

    #[test]
    fn from_str_delegates_to_parse() -> Result<(), PatternError> {
        let pattern: CompiledPattern = "Object:wait".parse()?;
        assert_eq!(pattern.to_string(), "Object:wait");
        Ok(())
    }
}
