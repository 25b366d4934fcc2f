//! String matchers selected by the position of `^` in a pattern component.
//!
//! | Position of `^` | Matcher            |
//! |-----------------|--------------------|
//! | start AND end   | [`StringMatcher::Equals`]   |
//! | start           | [`StringMatcher::Prefix`]   |
//! | end             | [`StringMatcher::Suffix`]   |
//! | absent          | [`StringMatcher::Contains`] |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Anchor marker used in class and method specs.
pub const ANCHOR: char = '^';

/// Compiled comparison rule for a class or method name.
///
/// Matching is case-sensitive and byte-exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "camelCase")]
pub enum StringMatcher {
    /// Candidate must equal the value.
    Equals(Box<str>),
    /// Candidate must start with the value.
    Prefix(Box<str>),
    /// Candidate must end with the value.
    Suffix(Box<str>),
    /// Candidate must contain the value.
    Contains(Box<str>),
}

impl StringMatcher {
    /// Compile a single class or method spec.
    ///
    /// A lone `^` counts as a leading anchor, so it compiles to `Prefix("")`.
    #[must_use]
    pub fn compile(spec: &str) -> Self {
        let (leading, rest) = spec
            .strip_prefix(ANCHOR)
            .map_or((false, spec), |rest| (true, rest));
        let (trailing, needle) = rest
            .strip_suffix(ANCHOR)
            .map_or((false, rest), |needle| (true, needle));

        let needle: Box<str> = needle.into();
        match (leading, trailing) {
            (true, true) => Self::Equals(needle),
            (true, false) => Self::Prefix(needle),
            (false, true) => Self::Suffix(needle),
            (false, false) => Self::Contains(needle),
        }
    }

    /// Returns true when `value` satisfies this matcher.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Equals(needle) => value == needle.as_ref(),
            Self::Prefix(needle) => value.starts_with(needle.as_ref()),
            Self::Suffix(needle) => value.ends_with(needle.as_ref()),
            Self::Contains(needle) => value.contains(needle.as_ref()),
        }
    }

    /// The value compared against, with anchors stripped.
    #[must_use]
    pub fn needle(&self) -> &str {
        match self {
            Self::Equals(needle)
            | Self::Prefix(needle)
            | Self::Suffix(needle)
            | Self::Contains(needle) => needle,
        }
    }

    /// Stable lower-case name of the match mode.
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Equals(_) => "equals",
            Self::Prefix(_) => "prefix",
            Self::Suffix(_) => "suffix",
            Self::Contains(_) => "contains",
        }
    }
}

impl fmt::Display for StringMatcher {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(needle) => write!(formatter, "{ANCHOR}{needle}{ANCHOR}"),
            Self::Prefix(needle) => write!(formatter, "{ANCHOR}{needle}"),
            Self::Suffix(needle) => write!(formatter, "{needle}{ANCHOR}"),
            Self::Contains(needle) => formatter.write_str(needle),
        }
    }
}
