//! # method-selector-domain
//!
//! The selector engine: compiles method-selection patterns and evaluates them
//! against candidate methods.
//!
//! ```text
//! [!]<class name>[:<method name>[:<signature>]]
//! ```
//!
//! - **Matchers** - [`StringMatcher`], chosen by the position of `^`
//! - **Patterns** - [`CompiledPattern`], built once by [`compile`] / [`PatternSet::compile`]
//! - **Candidates** - [`Candidate`] and [`MethodSignature`]
//! - **Selection** - [`is_selected`], [`PatternSet::verdict`]
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared`
//! - Pure logic with no I/O; every public type is `Send + Sync`

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub use method_selector_shared::shared_crate_version;

pub mod candidate;
pub mod matcher;
pub mod pattern;
pub mod selector;
pub mod signature;

pub use candidate::Candidate;
pub use matcher::{ANCHOR, StringMatcher};
pub use pattern::{
    COMPONENT_SEPARATOR, CompiledPattern, EXCLUSION_MARKER, MAX_SEPARATORS, PatternError,
};
pub use selector::{
    EmptyPatternPolicy, PatternSet, SelectionOptions, Verdict, compile, is_selected,
};
pub use signature::{
    MethodSignature, SignatureError, SignatureMatching, descriptor_to_source,
    source_to_descriptor,
};

/// Help text describing the pattern grammar, shown by batch commands.
pub const PATTERN_HELP: &str = r#"A pattern is a class name pattern followed by an optional method name
pattern separated by a ':' further followed by an optional signature:

  <class name>[:<method name>[:<signature>]]

For example, the list of patterns:

     "Object:wait", "String", "Util:add:(int,float)"

will match all methods in a class whose name contains "Object" where the
method name contains "wait", all methods in a class whose name
contains "String" and all methods in any class whose name
contains "Util", the method name contains "add" and the
signature is (int, float).

The type of matching performed for a given class/method name is determined
by the position of '^' in the pattern name as follows:

Position of '^'   | Match algorithm
 ------------------+------------------
 start AND end     | Equality
 start             | Prefix
 end               | Suffix
 absent            | Substring

For example, "^java.util:^toString^" matches all methods named "toString" in
any class whose name starts with "java.util".

The matching performed on a signature is always a substring test. Signatures can
be specified either in Java source syntax (e.g. "int,String") or JVM internal syntax
(e.g. "IFLjava/lang/String;"). The latter must always use fully qualified type
names whereas the former must not.

Any pattern starting with "!" is an exclusion specification. Any class or method
matched by an exclusion specification (the pattern minus the leading "!") is
excluded, even if an inclusion pattern also matches it.
"#;

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
