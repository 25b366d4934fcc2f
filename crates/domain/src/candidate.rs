//! Candidate methods evaluated by the selector.

use crate::signature::MethodSignature;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One method under consideration: `(class name, method name, signature)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    class_name: Box<str>,
    method_name: Box<str>,
    #[serde(default, skip_serializing_if = "MethodSignature::is_empty")]
    signature: MethodSignature,
}

impl Candidate {
    /// Build a candidate from its three components.
    pub fn new(
        class_name: impl Into<Box<str>>,
        method_name: impl Into<Box<str>>,
        signature: impl Into<MethodSignature>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            signature: signature.into(),
        }
    }

    /// Fully qualified class name, e.g. `java.lang.String`.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Method name, e.g. `toString`.
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Method signature in whichever syntax the scanner produced.
    #[must_use]
    pub const fn signature(&self) -> &MethodSignature {
        &self.signature
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.class_name, self.method_name)?;
        if !self.signature.is_empty() {
            write!(formatter, ":{}", self.signature)?;
        }
        Ok(())
    }
}
