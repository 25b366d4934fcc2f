//! Method signatures in source syntax (`int,String`) and JVM descriptor syntax
//! (`(ILjava/lang/String;)V`).
//!
//! Signature fragments in patterns are plain substring tests. A candidate keeps
//! the text it was given plus, when the text can be translated, a rendering in
//! the other syntax so a fragment written in either syntax can match.
//!
//! Translation rules:
//! - descriptor → source renders only the parameter list, with simple
//!   (unqualified) class names: `(ILjava/lang/String;)V` → `(int,String)`.
//! - source → descriptor renders only the parameter list and needs every type to
//!   be a primitive, an array of primitives, or a dotted qualified name:
//!   `int,float[]` → `(I[F)`. Simple class names cannot be qualified, so such
//!   signatures have no alternate rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How signature fragments are compared against candidate signatures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignatureMatching {
    /// Test the supplied text and its alternate rendering.
    #[default]
    BothSyntaxes,
    /// Test the supplied text only.
    Literal,
}

/// Errors raised while decoding a JVM method descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// Descriptor does not start with `(` or lacks the closing `)`.
    #[error("descriptor `{descriptor}` must have the form (<params>)<return>")]
    MissingParens {
        /// Offending descriptor.
        descriptor: String,
    },
    /// A type tag is not a JVM base type, object, or array.
    #[error("descriptor `{descriptor}` has unknown type tag `{tag}`")]
    UnknownTypeTag {
        /// Offending descriptor.
        descriptor: String,
        /// Unrecognised tag character.
        tag: char,
    },
    /// An object type lacks its `;` terminator or its name.
    #[error("descriptor `{descriptor}` has an unterminated or empty class name")]
    BadClassName {
        /// Offending descriptor.
        descriptor: String,
    },
    /// Input ended where a type was expected, or trailing text followed the return type.
    #[error("descriptor `{descriptor}` is malformed")]
    Malformed {
        /// Offending descriptor.
        descriptor: String,
    },
}

/// A candidate's signature plus its rendering in the other syntax, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MethodSignature {
    text: Box<str>,
    alternate: Option<Box<str>>,
}

impl MethodSignature {
    /// Build a signature, deriving the alternate rendering when possible.
    pub fn new(text: impl Into<Box<str>>) -> Self {
        let text = text.into();
        let alternate = alternate_rendering(&text).map(String::into_boxed_str);
        Self { text, alternate }
    }

    /// The signature exactly as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The rendering in the other syntax, if the supplied text could be translated.
    #[must_use]
    pub fn alternate(&self) -> Option<&str> {
        self.alternate.as_deref()
    }

    /// Returns true when no signature was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Substring test of `fragment` against this signature.
    #[must_use]
    pub fn contains(&self, fragment: &str, matching: SignatureMatching) -> bool {
        if self.text.contains(fragment) {
            return true;
        }
        match matching {
            SignatureMatching::Literal => false,
            SignatureMatching::BothSyntaxes => self
                .alternate
                .as_deref()
                .is_some_and(|alternate| alternate.contains(fragment)),
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.text)
    }
}

impl From<String> for MethodSignature {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for MethodSignature {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<MethodSignature> for String {
    fn from(value: MethodSignature) -> Self {
        value.text.into_string()
    }
}

fn alternate_rendering(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let rendered = descriptor_to_source(trimmed)
        .ok()
        .or_else(|| source_to_descriptor(trimmed))?;
    (rendered != trimmed).then_some(rendered)
}

/// Render the parameter list of a JVM method descriptor in source syntax.
///
/// The return type is validated but not rendered.
pub fn descriptor_to_source(descriptor: &str) -> Result<String, SignatureError> {
    let missing_parens = || SignatureError::MissingParens {
        descriptor: descriptor.to_owned(),
    };
    let body = descriptor.strip_prefix('(').ok_or_else(missing_parens)?;
    let (mut params, return_type) = body.split_once(')').ok_or_else(missing_parens)?;

    let mut rendered = Vec::new();
    while !params.is_empty() {
        let (name, rest) = take_field_type(params, descriptor)?;
        rendered.push(name);
        params = rest;
    }

    if !return_type.is_empty() && return_type != "V" {
        let (_, rest) = take_field_type(return_type, descriptor)?;
        if !rest.is_empty() {
            return Err(SignatureError::Malformed {
                descriptor: descriptor.to_owned(),
            });
        }
    }

    Ok(format!("({})", rendered.join(",")))
}

/// Render a source-syntax parameter list as a descriptor parameter list.
///
/// Returns `None` when a type cannot be expressed without knowing its package.
#[must_use]
pub fn source_to_descriptor(source: &str) -> Option<String> {
    let inner = source
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(source)
        .trim();

    let mut encoded = String::from("(");
    if !inner.is_empty() {
        for param in inner.split(',') {
            encoded.push_str(&encode_source_type(param.trim())?);
        }
    }
    encoded.push(')');
    Some(encoded)
}

fn take_field_type<'a>(
    input: &'a str,
    descriptor: &str,
) -> Result<(String, &'a str), SignatureError> {
    let element = input.trim_start_matches('[');
    let dimensions = input.len() - element.len();

    let (base, rest) = if let Some(body) = element.strip_prefix('L') {
        let (name, rest) = body
            .split_once(';')
            .filter(|(name, _)| !name.is_empty())
            .ok_or_else(|| SignatureError::BadClassName {
                descriptor: descriptor.to_owned(),
            })?;
        (simple_class_name(name).to_owned(), rest)
    } else {
        let mut chars = element.chars();
        let tag = chars.next().ok_or_else(|| SignatureError::Malformed {
            descriptor: descriptor.to_owned(),
        })?;
        let name = primitive_name(tag).ok_or_else(|| SignatureError::UnknownTypeTag {
            descriptor: descriptor.to_owned(),
            tag,
        })?;
        (name.to_owned(), chars.as_str())
    };

    Ok((format!("{base}{}", "[]".repeat(dimensions)), rest))
}

fn simple_class_name(internal_name: &str) -> &str {
    internal_name
        .rsplit_once('/')
        .map_or(internal_name, |(_, simple)| simple)
}

const fn primitive_name(tag: char) -> Option<&'static str> {
    match tag {
        'B' => Some("byte"),
        'C' => Some("char"),
        'D' => Some("double"),
        'F' => Some("float"),
        'I' => Some("int"),
        'J' => Some("long"),
        'S' => Some("short"),
        'Z' => Some("boolean"),
        _ => None,
    }
}

fn primitive_tag(name: &str) -> Option<char> {
    match name {
        "byte" => Some('B'),
        "char" => Some('C'),
        "double" => Some('D'),
        "float" => Some('F'),
        "int" => Some('I'),
        "long" => Some('J'),
        "short" => Some('S'),
        "boolean" => Some('Z'),
        _ => None,
    }
}

fn encode_source_type(param: &str) -> Option<String> {
    let mut element = param;
    let mut dimensions = 0;
    while let Some(rest) = element.strip_suffix("[]") {
        element = rest.trim_end();
        dimensions += 1;
    }
    if element.is_empty() {
        return None;
    }

    let mut encoded = "[".repeat(dimensions);
    if let Some(tag) = primitive_tag(element) {
        encoded.push(tag);
    } else if element.contains('.') {
        encoded.push('L');
        encoded.push_str(&element.replace('.', "/"));
        encoded.push(';');
    } else {
        return None;
    }
    Some(encoded)
}
