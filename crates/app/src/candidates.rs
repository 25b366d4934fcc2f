//! Parse candidate listings produced by an external class scanner.
//!
//! Two line-oriented formats are accepted:
//! - `text`: `<class> <method> [<signature>]`, whitespace separated. Everything
//!   after the method name is the signature, kept verbatim. Blank lines and
//!   lines starting with `#` are skipped.
//! - `ndjson`: one `{"className", "methodName", "signature"?}` object per line.

use method_selector_domain::Candidate;
use method_selector_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;

const COMMENT_MARKER: char = '#';

/// Listing format accepted by [`parse_candidates`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CandidateFormat {
    /// Whitespace-separated text lines.
    #[default]
    Text,
    /// Newline-delimited JSON objects.
    Ndjson,
}

impl CandidateFormat {
    /// Canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Ndjson => "ndjson",
        }
    }
}

impl fmt::Display for CandidateFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A listing line that could not be turned into a candidate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CandidateParseError {
    /// Text line with fewer than two fields.
    #[error("line {line}: expected `<class> <method> [<signature>]`, found `{content}`")]
    MissingFields {
        /// 1-based line number.
        line: usize,
        /// Offending line.
        content: String,
    },
    /// NDJSON line that is not a candidate object.
    #[error("line {line}: invalid candidate JSON: {message}")]
    InvalidJson {
        /// 1-based line number.
        line: usize,
        /// Parser message.
        message: String,
    },
}

impl CandidateParseError {
    /// 1-based line number of the failure.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::MissingFields { line, .. } | Self::InvalidJson { line, .. } => *line,
        }
    }
}

impl From<CandidateParseError> for ErrorEnvelope {
    fn from(error: CandidateParseError) -> Self {
        let code = match &error {
            CandidateParseError::MissingFields { .. } => {
                ErrorCode::new("candidates", "invalid_line")
            },
            CandidateParseError::InvalidJson { .. } => ErrorCode::new("candidates", "invalid_json"),
        };
        Self::expected(code, error.to_string()).with_metadata("line", error.line().to_string())
    }
}

/// Parse a whole listing. The first bad line aborts the parse.
pub fn parse_candidates(
    input: &str,
    format: CandidateFormat,
) -> Result<Vec<Candidate>, CandidateParseError> {
    let candidates = input
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .filter_map(|(line_number, line)| match format {
            CandidateFormat::Text => parse_text_line(line_number, line).transpose(),
            CandidateFormat::Ndjson => Some(parse_ndjson_line(line_number, line)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(format = %format, count = candidates.len(), "candidates.parsed");
    Ok(candidates)
}

fn parse_text_line(line: usize, content: &str) -> Result<Option<Candidate>, CandidateParseError> {
    if content.starts_with(COMMENT_MARKER) {
        return Ok(None);
    }

    let missing = || CandidateParseError::MissingFields {
        line,
        content: content.to_owned(),
    };
    let (class_name, rest) = content.split_once(char::is_whitespace).ok_or_else(missing)?;
    let rest = rest.trim_start();
    let (method_name, signature) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(method_name, signature)| {
            (method_name, signature.trim())
        });
    if method_name.is_empty() {
        return Err(missing());
    }

    Ok(Some(Candidate::new(class_name, method_name, signature)))
}

fn parse_ndjson_line(line: usize, content: &str) -> Result<Candidate, CandidateParseError> {
    serde_json::from_str(content).map_err(|error| CandidateParseError::InvalidJson {
        line,
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lines_split_into_three_fields() -> Result<(), CandidateParseError> {
        let listing = "\
# scanned from boot image
java.lang.Object wait (J)V

java.lang.String length
com.example.Util add (int, float)
";
        let candidates = parse_candidates(listing, CandidateFormat::Text)?;
        let expected = [
            Candidate::new("java.lang.Object", "wait", "(J)V"),
            Candidate::new("java.lang.String", "length", ""),
            Candidate::new("com.example.Util", "add", "(int, float)"),
        ];
        assert_eq!(candidates, expected);
        Ok(())
    }

    #[test]
    fn text_line_without_method_reports_line_number() {
        let result = parse_candidates("java.lang.Object wait\njava.lang.String\n", CandidateFormat::Text);
        assert_eq!(
            result,
            Err(CandidateParseError::MissingFields {
                line: 2,
                content: "java.lang.String".to_owned(),
            })
        );
    }

    #[test]
    fn ndjson_lines_deserialize_candidates() -> Result<(), CandidateParseError> {
        let listing = r#"{"className":"java.lang.Object","methodName":"wait","signature":"(J)V"}

{"className":"java.lang.String","methodName":"length"}"#;
        let candidates = parse_candidates(listing, CandidateFormat::Ndjson)?;
        let methods: Vec<&str> = candidates.iter().map(Candidate::method_name).collect();
        assert_eq!(methods, ["wait", "length"]);
        Ok(())
    }

    #[test]
    fn ndjson_errors_map_to_envelopes() {
        let error = parse_candidates("{\"className\":1}", CandidateFormat::Ndjson).err();
        let envelope = error.map(ErrorEnvelope::from);
        assert_eq!(
            envelope.as_ref().map(|envelope| envelope.code.clone()),
            Some(ErrorCode::new("candidates", "invalid_json"))
        );
        assert_eq!(
            envelope
                .as_ref()
                .and_then(|envelope| envelope.metadata.get("line"))
                .map(String::as_str),
            Some("1")
        );
    }
}
