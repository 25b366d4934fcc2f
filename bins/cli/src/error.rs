//! CLI error and exit code types.

use method_selector_shared::{ErrorClass, ErrorCode, ErrorEnvelope};

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Ok = 0,
    InvalidInput = 2,
    Io = 3,
    Internal = 1,
}

impl ExitCode {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Caller mistakes map to `InvalidInput`; everything else is internal.
    #[must_use]
    pub const fn for_envelope(error: &ErrorEnvelope) -> Self {
        if error.is_expected() {
            Self::InvalidInput
        } else {
            Self::Internal
        }
    }
}

/// Failures that abort a command before an envelope can be rendered.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidInput(_) => ExitCode::InvalidInput,
            Self::Io(_) => ExitCode::Io,
            Self::Serialization(_) => ExitCode::Internal,
        }
    }

    /// Envelope form used when the failure is rendered as JSON or NDJSON.
    #[must_use]
    pub fn into_envelope(self) -> ErrorEnvelope {
        match self {
            Self::InvalidInput(message) => {
                ErrorEnvelope::expected(ErrorCode::invalid_input(), message)
            },
            Self::Io(error) => ErrorEnvelope::from(error),
            Self::Serialization(error) => ErrorEnvelope::unexpected(
                ErrorCode::internal(),
                error.to_string(),
                ErrorClass::NonRetriable,
            ),
        }
    }
}
