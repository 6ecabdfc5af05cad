use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use super::duration::DurationError;

/// Failure to convert raw text into a field's declared type.
///
/// Parser failures keep the exact text that was parsed alongside the
/// parser's own error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoerceError {
    #[error("parsing {input:?}: {source}")]
    Int {
        input: String,
        source: ParseIntError,
    },

    #[error("parsing {input:?}: {source}")]
    Float {
        input: String,
        source: ParseFloatError,
    },

    #[error("parsing {input:?}: value out of range")]
    FloatRange { input: String },

    #[error("parsing {input:?}: unsigned integer cannot carry a sign")]
    UnsignedSign { input: String },

    #[error("parsing {input:?}: invalid boolean literal")]
    Bool { input: String },

    #[error(transparent)]
    Duration(#[from] DurationError),

    #[error("parsing time {input:?} as RFC 3339: {source}")]
    Timestamp {
        input: String,
        source: chrono::ParseError,
    },

    #[error("decoding JSON: {source}")]
    Json {
        input: String,
        source: serde_json::Error,
    },

    #[error("unsupported property kind {0:?}")]
    Unsupported(&'static str),

    #[error("no raw value supplied")]
    MissingValue,
}

impl CoerceError {
    /// The raw text the failing parser was given, when the failure has one.
    pub fn input(&self) -> Option<&str> {
        match self {
            Self::Int { input, .. }
            | Self::Float { input, .. }
            | Self::FloatRange { input }
            | Self::UnsignedSign { input }
            | Self::Bool { input }
            | Self::Timestamp { input, .. }
            | Self::Json { input, .. } => Some(input),
            Self::Duration(_) | Self::Unsupported(_) | Self::MissingValue => None,
        }
    }
}
