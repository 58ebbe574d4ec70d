//! Unified error type for feeder reliability runs
//!
//! Every failure is fatal for the current run: nothing is retried, nothing is
//! partially completed, and no value is ever silently replaced by a default.
//! Each variant names the offending identifier (segment id, branch id,
//! field or configuration key) so callers can point at the bad input.
//!
//! # Example
//!
//! ```ignore
//! use relia_core::{ReliaError, ReliaResult};
//!
//! fn run(segments: Vec<Segment>) -> ReliaResult<()> {
//!     let topology = Topology::build(segments)?;
//!     let report = relia_algo::analyze(&topology, &constants)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Error type shared by all relia crates.
#[derive(Error, Debug)]
pub enum ReliaError {
    /// A segment attribute is missing, mistyped, or out of range
    #[error("invalid field `{field}` on segment {segment}: {reason}")]
    InvalidField {
        segment: String,
        field: String,
        reason: String,
    },

    /// The segment set cannot form a single trunk with attached branches
    #[error("structural error at {subject}: {reason}")]
    Structural { subject: String, reason: String },

    /// The topology is valid but the indices are undefined
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A reliability constant is absent or unusable
    #[error("configuration error at `{key}`: {reason}")]
    Configuration { key: String, reason: String },

    /// I/O errors raised by the loader and writer
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input or settings files
    #[error("parse error: {0}")]
    Parse(String),
}

impl ReliaError {
    pub fn invalid_field(
        segment: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ReliaError::InvalidField {
            segment: segment.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn structural(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        ReliaError::Structural {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ReliaError::Configuration {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Stable name of the error kind, printed by the CLI.
    pub fn kind(&self) -> &'static str {
        match self {
            ReliaError::InvalidField { .. } => "InvalidFieldError",
            ReliaError::Structural { .. } => "StructuralError",
            ReliaError::DegenerateInput(_) => "DegenerateInputError",
            ReliaError::Configuration { .. } => "ConfigurationError",
            ReliaError::Io(_) => "IoError",
            ReliaError::Parse(_) => "ParseError",
        }
    }
}

/// Convenience type alias for Results using ReliaError.
pub type ReliaResult<T> = Result<T, ReliaError>;

// JSON settings files
impl From<serde_json::Error> for ReliaError {
    fn from(err: serde_json::Error) -> Self {
        ReliaError::Parse(err.to_string())
    }
}
