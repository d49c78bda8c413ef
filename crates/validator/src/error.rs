//! Error types for validation
use crate::foundation::FieldErrors;
use thiserror::Error;

/// Boxed error returned by external checks and verifiers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for validation entry points
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure reported by a [`MediaProbe`](crate::media::MediaProbe).
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The probe cannot perform this operation for the given media type
    #[error("probe cannot {operation} '{mime_type}' content")]
    Unsupported {
        /// The operation that was requested
        operation: &'static str,
        /// The MIME type of the file
        mime_type: String,
    },

    /// The file content does not match its declared format
    #[error("malformed {format} data: {reason}")]
    Malformed {
        /// The format being decoded
        format: &'static str,
        /// What went wrong
        reason: String,
    },

    /// Underlying IO failed
    #[error("probe IO failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ProbeError {
    pub(crate) fn unsupported(operation: &'static str, mime_type: &str) -> Self {
        Self::Unsupported {
            operation,
            mime_type: mime_type.to_owned(),
        }
    }

    pub(crate) fn malformed(format: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            reason: reason.into(),
        }
    }
}

/// An evaluation failure that is not a validation outcome.
///
/// Faults never land in a [`FieldErrors`] map; they abort the evaluation.
#[derive(Error, Debug)]
pub enum Fault {
    /// The evaluation context's cancellation token fired
    #[error("evaluation cancelled")]
    Cancelled,

    /// An external check or verifier returned an error
    #[error("external check '{check}' failed: {source}")]
    External {
        /// Name of the check
        check: String,
        /// The underlying error
        #[source]
        source: BoxError,
    },

    /// A media probe failed
    #[error("media probe failed: {0}")]
    Probe(#[from] ProbeError),
}

impl Fault {
    pub fn external(check: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::External {
            check: check.into(),
            source: source.into(),
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Error type of [`Node::evaluate_or_throw`](crate::Node::evaluate_or_throw)
/// and of configuration entry points.
#[derive(Error, Debug)]
pub enum Error {
    /// Validation failed; `field` and `message` mirror the first map entry
    #[error("{message}")]
    Invalid {
        /// Key of the first error
        field: String,
        /// Message of the first error
        message: String,
        /// Every error produced by the evaluation
        errors: FieldErrors,
    },

    /// Evaluation aborted
    #[error(transparent)]
    Fault(#[from] Fault),

    /// Invalid builder arguments or configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Builds `Error::Invalid` from an error map.
    pub fn invalid(errors: FieldErrors, fallback_field: &str) -> Self {
        let (field, message) = errors
            .first()
            .map(|(field, message)| (field.to_owned(), message.to_owned()))
            .unwrap_or_else(|| (fallback_field.to_owned(), "Validation failed".to_owned()));
        Self::Invalid {
            field,
            message,
            errors,
        }
    }

    /// The error map, when this is a validation failure.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid { errors, .. } => Some(errors),
            _ => None,
        }
    }
}
