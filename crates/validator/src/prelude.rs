//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use formguard_validator::prelude::*;
//!
//! let tags = sequence(text().min_length(1, None).max_length(32, None));
//! ```

// ============================================================================
// FOUNDATION
// ============================================================================

pub use crate::foundation::{
    Candidate, DEFAULT_STAGE, EvalContext, FieldErrors, FileCandidate, FileCategory, FileLike,
    Outcome, Progress, ProgressReporter, ProgressUpdate, Record, TextLike,
};

// ============================================================================
// NODES AND ERRORS
// ============================================================================

pub use crate::error::{BoxError, Error, Fault, ProbeError};
pub use crate::node::{DEFAULT_DESCRIPTION, Node};
pub use crate::snapshot::NodeSnapshot;

// ============================================================================
// VALIDATORS
// ============================================================================

pub use crate::validators::{
    DimensionBounds, FileMetadata, Verdict, Verifier, any, boolean, custom, file, image, number,
    text,
};

// ============================================================================
// COMBINATORS
// ============================================================================

pub use crate::combinators::{FORM_ERROR_KEY, Shape, record, sequence, sequence_batched};

// ============================================================================
// MEDIA
// ============================================================================

pub use crate::media::{Dimensions, HeaderProbe, MediaProbe, StaticProbe};
