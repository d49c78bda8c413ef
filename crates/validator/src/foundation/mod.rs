//! Core value types shared by every node
//!
//! - **Candidates**: [`Candidate`], [`FileCandidate`] and the access traits
//!   refinements use to decide applicability
//! - **Outcomes**: [`Outcome`], [`FieldErrors`]
//! - **Context**: [`EvalContext`], progress reporting
//! - **Categories**: [`FileCategory`] and the extension table

pub mod candidate;
pub mod category;
pub mod context;
pub mod outcome;

pub use candidate::{Candidate, FileCandidate, FileLike, Record, TextLike};
pub use category::{EXTENSION_TABLE, FileCategory};
pub use context::{
    DEFAULT_STAGE, EvalContext, Progress, ProgressReporter, ProgressSink, ProgressUpdate,
};
pub use outcome::{FieldErrors, Outcome};
