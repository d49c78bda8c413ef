//! # formguard-validator
//!
//! Composable, asynchronous validation for form input and media uploads.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use formguard_validator::prelude::*;
//!
//! let signup = record(
//!     Shape::new()
//!         .field("username", text().min_length(3, None).max_length(20, None))
//!         .field("avatar", image(5.0, DimensionBounds::new().min_width(64)).optional()),
//! );
//!
//! match signup.evaluate(candidate).await? {
//!     Outcome::Valid(values) => save(values),
//!     Outcome::Invalid(errors) => show(errors),
//! }
//! ```
//!
//! ## Building nodes
//!
//! Every builder call on a [`Node`] returns a new node. Refinements layer a
//! check onto the previous node's success value; combinators compose child
//! nodes into [`sequence`](combinators::sequence) and
//! [`record`](combinators::record) parents.
//!
//! ## Evaluating
//!
//! [`Node::evaluate_safe`] returns an [`Outcome`]; [`Node::evaluate_or_throw`]
//! returns the value or [`Error::Invalid`]. Faults such as cancellation or a
//! failing media probe are returned as [`Fault`] by both.
//!
//! ## Media
//!
//! File refinements reach platform decoders only through the
//! [`MediaProbe`](media::MediaProbe) carried by the [`EvalContext`].

#![allow(clippy::type_complexity)]

pub mod combinators;
pub mod config;
pub mod error;
pub mod foundation;
pub mod media;
pub mod node;
pub mod prelude;
pub mod snapshot;
pub mod validators;

pub use combinators::{Shape, record, sequence, sequence_batched};
pub use config::ValidatorConfig;
pub use error::{BoxError, Error, Fault, ProbeError, Result};
pub use foundation::{
    Candidate, EvalContext, FieldErrors, FileCandidate, FileCategory, Outcome, Progress,
    ProgressUpdate, Record,
};
pub use node::Node;
pub use snapshot::NodeSnapshot;
pub use validators::{DimensionBounds, any, boolean, custom, file, image, number, text};
