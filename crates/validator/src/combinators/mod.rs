//! Structural combinators and the outcome cache
//!
//! - [`sequence`]: every list item satisfies a child node
//! - [`record`]: every declared field satisfies its node
//! - [`cached`]: outcome cache shared along a derivation chain

pub mod cached;
pub mod record;
pub mod sequence;

pub use cached::{CacheStats, DEFAULT_CACHE_CAPACITY, OutcomeCache, cache_key};
pub use record::{FORM_ERROR_KEY, Shape, record};
pub use sequence::{DEFAULT_BATCH_SIZE, sequence, sequence_batched};
