//! Built-in validators
//!
//! # Categories
//!
//! - **Base types**: [`text`], [`number`], [`boolean`], [`file`], [`any`], [`custom`]
//! - **Text**: `min_length`, `max_length`, `pattern`
//! - **Files**: `accept`, `max_size`, `name_matches`, `extensions`, `metadata`,
//!   `verify_with`
//! - **Media**: `dimensions`, `max_duration`, `compress`, and the [`image`]
//!   shortcut
//!
//! # Examples
//!
//! ```rust,ignore
//! use formguard_validator::prelude::*;
//!
//! let avatar = image(5.0, DimensionBounds::new().min_width(64).max_width(4096))
//!     .extensions(["jpg", "jpeg", "png"], None)
//!     .describe("avatar");
//! ```

pub mod files;
pub mod media;
pub mod strings;
pub mod types;

pub use files::{BYTES_PER_MB, FileMetadata, Verdict, Verifier};
pub use media::{DimensionBounds, image};
pub use types::{any, boolean, custom, file, number, text};
