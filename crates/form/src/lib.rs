//! # formguard-form
//!
//! Headless form state driven by a formguard validation node.
//!
//! ```rust,ignore
//! use formguard_form::FormController;
//! use formguard_validator::prelude::*;
//!
//! let form = FormController::new(signup_schema(), Candidate::record::<&str, _>([]))
//!     .with_submit_stage("submit");
//!
//! form.change("username", "al").await?;
//! assert_eq!(form.error("username").as_deref(), Some("Must be at least 3 characters"));
//!
//! if form.submit().await?.is_valid() {
//!     send(form.value());
//! }
//! ```
//!
//! Error maps are stored exactly as the node returns them, and progress
//! reports are kept per field path while a validation is in flight.

mod controller;
mod state;

pub use controller::FormController;
pub use state::FormState;
