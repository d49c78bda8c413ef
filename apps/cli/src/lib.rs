//! # formguard-cli
//!
//! Checks JSON documents against the bundled formguard schemas.
//!
//! Each subcommand lives in its own module with an `Args` struct and a
//! `run_*` handler returning the process exit code.

pub mod check;
pub mod config;
pub mod input;
pub mod list;
pub mod schemas;
