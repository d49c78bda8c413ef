//! # formguard-log
//!
//! Logging setup shared by formguard binaries and tests.
//!
//! ```rust,ignore
//! fn main() -> formguard_log::Result<()> {
//!     let _guard = formguard_log::auto_init()?;
//!     tracing::info!(schema = "signup", "checking input");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod builder;
mod config;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format, WriterConfig};

/// Result type for logger operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for logger operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The filter directive does not parse
    #[error("Invalid filter '{directive}': {reason}")]
    Filter { directive: String, reason: String },

    /// A global subscriber is already installed
    #[error("Logger initialization failed: {0}")]
    Init(String),
}

// ============================================================================
// Initialization Functions
// ============================================================================

/// Picks a configuration from the environment and installs it globally.
///
/// `FORMGUARD_LOG` or `RUST_LOG` selects [`Config::from_env`]; otherwise
/// debug builds use [`Config::development`] and release builds
/// [`Config::production`].
pub fn auto_init() -> Result<LoggerGuard> {
    let configured = std::env::var("FORMGUARD_LOG").is_ok() || std::env::var("RUST_LOG").is_ok();
    if configured {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with default configuration
pub fn init() -> Result<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with custom configuration
pub fn init_with(config: Config) -> Result<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Installs a test logger for the current thread.
pub fn init_test() -> Result<LoggerGuard> {
    LoggerBuilder::from_config(Config::test()).build_scoped()
}
