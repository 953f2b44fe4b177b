//! # Brig Log
//!
//! Structured logging setup over `tracing-subscriber`.
//!
//! Libraries in this workspace only emit through `tracing`; binaries call
//! one of the init functions here once at startup and keep the returned
//! [`LoggerGuard`] alive.
//!
//! ```rust,no_run
//! fn main() -> Result<(), brig_log::LogError> {
//!     let _guard = brig_log::auto_init()?;
//!     tracing::info!(namespace = "db", "starting");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Fields, Format};
pub use error::LogError;

/// Result type for logger operations.
pub type LogResult<T> = Result<T, LogError>;

/// Pick a configuration from the environment and initialize.
///
/// `BRIG_LOG` or `RUST_LOG` switch to [`Config::from_env`]; otherwise debug
/// builds get [`Config::development`] and release builds
/// [`Config::production`].
pub fn auto_init() -> LogResult<LoggerGuard> {
    if std::env::var("BRIG_LOG").is_ok() || std::env::var("RUST_LOG").is_ok() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with the default configuration.
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with a custom configuration.
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}
