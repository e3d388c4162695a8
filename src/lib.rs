//! # Settings Reader
//!
//! Schema-driven settings resolution for application startup.
//!
//! A settings struct is declared once with field names, defaults,
//! descriptions and secrecy markers. At startup the declaration is turned
//! into a fully populated instance by merging built-in defaults, environment
//! variables and command-line arguments, and into a redacted copy that is
//! safe to log.
//!
//! ## Features
//!
//! - **Declarative Schema**: the [`settings!`] macro generates the struct, its
//!   field descriptors and the [`Settings`](config::Settings) impl
//! - **Fixed Precedence**: CLI arguments over prefixed environment variables
//!   over unprefixed ones over defaults
//! - **Typed Values**: text, booleans, signed and unsigned integers, durations
//! - **Redaction**: secret fields cleared for logging
//! - **Help Output**: `--help` lists every field with its default
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use settings_reader::config::{ConfigReader, Settings};
//!
//! settings_reader::settings! {
//!     #[derive(Debug, Clone)]
//!     pub struct Config {
//!         pub host: String as "Host" = "localhost" => "The host to listen on",
//!         pub api_key: String as "APIKey" = ",secret" => "The API key",
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     let reader = ConfigReader::<Config>::new("my-app").with_env_prefix("MY_APP_");
//!     let config = reader.read_from_process()?.settings;
//!
//!     println!("{}", config.without_secrets().snapshot());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`config::naming`]: argument and environment variable names
//! - [`config::schema`]: field descriptors and schema validation
//! - [`config::value`]: value kinds and text coercion
//! - [`config::resolver`]: the default/environment/CLI merge
//! - [`config::redact`]: secret-free copies
//! - [`config::dump`]: ordered snapshots for logs

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Full version string with name
pub const FULL_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Module Exports
// ============================================================================

/// Settings declaration, resolution and redaction.
pub mod config;

// ============================================================================
// Re-exports for Convenience
// ============================================================================

pub use config::{
    ConfigError, ConfigReader, Environment, ProcessEnv, Resolution, Settings, Snapshot, Source,
    Value, ValueKind,
};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}

// ============================================================================
// Prelude Module
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust
/// use settings_reader::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConfigError, ConfigReader, Settings};
    pub use crate::settings;
    pub use crate::{FULL_VERSION, NAME, VERSION};
}
