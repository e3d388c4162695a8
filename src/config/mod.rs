//! Schema-driven settings resolution.
//!
//! This module turns a settings declaration into a populated instance by
//! merging three sources, later ones overriding earlier ones:
//! - Declared default values
//! - Environment variables (unprefixed, then prefixed)
//! - CLI arguments
//!
//! It also produces redacted copies with secret fields cleared, for logging.
//!
//! # Example
//!
//! ```rust,no_run
//! use settings_reader::config::{ConfigReader, Settings};
//! use std::time::Duration;
//!
//! settings_reader::settings! {
//!     #[derive(Debug, Clone)]
//!     pub struct Config {
//!         pub port: String as "Port" = "8080" => "The port to listen on",
//!         pub grace_period: Duration as "GracePeriod" = "5s" => "Shutdown grace period",
//!         pub api_key: String as "APIKey" = ",secret" => "The API key",
//!     }
//! }
//!
//! // Read from the process arguments and environment, exiting on error
//! let config = ConfigReader::<Config>::new("my-app").read_or_exit().settings;
//!
//! // Safe to log
//! println!("{}", config.without_secrets().snapshot());
//! ```

pub mod dump;
pub mod env;
pub mod error;
pub mod naming;
pub mod redact;
pub mod resolver;
pub mod schema;
pub mod settings;
pub mod value;

pub use dump::{Snapshot, SnapshotEntry};
pub use env::{Environment, ProcessEnv};
pub use error::{ConfigError, SchemaError, ValueError};
pub use redact::without_secrets;
pub use resolver::{ConfigReader, Resolution, Source};
pub use schema::{FieldDescriptor, FieldSpec, Schema};
pub use settings::Settings;
pub use value::{SettingValue, Value, ValueKind};
