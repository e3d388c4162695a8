//! Settings Reader - Main Entry Point
//!
//! Application bootstrap demonstrating the settings engine: it resolves the
//! application settings from defaults, environment and CLI arguments,
//! initializes logging from them and logs a redacted copy.
//!
//! Commands (first non-flag argument):
//! - none: print the banner and a configuration summary
//! - `show-config`: print the redacted configuration
//! - `env`: list the environment variables each setting reads

use anyhow::{bail, Context, Result};
use std::time::Duration;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use settings_reader::config::{ConfigReader, Resolution, Settings, Snapshot, Source};
use settings_reader::{settings, NAME, VERSION};

/// Prefix for environment variables; unprefixed names are read as well.
const ENV_PREFIX: &str = "SETTINGS_READER_";

/// Shown in place of secret values in logs.
const SECRET_PLACEHOLDER: &str = "...";

settings! {
    /// Config for the application
    #[derive(Debug, Clone)]
    pub struct AppConfig {
        pub host: String as "Host" = "localhost" => "The host to listen on",
        pub port: String as "Port" = "8080" => "The port to listen on",
        pub log_level: String as "LogLevel" = "error" => "The log level",
        pub text_logging: bool as "TextLogging" = "true" => "Log in text format instead of json",
        pub grace_period: Duration as "GracePeriod" = "5s" => "Graceful shutdown grace period",
        pub api_key: String as "APIKey" = ",secret" => "The API key",
        pub api_secret: String as "APISecret" = ",secret" => "The API secret",
    }
}

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
}

/// Print the startup banner with version
fn print_banner() {
    println!(
        "\n{cyan}{bold}  {name}{reset} {dim}v{version}{reset}\n{dim}  Settings from defaults, environment and CLI{reset}\n",
        cyan = colors::CYAN,
        bold = colors::BOLD,
        reset = colors::RESET,
        dim = colors::DIM,
        name = NAME,
        version = VERSION
    );
}

/// Print configuration summary with the source of every value
fn print_config_summary(snapshot: &Snapshot, sources: &[(&'static str, Source)]) {
    println!(
        "{bold}{blue}Configuration:{reset}",
        bold = colors::BOLD,
        blue = colors::BLUE,
        reset = colors::RESET
    );

    let width = snapshot
        .entries()
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(0);

    for entry in snapshot.entries() {
        let source = sources
            .iter()
            .find(|(name, _)| *name == entry.name)
            .map(|(_, source)| *source)
            .unwrap_or(Source::Neutral);
        let color = if source >= Source::EnvironmentUnprefixed {
            colors::GREEN
        } else {
            colors::YELLOW
        };
        println!(
            "  {dim}{name:width$}{reset}  {value}  {color}({source}){reset}",
            name = entry.name,
            value = entry.value,
            width = width,
            dim = colors::DIM,
            color = color,
            reset = colors::RESET
        );
    }

    println!();
}

/// Print the environment variables consulted for each setting
fn print_env_vars(reader: &ConfigReader<AppConfig>) {
    for (field, names) in reader.env_vars() {
        println!("{:<12} {}", field, names.join(", "));
    }
}

/// Initialize the tracing/logging subsystem from the resolved settings
fn init_tracing(log_level: &str, text_logging: bool) -> Result<()> {
    let level: Level = log_level
        .parse()
        .with_context(|| format!("Invalid log level '{}'", log_level))?;

    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let text_layer = text_logging.then(|| fmt::layer().with_target(true));
    let json_layer = (!text_logging).then(|| fmt::layer().json());

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// The snapshot written to logs: secrets cleared, then marked with a
/// placeholder.
fn loggable(config: &AppConfig) -> Snapshot {
    config
        .without_secrets()
        .snapshot()
        .mask_secrets(SECRET_PLACEHOLDER)
}

fn main() -> Result<()> {
    let reader = ConfigReader::<AppConfig>::new(NAME)
        .with_about("Schema-driven settings resolution demo")
        .with_env_prefix(ENV_PREFIX);

    let Resolution {
        settings: config,
        sources,
        trailing,
    } = reader.read_or_exit();

    init_tracing(&config.log_level, config.text_logging)
        .context("Failed to initialize logging")?;

    let snapshot = loggable(&config);
    info!(
        application = NAME,
        version = VERSION,
        config = %serde_json::to_string(&snapshot)?,
        "lifecycle start"
    );
    for (field, source) in &sources {
        debug!(field = *field, source = %source, "setting resolved");
    }

    match trailing.first().map(String::as_str) {
        None => {
            print_banner();
            print_config_summary(&snapshot, &sources);
        }
        Some("show-config") => print!("{}", snapshot),
        Some("env") => print_env_vars(&reader),
        Some(other) => bail!("Unknown command '{}'", other),
    }

    info!(
        application = NAME,
        grace_period = %humantime::format_duration(config.grace_period),
        "lifecycle stop"
    );
    Ok(())
}
