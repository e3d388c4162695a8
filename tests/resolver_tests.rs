//! Integration tests for settings resolution
//!
//! Tests for default application, environment precedence (prefixed over
//! unprefixed), command-line overrides, value coercion and error reporting,
//! using an in-memory environment instead of the process one.

use std::collections::HashMap;
use std::time::Duration;

use settings_reader::config::{
    ConfigError, ConfigReader, FieldSpec, Schema, SchemaError, Settings, Source, Value, ValueKind,
};

settings_reader::settings! {
    /// Config for the application
    #[derive(Debug, Clone, PartialEq)]
    pub struct AppConfig {
        pub host: String as "Host" = "localhost" => "The host to listen on",
        pub port: String as "Port" = "8080" => "The port to listen on",
        pub log_level: String as "LogLevel" = "error" => "The log level",
        pub text_logging: bool as "TextLogging" = "true" => "Log in text format instead of json",
        pub grace_period: Duration as "GracePeriod" = "5s" => "Graceful shutdown grace period",
        pub max_retries: u64 as "MaxRetries" = "3" => "Retry limit",
        pub clock_skew: i64 as "ClockSkew" = "-2" => "Clock skew in seconds",
        pub api_key: String as "APIKey" = ",secret" => "The API key",
        pub api_secret: String as "APISecret" = ",secret" => "The API secret",
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

const PREFIX: &str = "MY_APP_";

fn reader() -> ConfigReader<AppConfig> {
    ConfigReader::new("my-app").with_env_prefix(PREFIX)
}

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn no_args() -> Vec<String> {
    Vec::new()
}

// ============================================================================
// Default Tests
// ============================================================================

#[test]
fn test_defaults_without_env_or_args() {
    let config = reader().read(no_args(), &env(&[])).unwrap();

    assert_eq!(config, AppConfig::defaults());
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, "8080");
    assert_eq!(config.log_level, "error");
    assert!(config.text_logging);
    assert_eq!(config.grace_period, Duration::from_secs(5));
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.clock_skew, -2);
    assert_eq!(config.api_key, "");
    assert_eq!(config.api_secret, "");
}

#[test]
fn test_default_value_matches_empty_resolution() {
    let reader = reader();
    let resolved = reader.read(no_args(), &env(&[])).unwrap();
    assert_eq!(reader.default_value(), resolved);
}

#[test]
fn test_unrelated_environment_is_ignored() {
    let config = reader()
        .read(no_args(), &env(&[("HOSTNAME", "box"), ("MY_APP_PORTS", "1")]))
        .unwrap();
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, "8080");
}

// ============================================================================
// Precedence Tests
// ============================================================================

#[test]
fn test_unprefixed_environment_overrides_default() {
    let config = reader()
        .read(no_args(), &env(&[("LOG_LEVEL", "debug")]))
        .unwrap();
    assert_eq!(config.log_level, "debug");
}

#[test]
fn test_prefixed_environment_beats_unprefixed() {
    let config = reader()
        .read(
            no_args(),
            &env(&[("LOG_LEVEL", "debug"), ("MY_APP_LOG_LEVEL", "warn")]),
        )
        .unwrap();
    assert_eq!(config.log_level, "warn");
}

#[test]
fn test_command_line_beats_environment() {
    let config = reader()
        .read(
            ["--log-level", "trace"],
            &env(&[("LOG_LEVEL", "debug"), ("MY_APP_LOG_LEVEL", "warn")]),
        )
        .unwrap();
    assert_eq!(config.log_level, "trace");
}

#[test]
fn test_port_precedence_scenario() {
    let reader = reader();

    let config = reader.read(no_args(), &env(&[])).unwrap();
    assert_eq!(config.port, "8080");

    let config = reader.read(no_args(), &env(&[("PORT", "9090")])).unwrap();
    assert_eq!(config.port, "9090");

    let config = reader
        .read(["--port=9999"], &env(&[("PORT", "9090")]))
        .unwrap();
    assert_eq!(config.port, "9999");
}

#[test]
fn test_empty_environment_value_still_applies() {
    let config = reader().read(no_args(), &env(&[("HOST", "")])).unwrap();
    assert_eq!(config.host, "");
}

#[test]
fn test_without_prefix_only_unprefixed_is_read() {
    let reader = ConfigReader::<AppConfig>::new("my-app");
    let config = reader
        .read(no_args(), &env(&[("MY_APP_PORT", "1"), ("PORT", "2")]))
        .unwrap();
    assert_eq!(config.port, "2");
}

#[test]
fn test_sources_are_reported() {
    let resolution = reader()
        .resolve(
            ["--host=example.org"],
            &env(&[("PORT", "9090"), ("MY_APP_API_KEY", "k")]),
        )
        .unwrap();

    assert_eq!(resolution.source_of("Host"), Some(Source::CommandLine));
    assert_eq!(resolution.source_of("Port"), Some(Source::EnvironmentUnprefixed));
    assert_eq!(resolution.source_of("APIKey"), Some(Source::EnvironmentPrefixed));
    assert_eq!(resolution.source_of("LogLevel"), Some(Source::Default));
    assert_eq!(resolution.source_of("APISecret"), Some(Source::Neutral));
    assert_eq!(resolution.sources.len(), AppConfig::schema().len());
}

// ============================================================================
// Naming Tests
// ============================================================================

#[test]
fn test_derived_names_for_declared_fields() {
    let schema = AppConfig::schema();

    let grace = schema.field("GracePeriod").unwrap();
    assert_eq!(grace.arg_name(), "grace-period");
    assert_eq!(grace.env_name(), "GRACE_PERIOD");
    assert_eq!(grace.prefixed_env_name(PREFIX), "MY_APP_GRACE_PERIOD");

    let key = schema.field("APIKey").unwrap();
    assert_eq!(key.arg_name(), "api-key");
    assert_eq!(key.env_name(), "API_KEY");
}

#[test]
fn test_env_vars_listing_follows_naming() {
    let vars = reader().env_vars();
    let grace = vars.iter().find(|(name, _)| *name == "GracePeriod").unwrap();
    assert_eq!(grace.1, vec!["MY_APP_GRACE_PERIOD", "GRACE_PERIOD"]);
}

// ============================================================================
// Coercion Tests
// ============================================================================

#[test]
fn test_duration_from_environment() {
    let config = reader()
        .read(no_args(), &env(&[("GRACE_PERIOD", "2m")]))
        .unwrap();
    assert_eq!(config.grace_period, Duration::from_secs(120));
}

#[test]
fn test_numbers_and_durations_are_exact() {
    let config = reader()
        .read(
            [
                "--max-retries=18446744073709551615",
                "--clock-skew=-9223372036854775808",
                "--grace-period=1h30m15s",
            ],
            &env(&[]),
        )
        .unwrap();
    assert_eq!(config.max_retries, u64::MAX);
    assert_eq!(config.clock_skew, i64::MIN);
    assert_eq!(config.grace_period, Duration::from_secs(5415));
}

#[test]
fn test_separate_value_may_start_with_hyphen() {
    let config = reader()
        .read(["--api-key", "-abc", "--clock-skew", "-30"], &env(&[]))
        .unwrap();
    assert_eq!(config.api_key, "-abc");
    assert_eq!(config.clock_skew, -30);

    let config = reader().read(["--api-key=-abc"], &env(&[])).unwrap();
    assert_eq!(config.api_key, "-abc");
}

#[test]
fn test_boolean_forms() {
    let reader = reader();
    let cases = [
        ("1", true),
        ("t", true),
        ("TRUE", true),
        ("0", false),
        ("F", false),
        ("False", false),
    ];
    for (input, expected) in cases {
        let config = reader
            .read(no_args(), &env(&[("TEXT_LOGGING", input)]))
            .unwrap();
        assert_eq!(config.text_logging, expected, "input {input:?}");
    }

    let config = reader.read(["--text-logging=false"], &env(&[])).unwrap();
    assert!(!config.text_logging);
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_malformed_duration_argument_is_error() {
    let err = reader()
        .read(["--grace-period=notaduration"], &env(&[]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::CommandLine(_)));
    assert!(!err.is_informational());
}

#[test]
fn test_unknown_flag_is_error() {
    let err = reader().read(["--no-such-flag"], &env(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::CommandLine(_)));
}

#[test]
fn test_negative_unsigned_is_error() {
    assert!(reader().read(["--max-retries=-1"], &env(&[])).is_err());
}

#[test]
fn test_malformed_environment_is_error() {
    let err = reader()
        .read(no_args(), &env(&[("MY_APP_MAX_RETRIES", "lots")]))
        .unwrap_err();
    match err {
        ConfigError::InvalidEnvironment {
            var, field, kind, source,
        } => {
            assert_eq!(var, "MY_APP_MAX_RETRIES");
            assert_eq!(field, "MaxRetries");
            assert_eq!(kind, ValueKind::Uint);
            assert!(source.is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_environment_beats_valid_argument() {
    let result = reader().read(["--grace-period=1s"], &env(&[("GRACE_PERIOD", "soon")]));
    assert!(matches!(result, Err(ConfigError::InvalidEnvironment { .. })));
}

#[test]
fn test_help_lists_fields_with_defaults() {
    let help = reader().command().render_help().to_string();
    assert!(help.contains("--host <TEXT>"));
    assert!(help.contains("The host to listen on"));
    assert!(help.contains("[default: localhost]"));
    assert!(help.contains("--max-retries <UINT>"));
    assert!(help.contains("--api-secret <TEXT>"));
}

// ============================================================================
// Hand-written Settings Tests
// ============================================================================

/// A settings type implemented without the declaration macro.
#[derive(Debug, Default)]
struct Manual {
    name: String,
    workers: u64,
}

impl Settings for Manual {
    fn schema() -> &'static Schema {
        static SCHEMA: once_cell::sync::Lazy<Schema> = once_cell::sync::Lazy::new(|| {
            Schema::from_specs(
                "Manual",
                &[
                    FieldSpec::new("Name", ValueKind::Text, "worker", "Worker name"),
                    FieldSpec::new("Workers", ValueKind::Uint, "4", "Worker count"),
                ],
            )
            .unwrap_or_else(|err| settings_reader::config::schema::fatal(err))
        });
        &SCHEMA
    }

    fn neutral() -> Self {
        Self::default()
    }

    fn value(&self, name: &str) -> Option<Value> {
        match name {
            "Name" => Some(Value::Text(self.name.clone())),
            "Workers" => Some(Value::Uint(self.workers)),
            _ => None,
        }
    }

    fn set_value(&mut self, name: &str, value: Value) -> Result<(), SchemaError> {
        match (name, value) {
            ("Name", Value::Text(text)) => self.name = text,
            ("Workers", Value::Uint(n)) => self.workers = n,
            _ => {
                return Err(SchemaError::UnknownField {
                    settings: "Manual",
                    field: name.to_string(),
                })
            }
        }
        Ok(())
    }

    fn copy_field(&mut self, source: &Self, name: &str) {
        match name {
            "Name" => self.name = source.name.clone(),
            "Workers" => self.workers = source.workers,
            _ => {}
        }
    }
}

#[test]
fn test_hand_written_settings_resolve() {
    let reader = ConfigReader::<Manual>::new("manual");
    let manual = reader
        .read(["--workers", "8"], &env(&[("NAME", "crawler")]))
        .unwrap();
    assert_eq!(manual.name, "crawler");
    assert_eq!(manual.workers, 8);
}
