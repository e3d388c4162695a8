//! Derivation of command-line and environment variable names from field names.
//!
//! Field names are written in `PascalCase` (`GracePeriod`, `APIKey`). The
//! command-line form is kebab-case (`grace-period`, `api-key`) and the
//! environment form is upper snake case (`GRACE_PERIOD`, `API_KEY`).

use once_cell::sync::Lazy;
use regex::Regex;

/// A capital letter that starts a new lowercase run.
static FIRST_CAP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid first-cap regex"));

/// A run of capitals following a lowercase letter or digit.
static ALL_CAP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z]+)").expect("valid all-cap regex"));

/// Converts a field name into its command-line argument name.
///
/// # Example
///
/// ```rust
/// use settings_reader::config::naming::to_arg_name;
///
/// assert_eq!(to_arg_name("GracePeriod"), "grace-period");
/// assert_eq!(to_arg_name("APIKey"), "api-key");
/// ```
pub fn to_arg_name(field_name: &str) -> String {
    let kebab = FIRST_CAP_RE.replace_all(field_name, "${1}-${2}");
    let kebab = ALL_CAP_RE.replace_all(&kebab, "${1}-${2}");
    kebab.to_lowercase()
}

/// Converts a field name into its environment variable name.
///
/// The prefix is prepended verbatim, so a prefix meant to be separated from
/// the name should carry its own trailing underscore (`APP_`).
///
/// # Example
///
/// ```rust
/// use settings_reader::config::naming::to_env_name;
///
/// assert_eq!(to_env_name("GracePeriod", ""), "GRACE_PERIOD");
/// assert_eq!(to_env_name("GracePeriod", "APP_"), "APP_GRACE_PERIOD");
/// ```
pub fn to_env_name(field_name: &str, prefix: &str) -> String {
    with_prefix(prefix, &env_name_from_arg(&to_arg_name(field_name)))
}

/// Converts an already derived argument name into the environment form.
pub fn env_name_from_arg(arg_name: &str) -> String {
    arg_name.to_uppercase().replace('-', "_")
}

pub(crate) fn with_prefix(prefix: &str, env_name: &str) -> String {
    format!("{}{}", prefix, env_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_names() {
        assert_eq!(to_arg_name("Host"), "host");
        assert_eq!(to_arg_name("LogLevel"), "log-level");
        assert_eq!(to_arg_name("TextLogging"), "text-logging");
        assert_eq!(to_arg_name("GracePeriod"), "grace-period");
        assert_eq!(to_arg_name("APIKey"), "api-key");
        assert_eq!(to_arg_name("APISecret"), "api-secret");
    }

    #[test]
    fn test_arg_names_with_digits_and_acronyms() {
        assert_eq!(to_arg_name("Http2Port"), "http2-port");
        assert_eq!(to_arg_name("MaxTTL"), "max-ttl");
        assert_eq!(to_arg_name("UseHTTPProxy"), "use-http-proxy");
        assert_eq!(to_arg_name("port"), "port");
        assert_eq!(to_arg_name("ID"), "id");
    }

    #[test]
    fn test_env_names() {
        assert_eq!(to_env_name("GracePeriod", ""), "GRACE_PERIOD");
        assert_eq!(to_env_name("APIKey", ""), "API_KEY");
        assert_eq!(to_env_name("Port", "APP_"), "APP_PORT");
        assert_eq!(env_name_from_arg("text-logging"), "TEXT_LOGGING");
    }

    #[test]
    fn test_derivation_is_deterministic() {
        for name in ["GracePeriod", "APIKey", "X", "A1B2c3"] {
            assert_eq!(to_arg_name(name), to_arg_name(name));
            assert_eq!(to_env_name(name, "P_"), to_env_name(name, "P_"));
        }
    }
}
