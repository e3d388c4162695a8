//! Error types for schema construction, value coercion and resolution.

use std::num::ParseIntError;
use thiserror::Error;

use super::value::ValueKind;

/// Errors that occur while converting text into a typed value.
#[derive(Debug, Error)]
pub enum ValueError {
    /// Text is not a recognized boolean.
    #[error("invalid boolean {0:?}: expected one of 1, t, true, 0, f, false")]
    InvalidBool(String),

    /// Text is not a signed base-10 integer in range.
    #[error("invalid signed integer {input:?}: {source}")]
    InvalidInt {
        input: String,
        #[source]
        source: ParseIntError,
    },

    /// Text is not an unsigned base-10 integer in range.
    #[error("invalid unsigned integer {input:?}: {source}")]
    InvalidUint {
        input: String,
        #[source]
        source: ParseIntError,
    },

    /// Text is not a duration literal such as `5s` or `1h30m`.
    #[error("invalid duration {input:?}: {source}")]
    InvalidDuration {
        input: String,
        #[source]
        source: humantime::DurationError,
    },

    /// An environment variable holds bytes that are not valid Unicode.
    #[error("value is not valid Unicode")]
    NotUnicode,

    /// A value of one kind was stored into a field of another kind.
    #[error("expected a {expected} value, found a {found} value")]
    KindMismatch { expected: ValueKind, found: ValueKind },
}

/// Errors in a settings declaration.
///
/// These are programmer errors. A schema that fails to build aborts the
/// process through [`super::schema::fatal`].
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Field name is empty or not made of ASCII letters and digits.
    #[error("settings {settings}: invalid field name {field:?}, expected ASCII letters and digits starting with a letter")]
    InvalidName {
        settings: &'static str,
        field: &'static str,
    },

    /// The default/secrecy tag could not be understood.
    #[error("settings {settings}: field {field} has malformed tag {tag:?}, expected \"<default>[,secret]\"")]
    MalformedTag {
        settings: &'static str,
        field: &'static str,
        tag: &'static str,
    },

    /// The default literal does not parse as the field's kind.
    #[error("settings {settings}: field {field} has malformed default {literal:?}: {source}")]
    MalformedDefault {
        settings: &'static str,
        field: &'static str,
        literal: &'static str,
        #[source]
        source: ValueError,
    },

    /// Two fields share a name.
    #[error("settings {settings}: field {field} is declared twice")]
    DuplicateField {
        settings: &'static str,
        field: &'static str,
    },

    /// Two fields derive the same argument name.
    #[error("settings {settings}: fields {first} and {second} both map to --{arg_name}")]
    DuplicateArgument {
        settings: &'static str,
        first: &'static str,
        second: &'static str,
        arg_name: String,
    },

    /// The field derives an argument name the parser reserves.
    #[error("settings {settings}: field {field} maps to reserved argument --{arg_name}")]
    ReservedArgument {
        settings: &'static str,
        field: &'static str,
        arg_name: String,
    },

    /// A settings type does not match its own schema.
    #[error("settings {settings}: field {field} is not stored by the settings type")]
    UnknownField {
        settings: &'static str,
        field: String,
    },

    /// A settings type refused a value of its own declared kind.
    #[error("settings {settings}: field {field} rejected its value: {source}")]
    Storage {
        settings: &'static str,
        field: &'static str,
        #[source]
        source: ValueError,
    },
}

/// Errors returned from resolving settings out of user input.
///
/// The resolved instance is never returned alongside one of these, so a
/// caller holding a `ConfigError` has no settings to misuse.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value the field cannot accept.
    ///
    /// The message names the variable but not its value. The parse error is
    /// kept as the source only for fields that are not secret.
    #[error("invalid {kind} in environment variable {var} for {field}")]
    InvalidEnvironment {
        var: String,
        field: &'static str,
        kind: ValueKind,
        #[source]
        source: Option<ValueError>,
    },

    /// Command-line parsing failed, or help was requested.
    #[error(transparent)]
    CommandLine(#[from] clap::Error),
}

impl ConfigError {
    /// Whether this error only carries help or version output.
    pub fn is_informational(&self) -> bool {
        match self {
            ConfigError::CommandLine(err) => matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ),
            _ => false,
        }
    }

    /// Prints the error and terminates the process.
    ///
    /// Help output exits with status 0; every other error exits non-zero.
    pub fn exit(&self) -> ! {
        match self {
            ConfigError::CommandLine(err) => err.exit(),
            other => {
                eprintln!("error: {}", other);
                if let Some(source) = std::error::Error::source(other) {
                    eprintln!("  caused by: {}", source);
                }
                std::process::exit(2)
            }
        }
    }
}
