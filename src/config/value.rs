//! Setting values and the coercion between text and typed values.
//!
//! Every setting has exactly one [`ValueKind`]. Two parsers exist per kind:
//!
//! - [`parse_default`] reads default literals embedded in a schema. These are
//!   trusted, so booleans are lenient (`"true"` is true, anything else false).
//! - [`parse_input`] reads values supplied through the environment or the
//!   command line. Every kind is strict and rejects malformed text.

use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

use super::error::ValueError;

/// The closed set of kinds a setting can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// UTF-8 text.
    Text,
    /// Boolean flag.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// Unsigned 64-bit integer.
    Uint,
    /// Elapsed time with nanosecond precision.
    Duration,
}

impl ValueKind {
    /// The kind-neutral value: empty text, false, zero.
    pub fn neutral(self) -> Value {
        match self {
            ValueKind::Text => Value::Text(String::new()),
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Int => Value::Int(0),
            ValueKind::Uint => Value::Uint(0),
            ValueKind::Duration => Value::Duration(Duration::ZERO),
        }
    }

    /// Placeholder shown for the value in help output.
    pub fn value_name(self) -> &'static str {
        match self {
            ValueKind::Text => "TEXT",
            ValueKind::Bool => "BOOL",
            ValueKind::Int => "INT",
            ValueKind::Uint => "UINT",
            ValueKind::Duration => "DURATION",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Text => write!(f, "text"),
            ValueKind::Bool => write!(f, "boolean"),
            ValueKind::Int => write!(f, "signed integer"),
            ValueKind::Uint => write!(f, "unsigned integer"),
            ValueKind::Duration => write!(f, "duration"),
        }
    }
}

/// A typed setting value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Text value.
    Text(String),
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    Uint(u64),
    /// Duration value.
    Duration(Duration),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Text(_) => ValueKind::Text,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Uint(_) => ValueKind::Uint,
            Value::Duration(_) => ValueKind::Duration,
        }
    }

    /// Whether this is the neutral value of its kind.
    pub fn is_neutral(&self) -> bool {
        *self == self.kind().neutral()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Duration(d) => write!(f, "{}", humantime::format_duration(*d)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Uint(u) => serializer.serialize_u64(*u),
            Value::Duration(_) => serializer.collect_str(self),
        }
    }
}

/// Parses a default literal taken from a schema declaration.
pub fn parse_default(kind: ValueKind, literal: &str) -> Result<Value, ValueError> {
    match kind {
        ValueKind::Bool => Ok(Value::Bool(literal == "true")),
        _ => parse_input(kind, literal),
    }
}

/// Parses a value supplied by the user through the environment or the
/// command line.
pub fn parse_input(kind: ValueKind, input: &str) -> Result<Value, ValueError> {
    match kind {
        ValueKind::Text => Ok(Value::Text(input.to_string())),
        ValueKind::Bool => parse_bool(input).map(Value::Bool),
        ValueKind::Int => input
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|source| ValueError::InvalidInt {
                input: input.to_string(),
                source,
            }),
        ValueKind::Uint => input
            .parse::<u64>()
            .map(Value::Uint)
            .map_err(|source| ValueError::InvalidUint {
                input: input.to_string(),
                source,
            }),
        ValueKind::Duration => parse_duration(input).map(Value::Duration),
    }
}

fn parse_bool(input: &str) -> Result<bool, ValueError> {
    match input {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ValueError::InvalidBool(input.to_string())),
    }
}

fn parse_duration(input: &str) -> Result<Duration, ValueError> {
    if input == "0" {
        return Ok(Duration::ZERO);
    }
    humantime::parse_duration(input).map_err(|source| ValueError::InvalidDuration {
        input: input.to_string(),
        source,
    })
}

/// Rust types that can hold a setting.
///
/// Implemented for exactly one type per [`ValueKind`]. A settings field of
/// any other type does not compile.
pub trait SettingValue: Clone + Default {
    /// The kind this type stores.
    const KIND: ValueKind;

    /// Wraps the value.
    fn to_value(&self) -> Value;

    /// Unwraps a value of the matching kind.
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

fn mismatch(expected: ValueKind, value: &Value) -> ValueError {
    ValueError::KindMismatch {
        expected,
        found: value.kind(),
    }
}

impl SettingValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl SettingValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl SettingValue for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl SettingValue for u64 {
    const KIND: ValueKind = ValueKind::Uint;

    fn to_value(&self) -> Value {
        Value::Uint(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Uint(u) => Ok(u),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl SettingValue for Duration {
    const KIND: ValueKind = ValueKind::Duration;

    fn to_value(&self) -> Value {
        Value::Duration(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Duration(d) => Ok(d),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}
