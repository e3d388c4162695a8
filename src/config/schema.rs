//! Field descriptors and schema construction.
//!
//! A [`Schema`] is the ordered list of [`FieldDescriptor`]s for one settings
//! type. It is built once from raw [`FieldSpec`] declarations, validated, and
//! then shared read-only by every resolution and redaction.

use std::collections::HashMap;
use tracing::error;

use super::error::SchemaError;
use super::naming::{env_name_from_arg, to_arg_name, with_prefix};
use super::value::{parse_default, Value, ValueKind};

/// Marker token that flags a field as secret in its tag.
pub const SECRET_MARKER: &str = "secret";

/// Argument names the command-line parser reserves for itself.
const RESERVED_ARGS: &[&str] = &["help"];

/// A raw field declaration, as written by the `settings!` macro or by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field identifier, e.g. `GracePeriod`.
    pub name: &'static str,
    /// Kind of the stored value.
    pub kind: ValueKind,
    /// Default and secrecy tag: `"<default>[,secret]"`.
    pub tag: &'static str,
    /// Help text.
    pub description: &'static str,
}

impl FieldSpec {
    /// Creates a field declaration.
    pub const fn new(
        name: &'static str,
        kind: ValueKind,
        tag: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            tag,
            description,
        }
    }
}

/// Validated metadata for one setting.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: &'static str,
    kind: ValueKind,
    default_literal: &'static str,
    description: &'static str,
    secret: bool,
    arg_name: String,
    env_name: String,
    default: Option<Value>,
}

impl FieldDescriptor {
    /// Field identifier.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Kind of the stored value.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Default literal as declared; empty when the field has no default.
    pub fn default_literal(&self) -> &'static str {
        self.default_literal
    }

    /// Help text.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Whether the field is left out of redacted copies.
    pub fn is_secret(&self) -> bool {
        self.secret
    }

    /// Long command-line argument name, without the leading dashes.
    pub fn arg_name(&self) -> &str {
        &self.arg_name
    }

    /// Environment variable name without any prefix.
    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    /// Environment variable name with `prefix` prepended.
    pub fn prefixed_env_name(&self, prefix: &str) -> String {
        with_prefix(prefix, &self.env_name)
    }

    /// The coerced default, or `None` when no default is declared.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The value the field holds before any source is consulted.
    pub fn initial_value(&self) -> Value {
        self.default.clone().unwrap_or_else(|| self.kind.neutral())
    }
}

/// Ordered, validated set of fields for one settings type.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Builds a schema from raw declarations, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found: an invalid name, a malformed
    /// tag or default literal, a duplicate field or argument name, or an
    /// argument name the parser reserves.
    pub fn from_specs(type_name: &'static str, specs: &[FieldSpec]) -> Result<Self, SchemaError> {
        let mut fields = Vec::with_capacity(specs.len());
        let mut arg_owners: HashMap<String, &'static str> = HashMap::new();

        for spec in specs {
            let field = describe(type_name, spec)?;

            if fields.iter().any(|f: &FieldDescriptor| f.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    settings: type_name,
                    field: field.name,
                });
            }
            if RESERVED_ARGS.contains(&field.arg_name.as_str()) {
                return Err(SchemaError::ReservedArgument {
                    settings: type_name,
                    field: field.name,
                    arg_name: field.arg_name,
                });
            }
            if let Some(first) = arg_owners.insert(field.arg_name.clone(), field.name) {
                return Err(SchemaError::DuplicateArgument {
                    settings: type_name,
                    first,
                    second: field.name,
                    arg_name: field.arg_name,
                });
            }

            fields.push(field);
        }

        Ok(Self { type_name, fields })
    }

    /// Name of the settings type this schema describes.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn describe(type_name: &'static str, spec: &FieldSpec) -> Result<FieldDescriptor, SchemaError> {
    if !is_valid_name(spec.name) {
        return Err(SchemaError::InvalidName {
            settings: type_name,
            field: spec.name,
        });
    }

    let (default_literal, secret) =
        parse_tag(spec.tag).ok_or_else(|| SchemaError::MalformedTag {
            settings: type_name,
            field: spec.name,
            tag: spec.tag,
        })?;

    let default = if default_literal.is_empty() {
        None
    } else {
        let value = parse_default(spec.kind, default_literal).map_err(|source| {
            SchemaError::MalformedDefault {
                settings: type_name,
                field: spec.name,
                literal: default_literal,
                source,
            }
        })?;
        Some(value)
    };

    let arg_name = to_arg_name(spec.name);
    let env_name = env_name_from_arg(&arg_name);

    Ok(FieldDescriptor {
        name: spec.name,
        kind: spec.kind,
        default_literal,
        description: spec.description,
        secret,
        arg_name,
        env_name,
        default,
    })
}

/// Splits a `"<default>[,secret]"` tag into its default literal and secret
/// flag. Returns `None` for anything else.
pub fn parse_tag(tag: &'static str) -> Option<(&'static str, bool)> {
    let mut tokens = tag.split(',');
    let default_literal = tokens.next().unwrap_or("");
    let secret = match tokens.next().map(str::trim) {
        None | Some("") => false,
        Some(SECRET_MARKER) => true,
        Some(_) => return None,
    };
    if tokens.next().is_some() {
        return None;
    }
    Some((default_literal, secret))
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Aborts on a broken settings declaration.
///
/// A schema error means the program itself is wrong, so there is nothing to
/// recover: the error is logged and the current thread panics with a message
/// naming the offending field.
pub fn fatal(err: SchemaError) -> ! {
    error!(error = %err, "invalid settings schema");
    panic!("invalid settings schema: {}", err)
}
