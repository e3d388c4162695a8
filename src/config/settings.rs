//! The `Settings` trait and the `settings!` declaration macro.
//!
//! A settings type is a plain struct whose fields are read and written by
//! name through the [`Settings`] trait. The [`settings!`](crate::settings)
//! macro generates the struct, its schema and the trait impl from one
//! declaration:
//!
//! ```rust
//! use settings_reader::config::Settings;
//! use std::time::Duration;
//!
//! settings_reader::settings! {
//!     /// Server configuration.
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub struct ServerConfig {
//!         pub port: String as "Port" = "8080" => "The port to listen on",
//!         pub grace_period: Duration as "GracePeriod" = "5s" => "Shutdown grace period",
//!         pub api_key: String as "APIKey" = ",secret" => "The API key",
//!         pub verbose: bool as "Verbose" => "Log more",
//!     }
//! }
//!
//! let defaults = ServerConfig::defaults();
//! assert_eq!(defaults.port, "8080");
//! assert_eq!(defaults.grace_period, Duration::from_secs(5));
//! assert!(ServerConfig::schema().field("APIKey").unwrap().is_secret());
//! ```
//!
//! Each field line reads `<vis> <ident>: <type> as "<Name>" [= "<tag>"] =>
//! "<description>"`, where the tag is `"<default>[,secret]"`. Field types must
//! implement [`SettingValue`](super::value::SettingValue): `String`, `bool`,
//! `i64`, `u64` or `std::time::Duration`.

use tracing::trace;

use super::dump::Snapshot;
use super::error::SchemaError;
use super::redact;
use super::schema::{fatal, FieldDescriptor, Schema};
use super::value::Value;

/// A struct of settings described by a [`Schema`].
///
/// Usually implemented by the [`settings!`](crate::settings) macro. A
/// hand-written impl must keep `value`, `set_value` and `copy_field` in
/// agreement with the names and kinds declared by `schema`.
pub trait Settings: Sized {
    /// The validated schema for this type.
    ///
    /// Implementations build the schema once and abort through
    /// [`fatal`] if the declaration is broken.
    fn schema() -> &'static Schema;

    /// An instance with every field at its kind-neutral value.
    fn neutral() -> Self;

    /// Reads a field by name.
    fn value(&self, name: &str) -> Option<Value>;

    /// Writes a field by name.
    fn set_value(&mut self, name: &str, value: Value) -> Result<(), SchemaError>;

    /// Copies one field from `source` into `self`.
    fn copy_field(&mut self, source: &Self, name: &str);

    /// An instance with only the declared defaults applied.
    fn defaults() -> Self {
        let schema = Self::schema();
        let mut settings = Self::neutral();
        for field in schema.fields() {
            if let Some(default) = field.default_value() {
                trace!(field = field.name(), "applying default");
                store(&mut settings, field, default.clone());
            }
        }
        settings
    }

    /// A copy with every secret field left at its neutral value.
    fn without_secrets(&self) -> Self {
        redact::without_secrets(self)
    }

    /// Ordered name/value view, for logging.
    fn snapshot(&self) -> Snapshot {
        Snapshot::of(self)
    }
}

/// Reads a field the schema declares, aborting if the type does not store it.
pub(crate) fn load<S: Settings>(settings: &S, field: &FieldDescriptor) -> Value {
    settings.value(field.name()).unwrap_or_else(|| {
        fatal(SchemaError::UnknownField {
            settings: S::schema().type_name(),
            field: field.name().to_string(),
        })
    })
}

/// Writes a field the schema declares, aborting if the type refuses it.
pub(crate) fn store<S: Settings>(settings: &mut S, field: &FieldDescriptor, value: Value) {
    if let Err(err) = settings.set_value(field.name(), value) {
        fatal(err)
    }
}

/// Declares a settings struct together with its [`Settings`] impl.
///
/// See the [module documentation](crate::config::settings) for the syntax.
#[macro_export]
macro_rules! settings {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty as $field_name:literal
                    $(= $tag:literal)? => $desc:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::config::Settings for $name {
            fn schema() -> &'static $crate::config::Schema {
                static SCHEMA: $crate::__private::Lazy<$crate::config::Schema> =
                    $crate::__private::Lazy::new(|| {
                        $crate::config::Schema::from_specs(
                            stringify!($name),
                            &[$(
                                $crate::config::FieldSpec::new(
                                    $field_name,
                                    <$ty as $crate::config::SettingValue>::KIND,
                                    concat!("" $(, $tag)?),
                                    $desc,
                                )
                            ),*],
                        )
                        .unwrap_or_else(|err| $crate::config::schema::fatal(err))
                    });
                &SCHEMA
            }

            fn neutral() -> Self {
                Self {
                    $($field: <$ty as ::core::default::Default>::default(),)*
                }
            }

            fn value(&self, name: &str) -> ::core::option::Option<$crate::config::Value> {
                match name {
                    $($field_name => ::core::option::Option::Some(
                        $crate::config::SettingValue::to_value(&self.$field),
                    ),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set_value(
                &mut self,
                name: &str,
                value: $crate::config::Value,
            ) -> ::core::result::Result<(), $crate::config::SchemaError> {
                match name {
                    $($field_name => {
                        self.$field = <$ty as $crate::config::SettingValue>::from_value(value)
                            .map_err(|source| $crate::config::SchemaError::Storage {
                                settings: stringify!($name),
                                field: $field_name,
                                source,
                            })?;
                        ::core::result::Result::Ok(())
                    })*
                    _ => ::core::result::Result::Err($crate::config::SchemaError::UnknownField {
                        settings: stringify!($name),
                        field: ::std::string::ToString::to_string(name),
                    }),
                }
            }

            fn copy_field(&mut self, source: &Self, name: &str) {
                match name {
                    $($field_name => self.$field = ::core::clone::Clone::clone(&source.$field),)*
                    _ => {}
                }
            }
        }
    };
}
