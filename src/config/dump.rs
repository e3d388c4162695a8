//! Ordered, serializable views of settings for logs and diagnostics.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

use super::settings::{load, Settings};
use super::value::Value;

/// One field of a [`Snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
    /// Field name.
    pub name: &'static str,
    /// Whether the field is secret.
    pub secret: bool,
    /// Current value.
    pub value: Value,
}

/// Field values of one settings instance in declaration order.
///
/// A snapshot shows whatever the instance holds. Take it from a
/// [`without_secrets`](super::redact::without_secrets) copy before logging.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    /// Captures the current values of `settings`.
    pub fn of<S: Settings>(settings: &S) -> Self {
        let entries = S::schema()
            .fields()
            .iter()
            .map(|field| SnapshotEntry {
                name: field.name(),
                secret: field.is_secret(),
                value: load(settings, field),
            })
            .collect();
        Self { entries }
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    /// Looks up the value of one field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.value)
    }

    /// Replaces the value of every secret field with the `placeholder` text.
    pub fn mask_secrets(mut self, placeholder: &str) -> Self {
        for entry in self.entries.iter_mut().filter(|e| e.secret) {
            entry.value = Value::Text(placeholder.to_string());
        }
        self
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.name, &entry.value)?;
        }
        map.end()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
        for entry in &self.entries {
            writeln!(f, "{:width$} = {}", entry.name, entry.value, width = width)?;
        }
        Ok(())
    }
}
