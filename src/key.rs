//! Property keys and key definitions.
//!
//! Keys are dotted namespaced strings (`app.master.hostname`). The set of
//! valid keys is defined by the embedding system and handed to the store as a
//! [`KeySet`] at construction time; the store itself treats keys as opaque,
//! hashable tokens.

use crate::bytes;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

/// Immutable namespaced identifier for one configuration property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyKey(String);

impl PropertyKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for PropertyKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Declared value kind for a key.
///
/// Most keys are free-form text and are only validated when a typed accessor
/// reads them. `SizeBytes` keys are the exception: their byte quantity is
/// validated against `max` eagerly, at `set`/`merge` time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Free-form string, validated lazily by whichever accessor reads it.
    #[default]
    Text,
    /// Byte-size quantity bounded to `max` bytes, validated at write time.
    SizeBytes { max: i64 },
}

/// Definition of one valid key: optional compiled-in default plus value kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDef {
    pub key: PropertyKey,
    /// Compiled-in default raw value, seeded into the default layer.
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub kind: ValueKind,
}

impl KeyDef {
    pub fn new(key: impl Into<PropertyKey>) -> Self {
        Self {
            key: key.into(),
            default: None,
            kind: ValueKind::default(),
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Declare this key as a byte-size quantity bounded to `max` bytes.
    pub fn sized(mut self, max: i64) -> Self {
        self.kind = ValueKind::SizeBytes { max };
        self
    }

    /// Declare this key as a byte-size quantity bounded to a machine integer.
    pub fn sized_int(self) -> Self {
        self.sized(i32::MAX as i64)
    }
}

/// Registry of key definitions consulted by the store.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    defs: HashMap<PropertyKey, KeyDef>,
}

impl KeySet {
    pub fn new(defs: impl IntoIterator<Item = KeyDef>) -> Self {
        Self {
            defs: defs
                .into_iter()
                .map(|def| (def.key.clone(), def))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&KeyDef> {
        self.defs.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.defs.contains_key(key)
    }

    /// Iterate over all defined keys.
    pub fn keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.defs.keys()
    }

    /// Iterate over keys that carry a compiled-in default.
    pub fn defaults(&self) -> impl Iterator<Item = (&PropertyKey, &str)> {
        self.defs
            .values()
            .filter_map(|def| def.default.as_deref().map(|d| (&def.key, d)))
    }
}

/// Validate a raw value against the key's declared kind.
///
/// Returns `Ok(())` for unknown keys and `Text` keys; `SizeBytes` keys parse
/// the quantity and range-check it against the declared bound.
pub(crate) fn validate_raw(def: Option<&KeyDef>, key: &str, raw: &str) -> crate::ConfigResult<()> {
    let Some(def) = def else {
        return Ok(());
    };
    match def.kind {
        ValueKind::Text => Ok(()),
        ValueKind::SizeBytes { max } => {
            let parsed = bytes::parse_byte_size(raw).map_err(|e| e.into_config_error(key, raw))?;
            if parsed > max {
                return Err(crate::ConfigError::out_of_range(key, raw, max));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_equality_is_by_string() {
        let a = PropertyKey::from("app.master.hostname");
        let b = PropertyKey::new("app.master.hostname".to_string());
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "app.master.hostname");
    }

    #[test]
    fn test_keyset_defaults_iteration() {
        let keys = KeySet::new([
            KeyDef::new("app.home").with_default("/opt/app"),
            KeyDef::new("app.master.hostname"),
        ]);
        let defaults: Vec<_> = keys.defaults().collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].1, "/opt/app");
    }

    #[test]
    fn test_validate_raw_rejects_oversized_quantity() {
        let def = KeyDef::new("app.io.buffer.bytes").sized_int();
        let err = validate_raw(Some(&def), "app.io.buffer.bytes", "3gb").unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::OutOfRange);
    }

    #[test]
    fn test_validate_raw_accepts_text_keys() {
        let def = KeyDef::new("app.home");
        assert!(validate_raw(Some(&def), "app.home", "anything at all").is_ok());
        assert!(validate_raw(None, "app.unknown", "3gb").is_ok());
    }
}
