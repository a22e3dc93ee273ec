//! Layered property storage with atomic snapshot replacement.
//!
//! Values live in three layers, highest priority first:
//! 1. **Runtime** - written by `set`/`merge`, last writer wins per key
//! 2. **System** - external override source, captured at `default_init`
//! 3. **Default** - compiled-in defaults from the [`KeySet`]
//!
//! The flattened view is an immutable [`Snapshot`] behind an `ArcSwap`:
//! readers load one snapshot and resolve variables against it, so a `merge`
//! of several mutually-referencing keys is observed either entirely or not
//! at all. Raw strings are stored unresolved; `${key}` expansion happens on
//! every `get`, so later writes to a referenced key are reflected by
//! subsequent reads of the referencing key.

use crate::error::{ConfigError, ConfigResult};
use crate::key::{self, KeySet, PropertyKey};
use crate::registry::{TypeHandle, TypeRegistry};
use crate::resolve::{self, RawLookup};
use crate::typed;
use arc_swap::ArcSwap;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// External source of override values consulted at `default_init` time.
///
/// Override values take precedence over compiled-in defaults for the same
/// key, but are shadowed by later runtime `set`s.
pub trait OverrideSource {
    fn lookup(&self, key: &PropertyKey) -> Option<String>;
}

/// Reads overrides from the process environment by the key's exact dotted name.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvOverrides;

impl OverrideSource for EnvOverrides {
    fn lookup(&self, key: &PropertyKey) -> Option<String> {
        std::env::var(key.as_str()).ok()
    }
}

/// In-memory override source for tests and pre-collected overrides.
#[derive(Debug, Clone, Default)]
pub struct MapOverrides(HashMap<PropertyKey, String>);

impl MapOverrides {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<PropertyKey>,
        V: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl OverrideSource for MapOverrides {
    fn lookup(&self, key: &PropertyKey) -> Option<String> {
        self.0.get(key.as_str()).cloned()
    }
}

/// One immutable view of all three layers.
#[derive(Debug, Clone, Default)]
struct Snapshot {
    runtime: HashMap<PropertyKey, String>,
    system: HashMap<PropertyKey, String>,
    defaults: HashMap<PropertyKey, String>,
}

impl Snapshot {
    fn layers(&self) -> [&HashMap<PropertyKey, String>; 3] {
        [&self.runtime, &self.system, &self.defaults]
    }
}

impl RawLookup for Snapshot {
    fn raw(&self, key: &str) -> Option<&str> {
        self.layers()
            .into_iter()
            .find_map(|layer| layer.get(key).map(String::as_str))
    }
}

/// Process-wide store of raw string properties with typed, resolving reads.
///
/// Cheap to share behind an `Arc`; all reads are lock-free snapshot loads
/// and mutations serialize through an internal write lock.
pub struct PropertyStore {
    keys: Arc<KeySet>,
    snapshot: ArcSwap<Snapshot>,
    write_lock: Mutex<()>,
}

impl PropertyStore {
    /// Create a store over the given key definitions, seeding the default
    /// layer from their compiled-in defaults.
    pub fn new(keys: KeySet) -> Self {
        let defaults = seeded_defaults(&keys);
        Self {
            keys: Arc::new(keys),
            snapshot: ArcSwap::from_pointee(Snapshot {
                defaults,
                ..Snapshot::default()
            }),
            write_lock: Mutex::new(()),
        }
    }

    /// Assign the runtime-layer value for `key`.
    ///
    /// Keys declared as bounded byte-size quantities are validated here:
    /// a quantity above the declared bound fails with an out-of-range error
    /// and nothing is written.
    pub fn set(&self, key: impl Into<PropertyKey>, raw: impl Into<String>) -> ConfigResult<()> {
        let key = key.into();
        let raw = raw.into();
        key::validate_raw(self.keys.get(key.as_str()), key.as_str(), &raw)?;

        let _guard = self.lock_writes();
        let mut next = (**self.snapshot.load()).clone();
        debug!(key = %key, "set runtime property");
        next.runtime.insert(key, raw);
        self.snapshot.store(Arc::new(next));
        Ok(())
    }

    /// Apply several assignments as one atomic batch.
    ///
    /// Readers observe either none or all of the batch, which keeps values
    /// that reference each other consistent. Eager validation applies to
    /// every entry; any failure rejects the whole batch with no partial
    /// write.
    pub fn merge<K, V>(&self, mapping: impl IntoIterator<Item = (K, V)>) -> ConfigResult<()>
    where
        K: Into<PropertyKey>,
        V: Into<String>,
    {
        let entries: Vec<(PropertyKey, String)> = mapping
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        for (key, raw) in &entries {
            key::validate_raw(self.keys.get(key.as_str()), key.as_str(), raw)?;
        }

        let _guard = self.lock_writes();
        let mut next = (**self.snapshot.load()).clone();
        debug!(count = entries.len(), "merged runtime properties");
        for (key, raw) in entries {
            next.runtime.insert(key, raw);
        }
        self.snapshot.store(Arc::new(next));
        Ok(())
    }

    /// Look up `key` across all layers and return its fully-resolved value.
    pub fn get(&self, key: &str) -> ConfigResult<String> {
        let snapshot = self.snapshot.load();
        resolve::resolve(&**snapshot, key)
    }

    /// Whether any layer holds a raw value for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.snapshot.load().raw(key).is_some()
    }

    /// The flattened raw (unresolved) view, highest layer winning per key.
    pub fn to_map(&self) -> HashMap<PropertyKey, String> {
        let snapshot = self.snapshot.load();
        let mut map = HashMap::new();
        // Lowest priority first so later inserts shadow earlier ones.
        for layer in snapshot.layers().into_iter().rev() {
            for (key, raw) in layer {
                map.insert(key.clone(), raw.clone());
            }
        }
        map
    }

    /// Restore the store to its default-layer state, discarding runtime and
    /// system overrides.
    pub fn reset(&self) {
        let _guard = self.lock_writes();
        debug!("reset store to default layer");
        self.snapshot.store(Arc::new(Snapshot {
            defaults: seeded_defaults(&self.keys),
            ..Snapshot::default()
        }));
    }

    /// Re-seed defaults and overlay the system layer from `source`.
    ///
    /// Every defined key the source can supply lands in the system layer,
    /// taking precedence over the compiled default for the same key. The
    /// runtime layer is discarded.
    pub fn default_init(&self, source: &dyn OverrideSource) {
        let system: HashMap<PropertyKey, String> = self
            .keys
            .keys()
            .filter_map(|key| source.lookup(key).map(|value| (key.clone(), value)))
            .collect();

        let _guard = self.lock_writes();
        debug!(overrides = system.len(), "initialized store defaults");
        self.snapshot.store(Arc::new(Snapshot {
            runtime: HashMap::new(),
            system,
            defaults: seeded_defaults(&self.keys),
        }));
    }

    // Typed accessors. Each resolves the value first, then parses it; every
    // failure names the key and the offending text.

    pub fn get_int(&self, key: &str) -> ConfigResult<i32> {
        let resolved = self.get(key)?;
        typed::parse_int(key, &resolved)
    }

    pub fn get_long(&self, key: &str) -> ConfigResult<i64> {
        let resolved = self.get(key)?;
        typed::parse_long(key, &resolved)
    }

    pub fn get_double(&self, key: &str) -> ConfigResult<f64> {
        let resolved = self.get(key)?;
        typed::parse_double(key, &resolved)
    }

    pub fn get_float(&self, key: &str) -> ConfigResult<f32> {
        let resolved = self.get(key)?;
        typed::parse_float(key, &resolved)
    }

    pub fn get_boolean(&self, key: &str) -> ConfigResult<bool> {
        let resolved = self.get(key)?;
        typed::parse_boolean(key, &resolved)
    }

    /// Split the resolved value on `delimiter`, preserving order and empty
    /// elements.
    pub fn get_list(&self, key: &str, delimiter: &str) -> ConfigResult<Vec<String>> {
        let resolved = self.get(key)?;
        Ok(typed::parse_list(&resolved, delimiter))
    }

    /// Decode the resolved value as one variant of the enum `T`.
    pub fn get_enum<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<T> {
        let resolved = self.get(key)?;
        typed::parse_enum(key, &resolved)
    }

    /// Resolve the value as a fully-qualified type name in `registry`.
    pub fn get_class(&self, key: &str, registry: &TypeRegistry) -> ConfigResult<TypeHandle> {
        let resolved = self.get(key)?;
        registry
            .resolve(&resolved)
            .cloned()
            .ok_or_else(|| ConfigError::malformed(key, &resolved, "registered type name"))
    }

    /// Parse the resolved value as a byte-size quantity.
    pub fn get_bytes(&self, key: &str) -> ConfigResult<i64> {
        let resolved = self.get(key)?;
        typed::parse_bytes(key, &resolved)
    }

    fn lock_writes(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guard protects no data of its own, so a poisoned lock is
        // still usable.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn seeded_defaults(keys: &KeySet) -> HashMap<PropertyKey, String> {
    keys.defaults()
        .map(|(key, default)| (key.clone(), default.to_string()))
        .collect()
}
