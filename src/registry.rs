//! Type registry for class-reference properties.
//!
//! Rust has no ambient runtime class lookup, so the embedding system
//! registers the types a configuration value may name, keyed by
//! fully-qualified name. `PropertyStore::get_class` resolves a configuration
//! string against this registry.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Handle to one registered type: its registered name plus `TypeId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHandle {
    name: String,
    type_id: TypeId,
}

impl TypeHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Whether this handle refers to `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Registry of types resolvable from configuration values.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    by_name: HashMap<String, TypeHandle>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under a fully-qualified name. Re-registering a name
    /// overwrites the previous entry.
    pub fn register<T: Any>(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.by_name.insert(
            name.clone(),
            TypeHandle {
                name,
                type_id: TypeId::of::<T>(),
            },
        );
        self
    }

    /// Resolve a fully-qualified name to its registered handle.
    pub fn resolve(&self, name: &str) -> Option<&TypeHandle> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}
