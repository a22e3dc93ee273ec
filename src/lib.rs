//! Layered typed configuration store.
//!
//! `confstore` holds raw string properties keyed by dotted namespaced
//! identifiers, layered as runtime overrides over an external override
//! snapshot over compiled-in defaults. Reads resolve `${key}` variable
//! references recursively before returning, and typed accessors parse the
//! resolved string into integers, floats, booleans, lists, enums, byte-size
//! quantities, or registered type handles, failing with structured errors on
//! malformed input.
//!
//! ```
//! use confstore::{KeyDef, KeySet, PropertyStore};
//!
//! let store = PropertyStore::new(KeySet::new([
//!     KeyDef::new("app.master.hostname").with_default("localhost"),
//!     KeyDef::new("app.master.port").with_default("19998"),
//!     KeyDef::new("app.master.address"),
//! ]));
//! store
//!     .set("app.master.address", "${app.master.hostname}:${app.master.port}")
//!     .unwrap();
//! assert_eq!(store.get("app.master.address").unwrap(), "localhost:19998");
//! assert_eq!(store.get_int("app.master.port").unwrap(), 19998);
//! ```

pub mod bytes;
pub mod error;
pub mod key;
pub mod registry;
mod resolve;
pub mod store;
pub mod typed;

pub use error::{ConfigError, ConfigResult, ErrorCode};
pub use key::{KeyDef, KeySet, PropertyKey, ValueKind};
pub use registry::{TypeHandle, TypeRegistry};
pub use store::{EnvOverrides, MapOverrides, OverrideSource, PropertyStore};
