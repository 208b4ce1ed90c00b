//! Per-session attribute store.

use serde_json::Value;
use std::collections::BTreeMap;

/// Named, opaque session attributes.
///
/// Values are arbitrary JSON so the RPC layer can stash whatever it needs
/// (user name, ACL group list, client address) without the engine knowing
/// the shape. Iteration is in ascending key order and can be restarted at
/// any time.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use warden_auth::AttributeStore;
///
/// let mut store = AttributeStore::new();
/// store.set("username", json!("root"));
/// assert_eq!(store.get("username"), Some(&json!("root")));
///
/// store.erase("username");
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
    fields: BTreeMap<String, Value>,
}

impl AttributeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, returning the value it replaced.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn erase(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Iterates `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of stored attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no attributes are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
