//! Read-only export of a session's ACL state.
//!
//! # Shape
//!
//! ```text
//! {
//!   <scope>: {
//!     <prefix key>: { object: <pattern>, method: <pattern>, perms: <slots> },
//!     ...
//!   },
//!   ...
//! }
//! ```
//!
//! Scopes appear in ascending name order, entries in ascending key order and
//! insertion order within a key. Several entries may share a key; every one
//! of them is emitted.
//!
//! A snapshot can be consumed three ways: inspected as plain structs,
//! serialized with serde (the nested map shape above), or streamed into a
//! [`SnapshotSink`] that wants explicit table open/close boundaries.

use crate::acl::{AclEntry, AclTable};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Receiver for a streamed snapshot.
///
/// Calls are strictly nested: every [`open_table`](Self::open_table) is
/// matched by a later [`close_table`](Self::close_table).
pub trait SnapshotSink {
    /// Opens a table, keyed within its parent (`None` for the outermost).
    fn open_table(&mut self, key: Option<&str>);

    /// Writes one string field into the current table.
    fn put_field(&mut self, key: &str, value: &str);

    /// Closes the innermost open table.
    fn close_table(&mut self);
}

/// Snapshot of every ACL scope of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Scopes in ascending name order.
    pub scopes: Vec<ScopeSnapshot>,
}

/// Snapshot of one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSnapshot {
    /// Scope name.
    pub name: String,
    /// Entries in key order.
    pub entries: Vec<EntrySnapshot>,
}

/// Snapshot of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySnapshot {
    /// Object pattern.
    pub object: String,
    /// Function pattern.
    pub method: String,
    /// Permission slots, revoked ones shown as `-`.
    pub perms: String,
    /// Prefix key the entry is filed under.
    #[serde(skip)]
    pub key: String,
}

impl From<&AclEntry> for EntrySnapshot {
    fn from(entry: &AclEntry) -> Self {
        Self {
            object: entry.object().to_string(),
            method: entry.function().to_string(),
            perms: entry.perms().to_string(),
            key: entry.prefix_key().to_string(),
        }
    }
}

impl SessionSnapshot {
    pub(crate) fn capture(acl: &AclTable) -> Self {
        let scopes = acl
            .scopes()
            .map(|(name, scope)| ScopeSnapshot {
                name: name.to_string(),
                entries: scope.entries().map(EntrySnapshot::from).collect(),
            })
            .collect();
        Self { scopes }
    }

    /// Returns `true` if the session holds no scopes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Streams the snapshot into `sink`.
    ///
    /// Entry fields are written in the fixed order `object`, `method`, `perms`.
    pub fn write_to<S: SnapshotSink + ?Sized>(&self, sink: &mut S) {
        sink.open_table(None);
        for scope in &self.scopes {
            sink.open_table(Some(&scope.name));
            for entry in &scope.entries {
                sink.open_table(Some(&entry.key));
                sink.put_field("object", &entry.object);
                sink.put_field("method", &entry.method);
                sink.put_field("perms", &entry.perms);
                sink.close_table();
            }
            sink.close_table();
        }
        sink.close_table();
    }
}

impl Serialize for SessionSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.scopes.len()))?;
        for scope in &self.scopes {
            map.serialize_entry(&scope.name, &KeyedEntries(&scope.entries))?;
        }
        map.end()
    }
}

struct KeyedEntries<'a>(&'a [EntrySnapshot]);

impl Serialize for KeyedEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(&entry.key, entry)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Event {
        Open(Option<String>),
        Field(String, String),
        Close,
    }

    #[derive(Default)]
    struct Recorder(Vec<Event>);

    impl SnapshotSink for Recorder {
        fn open_table(&mut self, key: Option<&str>) {
            self.0.push(Event::Open(key.map(str::to_string)));
        }

        fn put_field(&mut self, key: &str, value: &str) {
            self.0.push(Event::Field(key.into(), value.into()));
        }

        fn close_table(&mut self) {
            self.0.push(Event::Close);
        }
    }

    fn sample() -> SessionSnapshot {
        let mut acl = AclTable::new();
        acl.grant("ubus", "network.*", "status", "r").expect("grant");
        acl.grant("ubus", "network.*", "status", "w").expect("grant");
        acl.grant("uci", "system", "*", "rw").expect("grant");
        acl.revoke("uci", "system", "get", "w").expect("revoke");
        SessionSnapshot::capture(&acl)
    }

    #[test]
    fn capture_preserves_order_and_tombstones() {
        let snap = sample();
        let names: Vec<&str> = snap.scopes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["ubus", "uci"]);

        let ubus = &snap.scopes[0];
        assert_eq!(ubus.entries.len(), 2);
        assert!(ubus.entries.iter().all(|e| e.key == "network."));
        assert_eq!(ubus.entries[0].perms, "r");
        assert_eq!(ubus.entries[1].perms, "w");

        assert_eq!(snap.scopes[1].entries[0].perms, "r-");
    }

    #[test]
    fn sink_sees_balanced_tables_in_field_order() {
        let mut acl = AclTable::new();
        acl.grant("s", "obj*", "fn", "x").expect("grant");
        let mut rec = Recorder::default();
        SessionSnapshot::capture(&acl).write_to(&mut rec);

        assert_eq!(
            rec.0,
            vec![
                Event::Open(None),
                Event::Open(Some("s".into())),
                Event::Open(Some("obj".into())),
                Event::Field("object".into(), "obj*".into()),
                Event::Field("method".into(), "fn".into()),
                Event::Field("perms".into(), "x".into()),
                Event::Close,
                Event::Close,
                Event::Close,
            ]
        );
    }

    #[test]
    fn empty_snapshot_is_one_empty_table() {
        let snap = SessionSnapshot::capture(&AclTable::new());
        assert!(snap.is_empty());

        let mut rec = Recorder::default();
        snap.write_to(&mut rec);
        assert_eq!(rec.0, vec![Event::Open(None), Event::Close]);
    }

    #[test]
    fn serializes_as_nested_maps() {
        let mut acl = AclTable::new();
        acl.grant("uci", "system", "*", "r").expect("grant");
        let json = serde_json::to_string(&SessionSnapshot::capture(&acl)).expect("serialize");
        assert_eq!(
            json,
            r#"{"uci":{"system":{"object":"system","method":"*","perms":"r"}}}"#
        );
    }

    #[test]
    fn duplicate_keys_are_all_emitted() {
        let json = serde_json::to_string(&sample()).expect("serialize");
        assert_eq!(json.matches("\"network.\":").count(), 2, "got: {json}");
    }
}
