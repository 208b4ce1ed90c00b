//! Scoped ACL grants with wildcard matching.
//!
//! # Layout
//!
//! ```text
//! AclTable   scope name ─► AclScope
//! AclScope   prefix key ─► [AclEntry, AclEntry, ...]   (insertion order)
//! AclEntry   object pattern, function pattern, Permissions
//! ```
//!
//! Keys are ordered, and a key may own several entries: granting the same
//! `(object, function)` twice stores two entries, and their permissions are
//! combined when a request is checked, not when it is granted.
//!
//! # Revocation
//!
//! Entries are never removed or resized. Revoking overwrites the affected
//! permission slots with [`TOMBSTONE`], so the structure readers walk keeps
//! its shape for the lifetime of the session.
//!
//! # Lookup
//!
//! Only entries whose prefix key is a literal prefix of the queried object
//! can match. For an object name of `n` characters those keys are the `n + 1`
//! leading substrings of the name, so a lookup probes each of them from the
//! longest down and visits matching entries in descending key order.

use crate::pattern::{prefix_key, GlobPattern};
use crate::SessionError;
use std::collections::{BTreeMap, TryReserveError};

/// Sentinel written over a revoked permission character.
///
/// Callers must never grant `-` as a permission: a granted `-` cannot be
/// told apart from a revoked slot and never satisfies a request.
pub const TOMBSTONE: char = '-';

/// Fixed-length permission buffer of one entry.
///
/// Each slot holds one granted character or [`TOMBSTONE`]. Slots only ever
/// move from granted to tombstoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permissions(Box<[char]>);

impl Permissions {
    /// Creates a buffer holding every character of `perms`.
    #[must_use]
    pub fn new(perms: &str) -> Self {
        Self(perms.chars().collect())
    }

    /// Returns `true` if `perm` is granted and not revoked.
    #[must_use]
    pub fn contains(&self, perm: char) -> bool {
        perm != TOMBSTONE && self.0.contains(&perm)
    }

    /// Tombstones every slot holding a character from `revoked`.
    ///
    /// Returns the number of slots changed.
    pub fn revoke(&mut self, revoked: &str) -> usize {
        let mut changed = 0;
        for slot in self.0.iter_mut() {
            if *slot != TOMBSTONE && revoked.contains(*slot) {
                *slot = TOMBSTONE;
                changed += 1;
            }
        }
        changed
    }

    /// Number of slots, granted or tombstoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the entry was granted an empty permission string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Permissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// One grant record.
///
/// Patterns and prefix key are fixed at grant time; only the permission
/// slots change afterwards.
#[derive(Debug, Clone)]
pub struct AclEntry {
    object: GlobPattern,
    function: GlobPattern,
    perms: Permissions,
}

impl AclEntry {
    /// Creates an entry, compiling both patterns.
    #[must_use]
    pub fn new(object: &str, function: &str, perms: &str) -> Self {
        Self {
            object: GlobPattern::new(object),
            function: GlobPattern::new(function),
            perms: Permissions::new(perms),
        }
    }

    /// Object pattern as granted.
    #[must_use]
    pub fn object(&self) -> &str {
        self.object.as_str()
    }

    /// Function pattern as granted.
    #[must_use]
    pub fn function(&self) -> &str {
        self.function.as_str()
    }

    /// Literal leading part of the object pattern; the ordering key.
    #[must_use]
    pub fn prefix_key(&self) -> &str {
        prefix_key(self.object.as_str())
    }

    /// Current permission slots.
    #[must_use]
    pub fn perms(&self) -> &Permissions {
        &self.perms
    }

    /// Returns `true` if this entry applies to `(object, function)`.
    #[must_use]
    pub fn matches(&self, object: &str, function: &str) -> bool {
        object.starts_with(self.prefix_key())
            && self.object.matches(object)
            && self.function.matches(function)
    }
}

/// Ordered, duplicate-permitting collection of entries for one scope.
#[derive(Debug, Default)]
pub struct AclScope {
    by_key: BTreeMap<String, Vec<AclEntry>>,
    len: usize,
}

impl AclScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry` after any existing entries with the same key.
    ///
    /// # Errors
    ///
    /// Returns [`TryReserveError`] if the key's entry list cannot grow.
    pub fn insert(&mut self, entry: AclEntry) -> Result<(), TryReserveError> {
        let group = self
            .by_key
            .entry(entry.prefix_key().to_string())
            .or_default();
        group.try_reserve(1)?;
        group.push(entry);
        self.len += 1;
        Ok(())
    }

    /// Total number of entries, revoked ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing was ever granted in this scope.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All entries, ascending by key, insertion order within a key.
    pub fn entries(&self) -> impl Iterator<Item = &AclEntry> {
        self.by_key.values().flatten()
    }

    /// Entries applying to `(object, function)`, in descending key order.
    pub fn matching<'a>(
        &'a self,
        object: &'a str,
        function: &'a str,
    ) -> impl Iterator<Item = &'a AclEntry> + 'a {
        prefix_ends(object)
            .filter_map(move |end| self.by_key.get(&object[..end]))
            .flat_map(|group| group.iter().rev())
            .filter(move |entry| entry.matches(object, function))
    }

    /// Tombstones `perms` in every entry applying to `(object, function)`.
    ///
    /// Returns the number of slots changed.
    pub fn revoke(&mut self, object: &str, function: &str, perms: &str) -> usize {
        let mut changed = 0;
        for end in prefix_ends(object) {
            let Some(group) = self.by_key.get_mut(&object[..end]) else {
                continue;
            };
            for entry in group.iter_mut().rev() {
                if entry.matches(object, function) {
                    changed += entry.perms.revoke(perms);
                }
            }
        }
        changed
    }

    /// Returns `true` if every character of `requested` is held, unrevoked,
    /// by at least one entry applying to `(object, function)`.
    ///
    /// An empty request is satisfied by any applicable entry.
    #[must_use]
    pub fn allows(&self, object: &str, function: &str, requested: &str) -> bool {
        let mut matching = self.matching(object, function);
        if requested.is_empty() {
            return matching.next().is_some();
        }

        let mut pending: Vec<char> = requested.chars().collect();
        for entry in matching {
            pending.retain(|c| !entry.perms.contains(*c));
            if pending.is_empty() {
                return true;
            }
        }
        false
    }
}

/// Byte offsets of every char boundary of `s`, from `s.len()` down to 0.
fn prefix_ends(s: &str) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(s.len()).chain(s.char_indices().rev().map(|(i, _)| i))
}

/// All scopes of one session, keyed by scope name.
#[derive(Debug, Default)]
pub struct AclTable {
    scopes: BTreeMap<String, AclScope>,
}

impl AclTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a grant, creating `scope` on first use.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidArgument`] if `object` or `function` is empty
    /// - [`SessionError::Allocation`] if entry storage cannot grow
    pub fn grant(
        &mut self,
        scope: &str,
        object: &str,
        function: &str,
        perms: &str,
    ) -> Result<(), SessionError> {
        if object.is_empty() {
            return Err(SessionError::invalid_argument("object"));
        }
        if function.is_empty() {
            return Err(SessionError::invalid_argument("function"));
        }

        let entry = AclEntry::new(object, function, perms);
        match self.scopes.get_mut(scope) {
            Some(acl_scope) => acl_scope.insert(entry)?,
            None => {
                let mut acl_scope = AclScope::new();
                acl_scope.insert(entry)?;
                self.scopes.insert(scope.to_string(), acl_scope);
            }
        }
        Ok(())
    }

    /// Tombstones matching permissions in `scope`.
    ///
    /// Returns the number of slots changed; zero when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ScopeNotFound`] if `scope` was never granted.
    pub fn revoke(
        &mut self,
        scope: &str,
        object: &str,
        function: &str,
        perms: &str,
    ) -> Result<usize, SessionError> {
        let acl_scope = self
            .scopes
            .get_mut(scope)
            .ok_or_else(|| SessionError::scope_not_found(scope))?;
        Ok(acl_scope.revoke(object, function, perms))
    }

    /// Checks a request; an unknown scope denies.
    #[must_use]
    pub fn allows(&self, scope: &str, object: &str, function: &str, requested: &str) -> bool {
        self.scopes
            .get(scope)
            .is_some_and(|acl_scope| acl_scope.allows(object, function, requested))
    }

    /// Looks up one scope.
    #[must_use]
    pub fn scope(&self, name: &str) -> Option<&AclScope> {
        self.scopes.get(name)
    }

    /// Scopes in ascending name order.
    pub fn scopes(&self) -> impl Iterator<Item = (&str, &AclScope)> {
        self.scopes.iter().map(|(name, scope)| (name.as_str(), scope))
    }
}
