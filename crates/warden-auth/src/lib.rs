//! Session and access-control engine for Warden.
//!
//! A [`Session`] is the security context issued to an authenticated user:
//! an unguessable token, scoped permission grants, opaque attributes, and a
//! sliding expiry deadline.
//!
//! # Access Model
//!
//! ```text
//! grant(scope, object-pattern, function-pattern, "rw")
//!                │
//!                ▼
//! access(scope, object, function, "r")
//!   = every requested character is held, unrevoked,
//!     by at least one entry whose patterns match
//! ```
//!
//! - **Deny by default**: unknown scopes and unmatched requests are denied
//! - **Grants accumulate**: `"r"` and `"w"` granted separately satisfy `"rw"`
//! - **Revoke tombstones**: entries stay in place; revoked characters become `-`
//! - **Access keeps alive**: every [`Session::access`] call pushes the deadline
//!
//! # Crate Layout
//!
//! | Module | Provides |
//! |--------|----------|
//! | [`session`] | [`Session`] lifecycle, ACL and attribute operations |
//! | [`acl`] | Scopes, entries, permission slots, matching |
//! | [`pattern`] | Wildcard patterns and prefix keys |
//! | [`snapshot`] | Structured export and [`SnapshotSink`] streaming |
//! | [`entropy`] | [`EntropySource`] for session tokens |
//! | [`config`] | Layered TOML configuration |
//!
//! Collections of sessions (token lookup, sweeping expired sessions) live in
//! the caller.

pub mod acl;
pub mod attributes;
pub mod config;
pub mod entropy;
mod error;
pub mod factory;
pub mod pattern;
pub mod session;
pub mod snapshot;

pub use acl::TOMBSTONE;
pub use attributes::AttributeStore;
pub use entropy::{EntropySource, OsEntropy};
pub use error::SessionError;
pub use factory::SessionFactory;
pub use session::Session;
pub use snapshot::{EntrySnapshot, ScopeSnapshot, SessionSnapshot, SnapshotSink};

// Re-export identity types for convenience
pub use warden_types::{Principal, PrincipalId, SessionId};
