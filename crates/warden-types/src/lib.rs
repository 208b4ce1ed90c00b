//! Core types for Warden.
//!
//! Warden is the session and access-control engine behind an RPC/HTTP
//! backend. This crate holds the small, dependency-light vocabulary shared
//! between the engine and its callers.
//!
//! # Crate Architecture
//!
//! ```text
//! warden-types  (SessionId, Principal, ErrorCode)   ◄── HERE
//!      ↑
//! warden-auth   (Session, ACL engine, snapshots, config)
//!      ↑
//! RPC / HTTP dispatch (external)
//! ```
//!
//! # Example
//!
//! ```
//! use warden_types::{Principal, PrincipalId, SessionId, TryNew};
//!
//! let owner = Principal::User(PrincipalId::new());
//! let sid = SessionId::from_bytes([0x42; 16]);
//!
//! // Tokens arriving over the wire are validated before lookup.
//! let incoming = SessionId::try_new(sid.to_string()).expect("well-formed");
//! assert_eq!(incoming, sid);
//! # let _ = owner;
//! ```

mod construct;
mod error;
mod id;
mod principal;

pub use construct::TryNew;
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{PrincipalId, SessionId, SessionIdError, SESSION_ID_BYTES, SESSION_ID_LEN};
pub use principal::Principal;
