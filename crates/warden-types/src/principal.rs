//! Principal (user handle) types.
//!
//! The session engine treats its user handle as opaque: it stores a shared
//! reference and never inspects it. [`Principal`] is the handle used when the
//! caller has no richer type of its own.

use crate::PrincipalId;
use serde::{Deserialize, Serialize};

/// The actor a session was issued to.
///
/// | Variant | Typical Use |
/// |---------|-------------|
/// | `User` | Interactive login through the web UI or RPC |
/// | `Service` | Local daemon authenticating with a service account |
/// | `System` | Internal housekeeping |
///
/// # Example
///
/// ```
/// use warden_types::{Principal, PrincipalId};
///
/// let user = Principal::User(PrincipalId::new());
/// assert!(user.is_user());
///
/// let svc = Principal::Service("netifd".into());
/// assert_eq!(svc.to_string(), "service:netifd");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Principal {
    /// Authenticated human user.
    User(PrincipalId),

    /// Named service account.
    Service(String),

    /// Internal operations not attributable to a user or service.
    System,
}

impl Principal {
    /// Returns `true` if this is a [`Principal::User`].
    #[must_use]
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User(_))
    }

    /// Returns `true` if this is a [`Principal::Service`].
    #[must_use]
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service(_))
    }

    /// Returns `true` if this is [`Principal::System`].
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }

    /// Returns the [`PrincipalId`] if this is a User.
    #[must_use]
    pub fn user_id(&self) -> Option<&PrincipalId> {
        match self {
            Self::User(id) => Some(id),
            _ => None,
        }
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{}", id.uuid()),
            Self::Service(name) => write!(f, "service:{name}"),
            Self::System => write!(f, "system"),
        }
    }
}
