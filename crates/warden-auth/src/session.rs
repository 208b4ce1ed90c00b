//! Sessions: per-user security contexts.

use crate::acl::{AclScope, AclTable};
use crate::entropy::{EntropySource, OsEntropy};
use crate::snapshot::SessionSnapshot;
use crate::{AttributeStore, SessionError};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use warden_types::{Principal, SessionId, SESSION_ID_BYTES};

/// Upper bound applied to session timeouts so deadlines stay representable.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// A time-bounded security context issued to one user.
///
/// A session carries an unguessable token, the scoped ACL grants made to it,
/// a bag of opaque attributes, and a sliding expiry deadline.
///
/// # Concurrency
///
/// Every operation takes the session's single lock for its whole duration,
/// so a session behaves as a monitor: share it as `Arc<Session<U>>` and call
/// from any thread. Sessions never touch each other's locks.
///
/// # Expiry
///
/// The deadline is `now + timeout` at creation and is pushed forward by every
/// [`access`](Self::access) call. Nothing here acts on expiry: the owner of
/// the session collection polls [`is_expired`](Self::is_expired) and
/// disposes of the session.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use warden_auth::Session;
/// use warden_types::{Principal, PrincipalId};
///
/// let user = Arc::new(Principal::User(PrincipalId::new()));
/// let session = Session::new(user, Duration::from_secs(300))?;
///
/// session.grant("ubus", "network.interface.*", "status", "r")?;
/// assert!(session.access("ubus", "network.interface.lan", "status", "r"));
/// assert!(!session.access("ubus", "network.interface.lan", "status", "w"));
///
/// session.revoke("ubus", "network.interface.lan", "status", "r")?;
/// assert!(!session.access("ubus", "network.interface.lan", "status", "r"));
/// # Ok::<(), warden_auth::SessionError>(())
/// ```
pub struct Session<U = Principal> {
    sid: SessionId,
    user: Arc<U>,
    timeout: Duration,
    state: Mutex<SessionState>,
}

struct SessionState {
    expires_at: Instant,
    acl: AclTable,
    data: AttributeStore,
}

impl<U> Session<U> {
    /// Creates a session with a token from the operating system CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Entropy`] if the CSPRNG is unavailable.
    pub fn new(user: Arc<U>, timeout: Duration) -> Result<Self, SessionError> {
        Self::with_entropy(user, timeout, &OsEntropy)
    }

    /// Creates a session with a token drawn from `entropy`.
    ///
    /// Timeouts above [`MAX_TIMEOUT`] are clamped to it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Entropy`] if `entropy` fails.
    pub fn with_entropy<E: EntropySource + ?Sized>(
        user: Arc<U>,
        timeout: Duration,
        entropy: &E,
    ) -> Result<Self, SessionError> {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        entropy.fill(&mut bytes).map_err(SessionError::Entropy)?;
        let sid = SessionId::from_bytes(bytes);
        let timeout = timeout.min(MAX_TIMEOUT);

        debug!(sid = %sid.short(), timeout_secs = timeout.as_secs(), "session created");

        Ok(Self {
            sid,
            user,
            timeout,
            state: Mutex::new(SessionState {
                expires_at: Instant::now() + timeout,
                acl: AclTable::new(),
                data: AttributeStore::new(),
            }),
        })
    }

    /// Returns the session token.
    #[must_use]
    pub fn sid(&self) -> &SessionId {
        &self.sid
    }

    /// Returns the user handle the session was issued to.
    #[must_use]
    pub fn user(&self) -> &Arc<U> {
        &self.user
    }

    /// Returns the sliding-window duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the current expiry deadline.
    #[must_use]
    pub fn expires_at(&self) -> Instant {
        self.state.lock().expires_at
    }

    /// Returns the time left before expiry, zero once expired.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        let now = Instant::now();
        self.state.lock().expires_at.saturating_duration_since(now)
    }

    /// Returns `true` once the deadline has passed.
    ///
    /// Does not refresh the deadline.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let now = Instant::now();
        now > self.state.lock().expires_at
    }

    /// Disposes of the session and everything it owns.
    ///
    /// Taking `self` by value guarantees no other caller still holds a
    /// reference; a shared session is first reclaimed with `Arc::try_unwrap`.
    pub fn destroy(self) {
        let state = self.state.into_inner();
        debug!(
            sid = %self.sid.short(),
            scopes = state.acl.scopes().count(),
            attributes = state.data.len(),
            "session destroyed"
        );
    }

    // ── ACL ──────────────────────────────────────────────────

    /// Grants `perms` on `(object, function)` patterns within `scope`.
    ///
    /// The scope is created on first use. Granting the same triple again
    /// adds a second entry; permissions combine at check time.
    ///
    /// `-` is reserved for revoked slots and must not appear in `perms`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidArgument`] if `object` or `function` is empty
    /// - [`SessionError::Allocation`] if entry storage cannot grow
    pub fn grant(
        &self,
        scope: &str,
        object: &str,
        function: &str,
        perms: &str,
    ) -> Result<(), SessionError> {
        self.state.lock().acl.grant(scope, object, function, perms)?;
        debug!(sid = %self.sid.short(), scope, object, function, perms, "acl granted");
        Ok(())
    }

    /// Revokes `perms` from every entry in `scope` that applies to
    /// `(object, function)`.
    ///
    /// Entries are kept; their matching permission slots are tombstoned.
    /// Returns the number of slots revoked, zero if nothing matched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ScopeNotFound`] if `scope` has no grants.
    pub fn revoke(
        &self,
        scope: &str,
        object: &str,
        function: &str,
        perms: &str,
    ) -> Result<usize, SessionError> {
        let revoked = self
            .state
            .lock()
            .acl
            .revoke(scope, object, function, perms)?;
        debug!(sid = %self.sid.short(), scope, object, function, perms, revoked, "acl revoked");
        Ok(revoked)
    }

    /// Checks whether `perms` are all granted on `(object, function)` in
    /// `scope`, refreshing the expiry deadline.
    ///
    /// Each requested character must be held, unrevoked, by at least one
    /// applicable entry. An empty request only requires an applicable entry.
    /// Unknown scopes deny.
    #[must_use]
    pub fn access(&self, scope: &str, object: &str, function: &str, perms: &str) -> bool {
        let allowed = {
            let mut state = self.state.lock();
            state.expires_at = Instant::now() + self.timeout;
            state.acl.allows(scope, object, function, perms)
        };
        trace!(sid = %self.sid.short(), scope, object, function, perms, allowed, "acl access");
        allowed
    }

    /// Names of all scopes holding grants, ascending.
    #[must_use]
    pub fn scope_names(&self) -> Vec<String> {
        self.state
            .lock()
            .acl
            .scopes()
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Number of entries stored in `scope`, revoked ones included.
    #[must_use]
    pub fn entry_count(&self, scope: &str) -> usize {
        self.state.lock().acl.scope(scope).map_or(0, AclScope::len)
    }

    /// Captures the ACL state.
    ///
    /// Read-only: the expiry deadline is left untouched.
    #[must_use]
    pub fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.state.lock().acl)
    }

    // ── Attributes ───────────────────────────────────────────

    /// Stores an attribute, returning the value it replaced.
    pub fn set_attribute(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.state.lock().data.set(key, value)
    }

    /// Returns a copy of the attribute stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AttributeNotFound`] if `key` is absent.
    pub fn attribute(&self, key: &str) -> Result<Value, SessionError> {
        self.state
            .lock()
            .data
            .get(key)
            .cloned()
            .ok_or_else(|| SessionError::attribute_not_found(key))
    }

    /// Removes an attribute, returning its value if it was present.
    pub fn erase_attribute(&self, key: &str) -> Option<Value> {
        self.state.lock().data.erase(key)
    }

    /// Copies all attributes in ascending key order.
    #[must_use]
    pub fn attributes(&self) -> Vec<(String, Value)> {
        self.state
            .lock()
            .data
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl<U> std::fmt::Debug for Session<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("sid", &self.sid.short())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl<U> std::fmt::Display for Session<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session:{}", self.sid.short())
    }
}
