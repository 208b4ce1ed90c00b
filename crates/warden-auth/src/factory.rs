//! Configured session minting.

use crate::config::SessionConfig;
use crate::entropy::{EntropySource, OsEntropy};
use crate::{Session, SessionError};
use std::sync::Arc;
use std::time::Duration;

/// Mints sessions with a configured timeout and a shared entropy source.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use warden_auth::config::SessionConfig;
/// use warden_auth::SessionFactory;
/// use warden_types::Principal;
///
/// let factory = SessionFactory::new(&SessionConfig { timeout_secs: 60 });
/// let session = factory.create(Arc::new(Principal::System))?;
/// assert_eq!(session.timeout().as_secs(), 60);
/// # Ok::<(), warden_auth::SessionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SessionFactory<E = OsEntropy> {
    timeout: Duration,
    entropy: E,
}

impl SessionFactory<OsEntropy> {
    /// Creates a factory backed by the operating system CSPRNG.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_entropy(config, OsEntropy)
    }
}

impl<E: EntropySource> SessionFactory<E> {
    /// Creates a factory drawing tokens from `entropy`.
    #[must_use]
    pub fn with_entropy(config: &SessionConfig, entropy: E) -> Self {
        Self {
            timeout: config.timeout(),
            entropy,
        }
    }

    /// Timeout given to every session this factory creates.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates a session for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Entropy`] if the entropy source fails.
    pub fn create<U>(&self, user: Arc<U>) -> Result<Session<U>, SessionError> {
        Session::with_entropy(user, self.timeout, &self.entropy)
    }
}
