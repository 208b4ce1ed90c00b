//! Identifier types.
//!
//! - [`SessionId`]: unguessable 128-bit session token, hex encoded
//! - [`PrincipalId`]: UUID-based identity of an authenticated user

use crate::{ErrorCode, TryNew};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Number of random bytes behind a session token.
pub const SESSION_ID_BYTES: usize = 16;

/// Length of the hex-encoded token.
pub const SESSION_ID_LEN: usize = SESSION_ID_BYTES * 2;

/// Session token: 32 lowercase hex characters encoding 16 random bytes.
///
/// Tokens are minted from raw entropy with [`from_bytes`](Self::from_bytes)
/// or parsed from untrusted input with [`TryNew::try_new`].
///
/// # Why No Default?
///
/// A default token would be guessable. Always mint from an entropy source.
///
/// # Example
///
/// ```
/// use warden_types::{SessionId, TryNew};
///
/// let sid = SessionId::from_bytes([0xab; 16]);
/// assert_eq!(sid.as_str().len(), 32);
/// assert!(sid.as_str().starts_with("abab"));
///
/// let parsed = SessionId::try_new(sid.to_string()).expect("valid token");
/// assert_eq!(parsed, sid);
///
/// assert!(SessionId::try_new("not-a-token".to_string()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Encodes 16 random bytes as a token.
    #[must_use]
    pub fn from_bytes(bytes: [u8; SESSION_ID_BYTES]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Returns the full token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first eight characters, for log lines.
    #[must_use]
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl TryNew for SessionId {
    type Error = SessionIdError;
    type Args = String;

    fn try_new(token: String) -> Result<Self, Self::Error> {
        if token.len() != SESSION_ID_LEN {
            return Err(SessionIdError::InvalidLength(token.len()));
        }
        if let Some(c) = token
            .chars()
            .find(|c| !matches!(c, '0'..='9' | 'a'..='f'))
        {
            return Err(SessionIdError::InvalidCharacter(c));
        }
        Ok(Self(token))
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionIdError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Self::try_new(token)
    }
}

impl From<SessionId> for String {
    fn from(sid: SessionId) -> Self {
        sid.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejection reasons for a session token string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionIdError {
    /// Token is not exactly 32 characters.
    #[error("session id must be {SESSION_ID_LEN} characters, got {0}")]
    InvalidLength(usize),

    /// Token contains something other than lowercase hex.
    #[error("session id contains non-hex character {0:?}")]
    InvalidCharacter(char),
}

impl ErrorCode for SessionIdError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidLength(_) => "SID_INVALID_LENGTH",
            Self::InvalidCharacter(_) => "SID_INVALID_CHARACTER",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Identity of an authenticated user.
///
/// # Example
///
/// ```
/// use warden_types::PrincipalId;
///
/// let alice = PrincipalId::new();
/// let bob = PrincipalId::new();
/// assert_ne!(alice, bob);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
    /// Creates a new [`PrincipalId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "principal:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_error_codes;

    #[test]
    fn from_bytes_is_lowercase_hex() {
        let sid = SessionId::from_bytes([
            0x00, 0x01, 0x0a, 0xff, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80, 0x90, 0xa0,
            0xb0, 0xc0,
        ]);
        assert_eq!(sid.as_str(), "00010aff102030405060708090a0b0c0");
        assert_eq!(sid.short(), "00010aff");
    }

    #[test]
    fn try_new_rejects_wrong_length() {
        let err = SessionId::try_new("abc".to_string()).expect_err("too short");
        assert_eq!(err, SessionIdError::InvalidLength(3));
    }

    #[test]
    fn try_new_rejects_uppercase() {
        let token = "ABCDEF0123456789abcdef0123456789".to_string();
        let err = SessionId::try_new(token).expect_err("uppercase must be rejected");
        assert_eq!(err, SessionIdError::InvalidCharacter('A'));
    }

    #[test]
    fn serde_as_plain_string() {
        let sid = SessionId::from_bytes([7; 16]);
        let json = serde_json::to_string(&sid).expect("serialize");
        assert_eq!(json, format!("\"{sid}\""));

        let back: SessionId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, sid);

        let bad: Result<SessionId, _> = serde_json::from_str("\"zz\"");
        assert!(bad.is_err());
    }

    #[test]
    fn error_codes_follow_convention() {
        assert_error_codes(
            &[
                SessionIdError::InvalidLength(0),
                SessionIdError::InvalidCharacter('x'),
            ],
            "SID_",
        );
    }

    #[test]
    fn principal_id_display() {
        let id = PrincipalId::new();
        assert!(id.to_string().starts_with("principal:"));
        assert_eq!(id.uuid(), id.0);
    }
}
