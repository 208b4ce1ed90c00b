//! Randomness source for session tokens.
//!
//! Token generation goes through the [`EntropySource`] trait rather than a
//! process-wide generator, so callers can substitute a source in tests or on
//! platforms with their own hardware RNG.

use rand::rngs::OsRng;
use rand::RngCore;
use std::io;

/// Cryptographically strong byte source.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one source is typically shared by
/// every session minted through a [`SessionFactory`](crate::SessionFactory).
pub trait EntropySource: Send + Sync {
    /// Fills `buf` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the source is unavailable or short-reads.
    fn fill(&self, buf: &mut [u8]) -> io::Result<()>;
}

/// Operating system CSPRNG (`getrandom(2)`, `/dev/urandom`, `BCryptGenRandom`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> io::Result<()> {
        OsRng.try_fill_bytes(buf).map_err(io::Error::other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_entropy_fills_buffer() {
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        OsEntropy.fill(&mut a).expect("os entropy available");
        OsEntropy.fill(&mut b).expect("os entropy available");
        assert_ne!(a, b);
    }
}
