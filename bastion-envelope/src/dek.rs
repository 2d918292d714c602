//! Data Encryption Key: 32 random bytes, one per protected payload.

use getrandom::getrandom;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::EnvelopeError;
use crate::sizes::DEK_BYTES;

/// Ephemeral symmetric key protecting exactly one payload.
///
/// Lives in memory for the duration of a single encrypt or decrypt call
/// and is zeroed when dropped, on every exit path.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Dek([u8; DEK_BYTES]);

impl Dek {
    /// Generate a fresh DEK from the OS RNG.
    pub fn generate() -> Result<Self, EnvelopeError> {
        let mut bytes = [0u8; DEK_BYTES];
        getrandom(&mut bytes).map_err(|_| EnvelopeError::Rng)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; DEK_BYTES] {
        &self.0
    }

    /// Rebuild a DEK from recovered bytes; `None` on length mismatch.
    pub(crate) fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; DEK_BYTES] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// Constant-time equality; the cross-check compares two secrets.
    pub(crate) fn ct_eq(&self, other: &Self) -> bool {
        bool::from(self.0.ct_eq(&other.0))
    }
}
