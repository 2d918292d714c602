//! AEAD: AES-256-GCM over the payload, keyed by a DEK or a KEM shared
//! secret. No associated data is bound; stored blobs carry none.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use getrandom::getrandom;

use crate::error::EnvelopeError;
use crate::sizes::{DEK_BYTES, NONCE_BYTES};

/// Generate a random 12-byte nonce. Fresh for every seal, never reused
/// under the same key.
pub fn nonce() -> Result<[u8; NONCE_BYTES], EnvelopeError> {
    let mut n = [0u8; NONCE_BYTES];
    getrandom(&mut n).map_err(|_| EnvelopeError::Rng)?;
    Ok(n)
}

/// Seal `plaintext` under `key` with a fresh random nonce.
pub fn seal(
    key: &[u8; DEK_BYTES],
    plaintext: &[u8],
) -> Result<([u8; NONCE_BYTES], Vec<u8>), EnvelopeError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let n = nonce()?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&n), plaintext)
        .map_err(|_| EnvelopeError::Seal)?;
    Ok((n, ciphertext))
}

/// Open `ciphertext`; fails with [`EnvelopeError::Authentication`] if the
/// ciphertext or nonce was tampered with or the key is wrong.
pub fn open(
    key: &[u8; DEK_BYTES],
    nonce: &[u8; NONCE_BYTES],
    ciphertext: &[u8],
) -> Result<Vec<u8>, EnvelopeError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| EnvelopeError::Authentication)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const KEY: [u8; DEK_BYTES] = [0x42; DEK_BYTES];

    #[test]
    fn seal_open_roundtrip() {
        let (n, ct) = seal(&KEY, b"payload").unwrap();
        assert_eq!(open(&KEY, &n, &ct).unwrap(), b"payload");
    }

    #[test]
    fn tampered_ciphertext_rejected() {
        let (n, mut ct) = seal(&KEY, b"payload").unwrap();
        ct[0] ^= 0x01;
        assert!(matches!(
            open(&KEY, &n, &ct),
            Err(EnvelopeError::Authentication)
        ));
    }

    #[test]
    fn tampered_nonce_rejected() {
        let (mut n, ct) = seal(&KEY, b"payload").unwrap();
        n[0] ^= 0x01;
        assert!(matches!(
            open(&KEY, &n, &ct),
            Err(EnvelopeError::Authentication)
        ));
    }

    #[test]
    fn wrong_key_rejected() {
        let (n, ct) = seal(&KEY, b"payload").unwrap();
        let other = [0x43; DEK_BYTES];
        assert!(matches!(
            open(&other, &n, &ct),
            Err(EnvelopeError::Authentication)
        ));
    }

    #[test]
    fn nonces_are_unique_across_many_seals() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let (n, _) = seal(&KEY, b"same input").unwrap();
            assert!(seen.insert(n), "nonce reused under the same key");
        }
    }
}
