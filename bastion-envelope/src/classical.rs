//! Classical envelope: RSA-3072 with OAEP(SHA-256) padding.
//!
//! Wraps the DEK directly under the long-lived classical public key.
//! Output is always one RSA block (384 bytes for a 3072-bit modulus).
//! This path alone does not survive a quantum adversary; it exists for
//! defense-in-depth next to the post-quantum path.

use rsa::pkcs8::{
    DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding,
};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use rand_core::OsRng;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::dek::Dek;
use crate::error::EnvelopeError;
use crate::sizes::{CLASSICAL_MODULUS_BITS, CLASSICAL_WRAPPED_DEK_BYTES};

/// Long-lived classical keypair. Used only for DEK wrapping, never for
/// payload encryption.
#[derive(Clone)]
pub struct ClassicalKeyPair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl ClassicalKeyPair {
    /// Generate a fresh 3072-bit keypair. Expensive; intended for one-time
    /// provisioning, not per-call use.
    pub fn generate() -> Result<Self, EnvelopeError> {
        let private = RsaPrivateKey::new(&mut OsRng, CLASSICAL_MODULUS_BITS)
            .map_err(|e| EnvelopeError::KeyGeneration(e.to_string()))?;
        let public = private.to_public_key();
        Ok(Self { private, public })
    }

    /// Rebuild a keypair from its persisted PEM halves (PKCS#8 private,
    /// SubjectPublicKeyInfo public). Rejects moduli other than 3072 bits,
    /// since every stored wrapped DEK is sized by that modulus.
    pub fn from_pem(private_pem: &str, public_pem: &str) -> Result<Self, EnvelopeError> {
        let private = RsaPrivateKey::from_pkcs8_pem(private_pem)
            .map_err(|e| EnvelopeError::KeyCodec(e.to_string()))?;
        let public = RsaPublicKey::from_public_key_pem(public_pem)
            .map_err(|e| EnvelopeError::KeyCodec(e.to_string()))?;
        if private.size() != CLASSICAL_WRAPPED_DEK_BYTES {
            return Err(EnvelopeError::KeyCodec(format!(
                "unexpected classical modulus: {} bytes",
                private.size()
            )));
        }
        Ok(Self { private, public })
    }

    /// PKCS#8 PEM form of the private half, unencrypted.
    pub fn private_key_pem(&self) -> Result<Zeroizing<String>, EnvelopeError> {
        self.private
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| EnvelopeError::KeyCodec(e.to_string()))
    }

    /// SubjectPublicKeyInfo PEM form of the public half.
    pub fn public_key_pem(&self) -> Result<String, EnvelopeError> {
        self.public
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| EnvelopeError::KeyCodec(e.to_string()))
    }

    /// Encrypt the DEK under the public key. Output length is fixed at
    /// [`CLASSICAL_WRAPPED_DEK_BYTES`].
    pub fn wrap_dek(&self, dek: &Dek) -> Result<Vec<u8>, EnvelopeError> {
        self.public
            .encrypt(&mut OsRng, Oaep::new::<Sha256>(), dek.as_bytes())
            .map_err(|e| EnvelopeError::ClassicalWrap(e.to_string()))
    }

    /// Decrypt a wrapped DEK with the private key. The error carries no
    /// detail; padding failure, key mismatch, and corruption are not
    /// distinguished.
    pub fn unwrap_dek(&self, wrapped: &[u8]) -> Result<Dek, EnvelopeError> {
        let recovered = Zeroizing::new(
            self.private
                .decrypt(Oaep::new::<Sha256>(), wrapped)
                .map_err(|_| EnvelopeError::ClassicalUnwrap)?,
        );
        Dek::from_slice(&recovered).ok_or(EnvelopeError::ClassicalUnwrap)
    }
}
