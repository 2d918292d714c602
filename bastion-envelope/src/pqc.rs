//! Post-quantum envelope: ML-KEM-512.
//!
//! A KEM yields a shared secret plus a ciphertext, not a direct asymmetric
//! encryption of arbitrary data, so the DEK rides a symmetric step: the
//! 32-byte shared secret is used directly as an AES-256-GCM key to seal
//! the DEK into `dek_package = nonce[12] || aead_ct(dek)`.
//!
//! Each wrap call mints a fresh keypair and encapsulates against its own
//! public key; the ephemeral secret key is returned to the caller and must
//! be persisted with the rest of the bundle, or the package can never be
//! opened again.

use ml_kem::{
    kem::{Decapsulate, Encapsulate},
    Ciphertext, EncodedSizeUser, KemCore, MlKem512, MlKem512Params,
};
use rand_core::OsRng;
use zeroize::{Zeroize, Zeroizing};

use crate::aead;
use crate::dek::Dek;
use crate::error::EnvelopeError;
use crate::sizes::{
    MLKEM_CIPHERTEXT_BYTES, MLKEM_PUBLIC_KEY_BYTES, MLKEM_SECRET_KEY_BYTES, NONCE_BYTES,
    SHARED_SECRET_BYTES, TAG_BYTES,
};

type Ek = ml_kem::kem::EncapsulationKey<MlKem512Params>;
type Dk = ml_kem::kem::DecapsulationKey<MlKem512Params>;

/// ML-KEM typed ciphertext (for TryFrom).
type MlKemCt = Ciphertext<MlKem512>;

// ---------------------------------------------------------------------------
// Long-lived keypair
// ---------------------------------------------------------------------------

/// Long-lived ML-KEM-512 keypair, the post-quantum half of the node
/// identity provisioned by the keystore. The wrap path below does not
/// consult it; it mints a throwaway pair per call instead.
pub struct PqcKeyPair {
    ek: Ek,
    dk: Dk,
}

impl PqcKeyPair {
    pub fn generate() -> Self {
        let (dk, ek) = MlKem512::generate(&mut OsRng);
        Self { ek, dk }
    }

    /// Raw encapsulation-key bytes, as persisted on disk.
    pub fn public_bytes(&self) -> [u8; MLKEM_PUBLIC_KEY_BYTES] {
        let mut out = [0u8; MLKEM_PUBLIC_KEY_BYTES];
        out.copy_from_slice(self.ek.as_bytes().as_slice());
        out
    }

    /// Raw decapsulation-key bytes, as persisted on disk.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; MLKEM_SECRET_KEY_BYTES]> {
        let mut out = Zeroizing::new([0u8; MLKEM_SECRET_KEY_BYTES]);
        out.copy_from_slice(self.dk.as_bytes().as_slice());
        out
    }

    pub fn from_bytes(public: &[u8], secret: &[u8]) -> Result<Self, EnvelopeError> {
        let ek_bytes: [u8; MLKEM_PUBLIC_KEY_BYTES] = public
            .try_into()
            .map_err(|_| EnvelopeError::KeyCodec("bad ML-KEM public key length".into()))?;
        let mut dk_bytes: [u8; MLKEM_SECRET_KEY_BYTES] = secret
            .try_into()
            .map_err(|_| EnvelopeError::KeyCodec("bad ML-KEM secret key length".into()))?;
        let ek = Ek::from_bytes(&ek_bytes.into());
        let dk = Dk::from_bytes(&dk_bytes.into());
        dk_bytes.zeroize();
        Ok(Self { ek, dk })
    }
}

// ---------------------------------------------------------------------------
// DEK wrap / unwrap
// ---------------------------------------------------------------------------

/// Output of one post-quantum DEK wrap. All three byte strings must be
/// persisted together; each is useless without the other two.
pub struct PqcWrappedDek {
    /// KEM encapsulation output.
    pub kem_ciphertext: Vec<u8>,
    /// nonce[12] || aead_ct(dek): the DEK sealed under the shared secret.
    pub dek_package: Vec<u8>,
    /// Decapsulation key of the ephemeral pair minted for this call.
    pub secret_key: Vec<u8>,
}

/// Wrap a DEK under a fresh ephemeral ML-KEM-512 keypair.
pub fn wrap_dek(dek: &Dek) -> Result<PqcWrappedDek, EnvelopeError> {
    let (ephemeral_dk, ephemeral_ek) = MlKem512::generate(&mut OsRng);

    let (kem_ct, shared) = ephemeral_ek
        .encapsulate(&mut OsRng)
        .map_err(|_| EnvelopeError::PqcWrap("encapsulation failed".into()))?;

    let mut key = Zeroizing::new([0u8; SHARED_SECRET_BYTES]);
    key.copy_from_slice(shared.as_slice());

    let (nonce, sealed) = aead::seal(&key, dek.as_bytes())?;
    let mut dek_package = Vec::with_capacity(NONCE_BYTES + sealed.len());
    dek_package.extend_from_slice(&nonce);
    dek_package.extend_from_slice(&sealed);

    Ok(PqcWrappedDek {
        kem_ciphertext: kem_ct.as_slice().to_vec(),
        dek_package,
        secret_key: ephemeral_dk.as_bytes().as_slice().to_vec(),
    })
}

/// Recover a DEK: decapsulate with `secret_key`, split the package into
/// nonce and ciphertext, open. The error is uniform across wrong key,
/// corrupted ciphertext, and malformed input.
pub fn unwrap_dek(
    kem_ciphertext: &[u8],
    dek_package: &[u8],
    secret_key: &[u8],
) -> Result<Dek, EnvelopeError> {
    if kem_ciphertext.len() != MLKEM_CIPHERTEXT_BYTES {
        return Err(EnvelopeError::PqcUnwrap);
    }
    if dek_package.len() < NONCE_BYTES + TAG_BYTES {
        return Err(EnvelopeError::PqcUnwrap);
    }
    let mut dk_bytes: [u8; MLKEM_SECRET_KEY_BYTES] = secret_key
        .try_into()
        .map_err(|_| EnvelopeError::PqcUnwrap)?;
    let dk = Dk::from_bytes(&dk_bytes.into());
    dk_bytes.zeroize();

    let kem_ct = MlKemCt::try_from(kem_ciphertext).map_err(|_| EnvelopeError::PqcUnwrap)?;
    let shared = dk.decapsulate(&kem_ct).map_err(|_| EnvelopeError::PqcUnwrap)?;

    let mut key = Zeroizing::new([0u8; SHARED_SECRET_BYTES]);
    key.copy_from_slice(shared.as_slice());

    let nonce: [u8; NONCE_BYTES] = dek_package[..NONCE_BYTES]
        .try_into()
        .map_err(|_| EnvelopeError::PqcUnwrap)?;
    let recovered = Zeroizing::new(
        aead::open(&key, &nonce, &dek_package[NONCE_BYTES..])
            .map_err(|_| EnvelopeError::PqcUnwrap)?,
    );
    Dek::from_slice(&recovered).ok_or(EnvelopeError::PqcUnwrap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizes::DEK_PACKAGE_BYTES;

    #[test]
    fn wrap_unwrap_roundtrip() {
        let dek = Dek::generate().unwrap();
        let wrapped = wrap_dek(&dek).unwrap();

        assert_eq!(wrapped.kem_ciphertext.len(), MLKEM_CIPHERTEXT_BYTES);
        assert_eq!(wrapped.dek_package.len(), DEK_PACKAGE_BYTES);
        assert_eq!(wrapped.secret_key.len(), MLKEM_SECRET_KEY_BYTES);

        let recovered =
            unwrap_dek(&wrapped.kem_ciphertext, &wrapped.dek_package, &wrapped.secret_key)
                .unwrap();
        assert_eq!(recovered.as_bytes(), dek.as_bytes());
    }

    #[test]
    fn wrong_secret_key_fails() {
        let dek = Dek::generate().unwrap();
        let wrapped = wrap_dek(&dek).unwrap();
        let other = wrap_dek(&dek).unwrap();

        let result = unwrap_dek(&wrapped.kem_ciphertext, &wrapped.dek_package, &other.secret_key);
        assert!(matches!(result, Err(EnvelopeError::PqcUnwrap)));
    }

    #[test]
    fn bad_secret_key_length_fails() {
        let dek = Dek::generate().unwrap();
        let wrapped = wrap_dek(&dek).unwrap();
        let result = unwrap_dek(&wrapped.kem_ciphertext, &wrapped.dek_package, &[0u8; 16]);
        assert!(matches!(result, Err(EnvelopeError::PqcUnwrap)));
    }

    #[test]
    fn tampered_kem_ciphertext_fails() {
        let dek = Dek::generate().unwrap();
        let mut wrapped = wrap_dek(&dek).unwrap();
        wrapped.kem_ciphertext[7] ^= 0x01;
        let result =
            unwrap_dek(&wrapped.kem_ciphertext, &wrapped.dek_package, &wrapped.secret_key);
        assert!(matches!(result, Err(EnvelopeError::PqcUnwrap)));
    }

    #[test]
    fn truncated_package_fails() {
        let dek = Dek::generate().unwrap();
        let wrapped = wrap_dek(&dek).unwrap();
        let result = unwrap_dek(
            &wrapped.kem_ciphertext,
            &wrapped.dek_package[..NONCE_BYTES + TAG_BYTES - 1],
            &wrapped.secret_key,
        );
        assert!(matches!(result, Err(EnvelopeError::PqcUnwrap)));
    }

    #[test]
    fn keypair_bytes_roundtrip() {
        let pair = PqcKeyPair::generate();
        let rebuilt =
            PqcKeyPair::from_bytes(&pair.public_bytes(), pair.secret_bytes().as_slice()).unwrap();
        assert_eq!(pair.public_bytes(), rebuilt.public_bytes());
        assert_eq!(*pair.secret_bytes(), *rebuilt.secret_bytes());
    }
}
