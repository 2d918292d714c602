//! Hybrid envelope orchestrator.
//!
//! One fresh DEK seals the payload; the DEK itself is wrapped twice, once
//! under the long-lived classical key and once under an ephemeral
//! post-quantum KEM. Decryption attempts both unwrap paths independently
//! and cross-checks the results: data survives the loss of one key family,
//! while disagreement between the two is surfaced as an integrity
//! violation rather than silently resolved.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::aead;
use crate::classical::ClassicalKeyPair;
use crate::dek::Dek;
use crate::error::EnvelopeError;
use crate::pqc;
use crate::sizes::NONCE_BYTES;

// ---------------------------------------------------------------------------
// Bundle types
// ---------------------------------------------------------------------------

/// The wrapped-DEK half of a bundle: everything needed to recover the DEK
/// through either path. Losing any one field makes that path unrecoverable;
/// the sibling path may still work. Zeroed on drop (the secret-key snapshot
/// is live key material).
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct DekEnvelope {
    /// DEK under RSA-3072 OAEP; always [`crate::sizes::CLASSICAL_WRAPPED_DEK_BYTES`].
    pub dek_ciphertext_classical: Vec<u8>,
    /// ML-KEM-512 encapsulation output.
    pub kem_ciphertext_pqc: Vec<u8>,
    /// nonce[12] || aead_ct(dek), keyed by the KEM shared secret.
    pub dek_package_pqc: Vec<u8>,
    /// Decapsulation key of the ephemeral pair minted for this bundle.
    pub pqc_secret_key_snapshot: Vec<u8>,
}

/// Complete output of one hybrid encryption. The caller persists every
/// field together; this crate defines no storage schema.
#[derive(Clone, Serialize, Deserialize)]
pub struct EnvelopeBundle {
    /// Nonce for the payload ciphertext.
    pub file_nonce: [u8; NONCE_BYTES],
    /// Payload under the DEK.
    pub ciphertext: Vec<u8>,
    /// Both wrapped forms of the DEK.
    pub dek: DekEnvelope,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Hybrid encryption context. Construct once at startup from the
/// keystore's classical keypair and hand a reference to every call site;
/// calls are self-contained and safe to issue concurrently.
pub struct HybridEnvelope {
    classical: ClassicalKeyPair,
}

impl HybridEnvelope {
    pub fn new(classical: ClassicalKeyPair) -> Self {
        Self { classical }
    }

    /// Encrypt an opaque payload: fresh DEK, both DEK wraps, payload seal.
    /// The in-memory DEK is zeroed when this call returns.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EnvelopeBundle, EnvelopeError> {
        let dek = Dek::generate()?;
        let dek_envelope = self.wrap_dek(&dek)?;
        let (file_nonce, ciphertext) = aead::seal(dek.as_bytes(), plaintext)?;
        Ok(EnvelopeBundle {
            file_nonce,
            ciphertext,
            dek: dek_envelope,
        })
    }

    /// Decrypt a bundle: recover the DEK through the two-path resolution
    /// policy, then open the payload.
    pub fn decrypt(&self, bundle: &EnvelopeBundle) -> Result<Vec<u8>, EnvelopeError> {
        let dek = self.recover_dek(&bundle.dek)?;
        aead::open(dek.as_bytes(), &bundle.file_nonce, &bundle.ciphertext)
    }

    /// Wrap one DEK through both envelope paths.
    pub(crate) fn wrap_dek(&self, dek: &Dek) -> Result<DekEnvelope, EnvelopeError> {
        let dek_ciphertext_classical = self.classical.wrap_dek(dek)?;
        let wrapped = pqc::wrap_dek(dek)?;
        Ok(DekEnvelope {
            dek_ciphertext_classical,
            kem_ciphertext_pqc: wrapped.kem_ciphertext,
            dek_package_pqc: wrapped.dek_package,
            pqc_secret_key_snapshot: wrapped.secret_key,
        })
    }

    /// Attempt both unwrap paths independently and combine the two slots.
    ///
    /// Per-path failures are logged and swallowed; only the aggregate
    /// outcome surfaces: disagreement is [`EnvelopeError::KeyVerification`],
    /// total failure is [`EnvelopeError::DekRecovery`].
    pub(crate) fn recover_dek(&self, envelope: &DekEnvelope) -> Result<Dek, EnvelopeError> {
        let from_classical = match self
            .classical
            .unwrap_dek(&envelope.dek_ciphertext_classical)
        {
            Ok(dek) => Some(dek),
            Err(err) => {
                warn!("classical DEK path unavailable: {err}");
                None
            }
        };

        let from_pqc = match pqc::unwrap_dek(
            &envelope.kem_ciphertext_pqc,
            &envelope.dek_package_pqc,
            &envelope.pqc_secret_key_snapshot,
        ) {
            Ok(dek) => Some(dek),
            Err(err) => {
                warn!("post-quantum DEK path unavailable: {err}");
                None
            }
        };

        match (from_classical, from_pqc) {
            (Some(classical), Some(pqc)) => {
                if classical.ct_eq(&pqc) {
                    debug!("both DEK paths succeeded and agree");
                    Ok(classical)
                } else {
                    Err(EnvelopeError::KeyVerification)
                }
            }
            (Some(classical), None) => {
                info!("DEK recovered via classical path only");
                Ok(classical)
            }
            (None, Some(pqc)) => {
                info!("DEK recovered via post-quantum path only");
                Ok(pqc)
            }
            (None, None) => Err(EnvelopeError::DekRecovery),
        }
    }
}
