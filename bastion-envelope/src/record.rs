//! Multi-field record sealing: one DEK shared across every encrypted
//! field of a record, wrapped once through both envelope paths.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aead;
use crate::dek::Dek;
use crate::envelope::{DekEnvelope, HybridEnvelope};
use crate::error::EnvelopeError;
use crate::field::{self, FieldKind, FieldValue};
use crate::sizes::NONCE_BYTES;

/// One encrypted field of a record. The shared [`DekEnvelope`] is stored
/// next to the record, not per field.
#[derive(Clone, Serialize, Deserialize)]
pub struct SealedField {
    pub nonce: [u8; NONCE_BYTES],
    pub ciphertext: Vec<u8>,
}

impl HybridEnvelope {
    /// Encrypt the given fields of a record under one fresh DEK.
    ///
    /// Returns the sealed fields keyed by name, plus the wrapped DEK to
    /// persist alongside them.
    pub fn encrypt_record(
        &self,
        fields: &[(&str, FieldValue)],
    ) -> Result<(BTreeMap<String, SealedField>, DekEnvelope), EnvelopeError> {
        let dek = Dek::generate()?;
        let dek_envelope = self.wrap_dek(&dek)?;

        let mut sealed = BTreeMap::new();
        for (name, value) in fields {
            let encoded = field::encode_value(value)?;
            let (nonce, ciphertext) = aead::seal(dek.as_bytes(), &encoded)?;
            sealed.insert(name.to_string(), SealedField { nonce, ciphertext });
        }
        Ok((sealed, dek_envelope))
    }

    /// Decrypt record fields with their shared wrapped DEK.
    ///
    /// The DEK is recovered once through the two-path resolution policy.
    /// Declared fields missing from `sealed` are skipped, mirroring
    /// records where a nullable column was never encrypted.
    pub fn decrypt_record(
        &self,
        sealed: &BTreeMap<String, SealedField>,
        dek_envelope: &DekEnvelope,
        kinds: &[(&str, FieldKind)],
    ) -> Result<BTreeMap<String, FieldValue>, EnvelopeError> {
        let dek = self.recover_dek(dek_envelope)?;

        let mut decrypted = BTreeMap::new();
        for (name, kind) in kinds {
            let Some(sealed_field) = sealed.get(*name) else {
                continue;
            };
            let encoded = aead::open(dek.as_bytes(), &sealed_field.nonce, &sealed_field.ciphertext)?;
            decrypted.insert(name.to_string(), field::decode_value(&encoded, *kind)?);
        }
        Ok(decrypted)
    }
}
