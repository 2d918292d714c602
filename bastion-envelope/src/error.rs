//! Error taxonomy for the hybrid envelope.
//!
//! The unwrap variants carry no detail: a failed DEK recovery path must
//! not reveal whether padding, key material, or the ciphertext itself was
//! at fault.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Operating system RNG was unavailable.
    #[error("operating system RNG failed")]
    Rng,

    /// Long-lived or ephemeral key generation failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Key material could not be encoded or decoded (PEM, raw bytes).
    #[error("key material codec failed: {0}")]
    KeyCodec(String),

    /// AEAD seal failed (encrypt side).
    #[error("AEAD seal failed")]
    Seal,

    /// AEAD tag rejected the payload: tampered ciphertext, wrong nonce,
    /// or wrong key. Always surfaced to the caller.
    #[error("payload authentication failed")]
    Authentication,

    /// Classical (RSA-OAEP) DEK wrap failed.
    #[error("classical DEK wrap failed: {0}")]
    ClassicalWrap(String),

    /// Classical DEK unwrap failed. Recoverable at the orchestrator:
    /// the post-quantum path may still yield the DEK.
    #[error("classical DEK unwrap failed")]
    ClassicalUnwrap,

    /// Post-quantum DEK wrap failed.
    #[error("post-quantum DEK wrap failed: {0}")]
    PqcWrap(String),

    /// Post-quantum DEK unwrap failed. Recoverable at the orchestrator.
    #[error("post-quantum DEK unwrap failed")]
    PqcUnwrap,

    /// Both DEK paths recovered a value and the values disagree. The two
    /// trust roots contradict each other; never silently resolved.
    #[error("recovered DEKs disagree between classical and post-quantum paths")]
    KeyVerification,

    /// Neither DEK path recovered a value.
    #[error("all DEK recovery paths failed")]
    DekRecovery,

    /// Declared field type is outside the supported set.
    #[error("unsupported field type: {0}")]
    UnsupportedFieldType(String),

    /// Decrypted field bytes do not parse as the declared type.
    #[error("field decode failed: {0}")]
    FieldDecode(String),
}
