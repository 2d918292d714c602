//! # Bastion Envelope
//!
//! Hybrid (classical + post-quantum) envelope encryption for record fields
//! and files at rest.
//!
//! Every payload is sealed under a fresh 256-bit DEK with AES-256-GCM; the
//! DEK itself is wrapped twice, once under a long-lived RSA-3072 key
//! (OAEP-SHA-256) and once via ML-KEM-512. Either wrap alone suffices to
//! decrypt, and when both succeed the recovered DEKs are cross-checked so
//! disagreement surfaces as an integrity violation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bastion_envelope::{ClassicalKeyPair, HybridEnvelope};
//!
//! # fn main() -> Result<(), bastion_envelope::EnvelopeError> {
//! let envelope = HybridEnvelope::new(ClassicalKeyPair::generate()?);
//!
//! let bundle = envelope.encrypt(b"session notes")?;
//! let plaintext = envelope.decrypt(&bundle)?;
//! assert_eq!(plaintext, b"session notes");
//! # Ok(())
//! # }
//! ```
//!
//! ## What's NOT Provided
//!
//! - Key persistence and provisioning (see `bastion-keystore`)
//! - Key rotation
//! - Storage schemas: callers persist the bundle's byte strings
//! - HTTP semantics of any kind

#![deny(unsafe_code)]

pub mod aead;
pub mod pqc;
pub mod sizes;

mod classical;
mod dek;
mod envelope;
mod error;
mod field;
mod record;

pub use classical::ClassicalKeyPair;
pub use dek::Dek;
pub use envelope::{DekEnvelope, EnvelopeBundle, HybridEnvelope};
pub use error::EnvelopeError;
pub use field::{decode_value, encode_value, FieldKind, FieldValue};
pub use pqc::{PqcKeyPair, PqcWrappedDek};
pub use record::SealedField;
