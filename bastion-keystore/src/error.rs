//! Error types for key provisioning.

use std::io;
use std::path::PathBuf;

use bastion_envelope::EnvelopeError;
use thiserror::Error;

/// Fatal startup failure: the long-lived keypairs could not be created or
/// persisted. There is no automatic retry; the process should not serve
/// traffic without its keys.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("failed to create keys directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to generate {family} keypair: {source}")]
    Generate {
        family: &'static str,
        source: EnvelopeError,
    },

    #[error("failed to encode {family} key material: {source}")]
    Encode {
        family: &'static str,
        source: EnvelopeError,
    },

    #[error("failed to persist {path}: {source}")]
    Persist { path: PathBuf, source: io::Error },
}

/// Why an on-disk keypair could not be used. Load failures are not fatal:
/// the store falls through to generate-and-persist.
#[derive(Debug, Error)]
pub(crate) enum KeyLoadError {
    #[error("read: {0}")]
    Io(#[from] io::Error),

    #[error("decode: {0}")]
    Codec(#[from] EnvelopeError),
}
