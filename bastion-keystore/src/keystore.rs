//! Load-or-generate lifecycle for the long-lived keypairs.
//!
//! On open: ensure the keys directory exists, then for each key family
//! load the persisted halves, or generate and persist a fresh pair when
//! loading is impossible. Writes are atomic (temp file + rename) so a
//! reader never observes a half-written key file.

use std::fs;
use std::path::{Path, PathBuf};

use bastion_envelope::{ClassicalKeyPair, HybridEnvelope, PqcKeyPair};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::error::{KeyLoadError, ProvisionError};

/// Classical private key, PKCS#8 PEM, unencrypted.
pub const TRAD_PRIVATE_KEY_FILE: &str = "trad_private_key.pem";
/// Classical public key, SubjectPublicKeyInfo PEM.
pub const TRAD_PUBLIC_KEY_FILE: &str = "trad_public_key.pem";
/// Raw ML-KEM encapsulation key bytes.
pub const PQC_PUBLIC_KEY_FILE: &str = "pqc_public_key.bin";
/// Raw ML-KEM decapsulation key bytes.
pub const PQC_PRIVATE_KEY_FILE: &str = "pqc_private_key.bin";

/// The long-lived key material of one encrypting node.
///
/// `open` must complete before concurrent traffic begins; two processes
/// racing the first open against an empty directory could each persist a
/// different pair. Once open, the store is immutable and freely shareable.
pub struct KeyStore {
    keys_dir: PathBuf,
    classical: ClassicalKeyPair,
    pqc: PqcKeyPair,
}

impl KeyStore {
    /// Open the keys directory, loading or provisioning both keypairs.
    pub fn open(keys_dir: impl Into<PathBuf>) -> Result<Self, ProvisionError> {
        let keys_dir = keys_dir.into();
        fs::create_dir_all(&keys_dir).map_err(|source| ProvisionError::CreateDir {
            path: keys_dir.clone(),
            source,
        })?;

        let classical = load_or_generate_classical(&keys_dir)?;
        let pqc = load_or_generate_pqc(&keys_dir)?;

        Ok(Self {
            keys_dir,
            classical,
            pqc,
        })
    }

    pub fn keys_dir(&self) -> &Path {
        &self.keys_dir
    }

    /// The classical keypair; the only long-lived key the envelope
    /// encrypt path consults.
    pub fn classical(&self) -> &ClassicalKeyPair {
        &self.classical
    }

    /// The long-lived post-quantum keypair (node identity). The envelope
    /// wrap path mints its own ephemeral pair per call and does not use
    /// this one.
    pub fn pqc(&self) -> &PqcKeyPair {
        &self.pqc
    }

    /// Build a ready-to-use hybrid encryption context.
    pub fn envelope(&self) -> HybridEnvelope {
        HybridEnvelope::new(self.classical.clone())
    }
}

// ---------------------------------------------------------------------------
// Classical family
// ---------------------------------------------------------------------------

fn load_or_generate_classical(dir: &Path) -> Result<ClassicalKeyPair, ProvisionError> {
    let private_path = dir.join(TRAD_PRIVATE_KEY_FILE);
    let public_path = dir.join(TRAD_PUBLIC_KEY_FILE);

    if private_path.exists() && public_path.exists() {
        match load_classical(&private_path, &public_path) {
            Ok(pair) => return Ok(pair),
            Err(err) => warn!("classical keypair load failed, regenerating: {err}"),
        }
    }

    let pair = ClassicalKeyPair::generate().map_err(|source| ProvisionError::Generate {
        family: "classical",
        source,
    })?;
    let private_pem = pair
        .private_key_pem()
        .map_err(|source| ProvisionError::Encode {
            family: "classical",
            source,
        })?;
    let public_pem = pair
        .public_key_pem()
        .map_err(|source| ProvisionError::Encode {
            family: "classical",
            source,
        })?;

    write_atomic(&private_path, private_pem.as_bytes(), true)?;
    write_atomic(&public_path, public_pem.as_bytes(), false)?;
    info!(
        fingerprint = %fingerprint(public_pem.as_bytes()),
        "generated and persisted classical keypair"
    );
    Ok(pair)
}

fn load_classical(
    private_path: &Path,
    public_path: &Path,
) -> Result<ClassicalKeyPair, KeyLoadError> {
    let private_pem = fs::read_to_string(private_path)?;
    let public_pem = fs::read_to_string(public_path)?;
    let pair = ClassicalKeyPair::from_pem(&private_pem, &public_pem)?;
    info!(
        fingerprint = %fingerprint(public_pem.as_bytes()),
        "loaded classical keypair"
    );
    Ok(pair)
}

// ---------------------------------------------------------------------------
// Post-quantum family
// ---------------------------------------------------------------------------

fn load_or_generate_pqc(dir: &Path) -> Result<PqcKeyPair, ProvisionError> {
    let public_path = dir.join(PQC_PUBLIC_KEY_FILE);
    let private_path = dir.join(PQC_PRIVATE_KEY_FILE);

    if public_path.exists() && private_path.exists() {
        match load_pqc(&public_path, &private_path) {
            Ok(pair) => return Ok(pair),
            Err(err) => warn!("post-quantum keypair load failed, regenerating: {err}"),
        }
    }

    let pair = PqcKeyPair::generate();
    write_atomic(&public_path, &pair.public_bytes(), false)?;
    write_atomic(&private_path, pair.secret_bytes().as_slice(), true)?;
    info!(
        fingerprint = %fingerprint(&pair.public_bytes()),
        "generated and persisted post-quantum keypair"
    );
    Ok(pair)
}

fn load_pqc(public_path: &Path, private_path: &Path) -> Result<PqcKeyPair, KeyLoadError> {
    let public = fs::read(public_path)?;
    let secret = fs::read(private_path)?;
    let pair = PqcKeyPair::from_bytes(&public, &secret)?;
    info!(
        fingerprint = %fingerprint(&public),
        "loaded post-quantum keypair"
    );
    Ok(pair)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Atomic write: write to temp, then rename. Private halves get 0o600.
fn write_atomic(path: &Path, bytes: &[u8], private: bool) -> Result<(), ProvisionError> {
    let tmp = path.with_extension("tmp");
    let persist_err = |source| ProvisionError::Persist {
        path: path.to_path_buf(),
        source,
    };

    fs::write(&tmp, bytes).map_err(persist_err)?;
    #[cfg(unix)]
    if private {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600)).map_err(persist_err)?;
    }
    #[cfg(not(unix))]
    let _ = private;
    fs::rename(&tmp, path).map_err(persist_err)?;
    Ok(())
}

/// Short SHA-256 fingerprint of public key material, for log lines.
fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(&Sha256::digest(bytes)[..8])
}
