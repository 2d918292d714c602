//! Byte-size constants for every persisted field.
//!
//! Stored blobs are reconstructed by fixed offsets, so any code that
//! serializes or splits bundle fields must consume these constants rather
//! than hard-coding lengths.

/// Data Encryption Key size (AES-256).
pub const DEK_BYTES: usize = 32;

/// AES-GCM nonce size.
pub const NONCE_BYTES: usize = 12;

/// AES-GCM authentication tag size.
pub const TAG_BYTES: usize = 16;

// ---------------------------------------------------------------------------
// Classical envelope (RSA-3072, OAEP-SHA-256)
// ---------------------------------------------------------------------------

/// Modulus size of the long-lived classical keypair.
pub const CLASSICAL_MODULUS_BITS: usize = 3072;

/// A wrapped DEK is exactly one RSA block: modulus_bits / 8.
pub const CLASSICAL_WRAPPED_DEK_BYTES: usize = CLASSICAL_MODULUS_BITS / 8; // 384

// ---------------------------------------------------------------------------
// Post-quantum envelope (ML-KEM-512)
// ---------------------------------------------------------------------------

/// ML-KEM-512 component sizes (FIPS 203).
pub const MLKEM_CIPHERTEXT_BYTES: usize = 768;
pub const MLKEM_PUBLIC_KEY_BYTES: usize = 800;
pub const MLKEM_SECRET_KEY_BYTES: usize = 1632;

/// KEM shared secret size; used directly as the DEK-wrapping AEAD key.
pub const SHARED_SECRET_BYTES: usize = 32;

/// DEK package: nonce[12] || aead_ct(dek)[32 + 16]
pub const DEK_PACKAGE_BYTES: usize = NONCE_BYTES + DEK_BYTES + TAG_BYTES; // 60
