//! AES-256-GCM authenticated encryption of credential strings.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  The resulting bytes are base64-encoded
//! so they can be stored as a plain JSON string.
//!
//! Layout of the decoded ciphertext:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use std::fmt;

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::{Zeroize, Zeroizing};

use super::key::EncryptionKey;
use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
const TAG_LEN: usize = 16;

/// Encrypts and decrypts secrets under one process-wide key.
///
/// Holds no mutable state, so a single provider can be shared across
/// threads.
pub struct CipherProvider {
    cipher: Aes256Gcm,
}

impl CipherProvider {
    /// Build a provider from the configured key.
    pub fn new(key: &EncryptionKey) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(key.as_bytes());
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Encrypt `plaintext`, returning base64(nonce || ciphertext || tag).
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

        let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        output.extend_from_slice(&nonce);
        output.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(output))
    }

    /// Decrypt a string produced by `encrypt`.
    ///
    /// Malformed base64, truncated input, a wrong key or any tampering
    /// all surface as `DecryptionFailed`.
    pub fn decrypt(&self, ciphertext: &str) -> Result<Zeroizing<String>> {
        let data = BASE64
            .decode(ciphertext)
            .map_err(|_| VaultError::DecryptionFailed)?;

        if data.len() < NONCE_LEN + TAG_LEN {
            return Err(VaultError::DecryptionFailed);
        }

        let (nonce_bytes, sealed) = data.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, sealed)
            .map_err(|_| VaultError::DecryptionFailed)?;

        String::from_utf8(plaintext).map(Zeroizing::new).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            VaultError::DecryptionFailed
        })
    }
}

impl fmt::Debug for CipherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherProvider")
            .field("algorithm", &"AES-256-GCM")
            .finish_non_exhaustive()
    }
}
