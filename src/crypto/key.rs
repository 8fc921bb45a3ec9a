//! The process-wide symmetric encryption key.
//!
//! The key is provisioned by the operator (see `credvault keygen`) and
//! handed to the process as a base64 string, usually through an
//! environment variable.  It is never generated implicitly at runtime.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Result, VaultError};

/// Length of an AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// A 32-byte AES-256 key that zeroes its memory when dropped.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct EncryptionKey {
    bytes: [u8; KEY_LEN],
}

impl EncryptionKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generate a fresh random key.
    ///
    /// This is the operator-invoked key generation utility; the vault
    /// itself only ever loads an existing key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Decode a key from its base64 representation.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let decoded = Zeroizing::new(
            BASE64
                .decode(encoded.trim())
                .map_err(|e| VaultError::InvalidKey(format!("not valid base64: {e}")))?,
        );

        let bytes: [u8; KEY_LEN] = decoded.as_slice().try_into().map_err(|_| {
            VaultError::InvalidKey(format!(
                "key must be exactly {KEY_LEN} bytes, got {}",
                decoded.len()
            ))
        })?;

        Ok(Self { bytes })
    }

    /// Encode the key as base64 for provisioning.
    pub fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(BASE64.encode(self.bytes))
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_roundtrip_preserves_key() {
        let key = EncryptionKey::generate();
        let encoded = key.to_base64();
        let decoded = EncryptionKey::from_base64(&encoded).unwrap();
        assert_eq!(key.as_bytes(), decoded.as_bytes());
    }

    #[test]
    fn generated_keys_differ() {
        let a = EncryptionKey::generate();
        let b = EncryptionKey::generate();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let key = EncryptionKey::new([7u8; KEY_LEN]);
        let padded = format!("  {}\n", key.to_base64().as_str());
        let decoded = EncryptionKey::from_base64(&padded).unwrap();
        assert_eq!(decoded.as_bytes(), &[7u8; KEY_LEN]);
    }

    #[test]
    fn rejects_wrong_length() {
        let short = BASE64.encode([1u8; 16]);
        assert!(matches!(
            EncryptionKey::from_base64(&short),
            Err(VaultError::InvalidKey(_))
        ));
    }

    #[test]
    fn rejects_non_base64() {
        assert!(matches!(
            EncryptionKey::from_base64("not a key!"),
            Err(VaultError::InvalidKey(_))
        ));
    }

    #[test]
    fn debug_output_redacts_bytes() {
        let key = EncryptionKey::new([0xAB; KEY_LEN]);
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("171"));
    }
}
