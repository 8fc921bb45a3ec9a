//! Master-password hashing with Argon2id.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`),
//! so each hash carries its own salt and cost parameters.  Verification
//! always uses the parameters embedded in the stored hash, which means
//! the configured cost can be raised later without locking anyone out.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::errors::{Result, VaultError};

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

/// Configurable Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// One-way hashes and verifies master passwords.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    /// Build a hasher with explicit cost parameters.
    ///
    /// Rejects parameters below the safety floor so a typo in the config
    /// cannot silently weaken every stored hash.
    pub fn new(argon2_params: &Argon2Params) -> Result<Self> {
        if argon2_params.memory_kib < MIN_MEMORY_KIB {
            return Err(VaultError::HashingFailed(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                argon2_params.memory_kib
            )));
        }
        if argon2_params.iterations < 1 {
            return Err(VaultError::HashingFailed(
                "Argon2 iterations must be at least 1".into(),
            ));
        }
        if argon2_params.parallelism < 1 {
            return Err(VaultError::HashingFailed(
                "Argon2 parallelism must be at least 1".into(),
            ));
        }

        let params = Params::new(
            argon2_params.memory_kib,
            argon2_params.iterations,
            argon2_params.parallelism,
            None,
        )
        .map_err(|e| VaultError::HashingFailed(format!("invalid Argon2 params: {e}")))?;

        Ok(Self { params })
    }

    /// Hash `plaintext` under a freshly generated random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        let hash = argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| VaultError::HashingFailed(format!("Argon2id hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Check `plaintext` against a stored PHC hash.
    ///
    /// Never fails: a malformed hash simply does not verify.  The final
    /// tag comparison is constant-time inside `password-hash`.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
