use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::{Argon2Params, EncryptionKey};
use crate::errors::{Result, VaultError};

/// Process configuration, loaded from `credvault.toml`.
///
/// Every field has a sensible default so CredVault works out-of-the-box
/// without any config file at all.  The encryption key itself is never
/// stored here, only the name of the environment variable holding it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault file location (relative paths resolve against the working dir).
    #[serde(default = "default_vault_path")]
    pub vault_path: String,

    /// Environment variable holding the base64 encryption key.
    #[serde(default = "default_key_env")]
    pub key_env: String,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_path() -> String {
    "vault.json".to_string()
}

fn default_key_env() -> String {
    "CREDVAULT_KEY".to_string()
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_path: default_vault_path(),
            key_env: default_key_env(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = "credvault.toml";

    /// Load settings from `<dir>/credvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Resolve the vault file path against `dir`.
    pub fn vault_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.vault_path)
    }

    /// Convert the Argon2 settings into hasher params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    /// Read the encryption key from the configured environment variable.
    pub fn encryption_key(&self) -> Result<EncryptionKey> {
        match std::env::var(&self.key_env) {
            Ok(encoded) if !encoded.trim().is_empty() => EncryptionKey::from_base64(&encoded),
            _ => Err(VaultError::ConfigError(format!(
                "encryption key not set — export {} (generate one with `credvault keygen`)",
                self.key_env
            ))),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
