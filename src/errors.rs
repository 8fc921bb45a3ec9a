use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in CredVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Authorization errors ---
    #[error("No master password set — run `credvault init` first")]
    NotInitialized,

    #[error("Incorrect master password")]
    AuthenticationFailed,

    // --- Vault errors ---
    #[error("No credential stored for '{0}'")]
    CredentialNotFound(String),

    #[error("Vault file {} is corrupt: {reason}", path.display())]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Invalid service name: {0}")]
    InvalidServiceName(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong key or corrupted data")]
    DecryptionFailed,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid encryption key: {0}")]
    InvalidKey(String),

    // --- Config errors ---
    #[error("Config error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for CredVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
