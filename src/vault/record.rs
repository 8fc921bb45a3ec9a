//! `UserId` and `VaultRecord`: one user's entry in the vault document.
//!
//! On disk a record is a flat JSON object: the reserved `master_pass`
//! key holds the Argon2id PHC hash and every other key is a service name
//! mapped to its encrypted secret.
//!
//! ```json
//! { "master_pass": "$argon2id$...", "github": "base64...", "email": "base64..." }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};

/// Reserved JSON key holding the master-password hash.
///
/// Kept as `master_pass` so older vault files keep their layout.  Their
/// records parse but cannot be unlocked (bcrypt hashes, Fernet secrets)
/// and have to be removed before the owner re-initializes.  It can never
/// be used as a service name (see `validate_service_name`).
pub const MASTER_PASS_KEY: &str = "master_pass";

/// Maximum length of a service name in bytes.
const MAX_SERVICE_NAME_LEN: usize = 256;

/// Opaque, stable identifier of a vault owner.
///
/// Chat front ends usually hand out numeric ids, so integers convert
/// directly; the document always keys users by their string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A single user's master-password hash and encrypted credentials.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRecord {
    /// Argon2id PHC hash; `None` until the user sets a master password.
    #[serde(
        rename = "master_pass",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    master_password_hash: Option<String>,

    /// Service name -> encrypted secret.
    #[serde(flatten)]
    credentials: BTreeMap<String, String>,
}

impl VaultRecord {
    /// Returns `true` once a master password has been set.
    pub fn is_initialized(&self) -> bool {
        self.master_password_hash.is_some()
    }

    pub fn master_password_hash(&self) -> Option<&str> {
        self.master_password_hash.as_deref()
    }

    /// Replace the master-password hash.  Credentials are left untouched.
    pub fn set_master_password_hash(&mut self, hash: String) {
        self.master_password_hash = Some(hash);
    }

    /// Look up the encrypted secret for `service`.
    pub fn credential(&self, service: &str) -> Option<&str> {
        self.credentials.get(service).map(String::as_str)
    }

    pub fn has_credential(&self, service: &str) -> bool {
        self.credentials.contains_key(service)
    }

    /// Insert or overwrite the encrypted secret for `service`.
    pub fn insert_credential(&mut self, service: &str, encrypted: String) -> Result<()> {
        validate_service_name(service)?;
        self.credentials.insert(service.to_string(), encrypted);
        Ok(())
    }

    /// Remove `service`, returning `true` if it was present.
    pub fn remove_credential(&mut self, service: &str) -> bool {
        self.credentials.remove(service).is_some()
    }

    /// Service names in sorted order.
    pub fn services(&self) -> Vec<String> {
        self.credentials.keys().cloned().collect()
    }

    /// Every service -> encrypted secret pair, sorted by service name.
    pub fn credentials(&self) -> &BTreeMap<String, String> {
        &self.credentials
    }

    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }
}

impl fmt::Debug for VaultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultRecord")
            .field("initialized", &self.is_initialized())
            .field("services", &self.credentials.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Validate that a service name can be stored.
///
/// Names are free text and case-sensitive, but must be non-empty, at
/// most 256 bytes, and must not shadow the reserved `master_pass` key.
pub fn validate_service_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(VaultError::InvalidServiceName(
            "service name cannot be empty".into(),
        ));
    }
    if name.len() > MAX_SERVICE_NAME_LEN {
        return Err(VaultError::InvalidServiceName(format!(
            "service name cannot exceed {MAX_SERVICE_NAME_LEN} bytes"
        )));
    }
    if name == MASTER_PASS_KEY {
        return Err(VaultError::InvalidServiceName(format!(
            "'{MASTER_PASS_KEY}' is reserved"
        )));
    }
    Ok(())
}
