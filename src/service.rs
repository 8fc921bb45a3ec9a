//! `VaultService`: the use-case façade front ends call into.
//!
//! Combines the store, the cipher and the hasher, and applies the same
//! authorization rules to every operation:
//!
//! - No master password yet: only `set_master_password` works, anything
//!   else is `NotInitialized`.
//! - `get`, `update`, `delete`, `export` and `destroy` take the master
//!   password and verify it first; a mismatch is `AuthenticationFailed`
//!   and nothing is read or written.
//! - `store_credential` and `list_services` only require initialization.
//!
//! The service holds no global state; build one at startup and share it
//! (e.g. behind an `Arc`) with whatever handles requests.

use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::crypto::{CipherProvider, CredentialHasher};
use crate::errors::{Result, VaultError};
use crate::vault::{validate_service_name, UserId, VaultRecord, VaultStore};

/// A decrypted `(service, secret)` pair returned by `export_all`.
pub type ExportedCredential = (String, Zeroizing<String>);

#[derive(Debug)]
pub struct VaultService {
    store: VaultStore,
    cipher: CipherProvider,
    hasher: CredentialHasher,
}

impl VaultService {
    pub fn new(store: VaultStore, cipher: CipherProvider, hasher: CredentialHasher) -> Self {
        Self {
            store,
            cipher,
            hasher,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &VaultStore {
        &self.store
    }

    /// Returns `true` if `user` has set a master password.
    pub fn is_initialized(&self, user: &UserId) -> Result<bool> {
        Ok(self
            .store
            .read_user(user)?
            .is_some_and(|record| record.is_initialized()))
    }

    // ------------------------------------------------------------------
    // Master password
    // ------------------------------------------------------------------

    /// Hash and store `plaintext` as the user's master password.
    ///
    /// Replaces any previous hash; stored credentials are kept.
    pub fn set_master_password(&self, user: &UserId, plaintext: &str) -> Result<()> {
        let hash = self.hasher.hash(plaintext)?;
        self.store.mutate(user, |record| {
            record.set_master_password_hash(hash);
            Ok(())
        })?;

        info!(user = %user, "master password set");
        Ok(())
    }

    /// Check `plaintext` against the user's master password.
    ///
    /// Fails with `NotInitialized` when no master password is set.
    pub fn verify_master_password(&self, user: &UserId, plaintext: &str) -> Result<bool> {
        let record = self.initialized_record(user)?;
        Ok(self.verify_against(&record, plaintext))
    }

    // ------------------------------------------------------------------
    // Credentials
    // ------------------------------------------------------------------

    /// Encrypt and store a credential, overwriting any previous value.
    ///
    /// Requires initialization but not the master password.
    pub fn store_credential(&self, user: &UserId, service: &str, plaintext: &str) -> Result<()> {
        self.initialized_record(user)?;
        validate_service_name(service)?;

        let encrypted = self.cipher.encrypt(plaintext)?;
        self.store.mutate(user, |record| {
            // Re-checked under the store lock: the record may have been
            // removed since the check above.
            if !record.is_initialized() {
                return Err(VaultError::NotInitialized);
            }
            record.insert_credential(service, encrypted)
        })?;

        info!(user = %user, service, "credential stored");
        Ok(())
    }

    /// Decrypt and return one credential.
    pub fn get_credential(
        &self,
        user: &UserId,
        master_password: &str,
        service: &str,
    ) -> Result<Zeroizing<String>> {
        let record = self.authorize(user, master_password)?;
        let encrypted = record
            .credential(service)
            .ok_or_else(|| VaultError::CredentialNotFound(service.to_string()))?;

        self.cipher.decrypt(encrypted)
    }

    /// Replace an existing credential.
    ///
    /// Unlike `store_credential` this requires the master password and
    /// fails with `CredentialNotFound` if the service was never stored.
    pub fn update_credential(
        &self,
        user: &UserId,
        master_password: &str,
        service: &str,
        new_plaintext: &str,
    ) -> Result<()> {
        let record = self.authorize(user, master_password)?;
        if !record.has_credential(service) {
            return Err(VaultError::CredentialNotFound(service.to_string()));
        }

        let encrypted = self.cipher.encrypt(new_plaintext)?;
        self.store.mutate(user, |record| {
            if !record.has_credential(service) {
                return Err(VaultError::CredentialNotFound(service.to_string()));
            }
            record.insert_credential(service, encrypted)
        })?;

        info!(user = %user, service, "credential updated");
        Ok(())
    }

    /// Delete one credential.  Returns `false` if it did not exist.
    pub fn delete_credential(
        &self,
        user: &UserId,
        master_password: &str,
        service: &str,
    ) -> Result<bool> {
        self.authorize(user, master_password)?;
        let removed = self.store.delete_credential(user, service)?;

        if removed {
            info!(user = %user, service, "credential deleted");
        }
        Ok(removed)
    }

    /// Names of all stored services, sorted.
    pub fn list_services(&self, user: &UserId) -> Result<Vec<String>> {
        Ok(self.initialized_record(user)?.services())
    }

    /// Decrypt every stored credential, sorted by service name.
    ///
    /// All-or-nothing: if any entry fails to decrypt the whole export
    /// fails with `DecryptionFailed` rather than returning a partial list.
    pub fn export_all(
        &self,
        user: &UserId,
        master_password: &str,
    ) -> Result<Vec<ExportedCredential>> {
        let record = self.authorize(user, master_password)?;

        record
            .credentials()
            .iter()
            .map(|(service, encrypted)| -> Result<ExportedCredential> {
                match self.cipher.decrypt(encrypted) {
                    Ok(plaintext) => Ok((service.clone(), plaintext)),
                    Err(e) => {
                        warn!(user = %user, service = %service, "export aborted, credential failed to decrypt");
                        Err(e)
                    }
                }
            })
            .collect()
    }

    /// Delete the user's whole record, master password included.
    pub fn destroy_vault(&self, user: &UserId, master_password: &str) -> Result<bool> {
        self.authorize(user, master_password)?;
        let removed = self.store.remove_user(user)?;

        if removed {
            info!(user = %user, "vault destroyed");
        }
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Authorization
    // ------------------------------------------------------------------

    fn initialized_record(&self, user: &UserId) -> Result<VaultRecord> {
        match self.store.read_user(user)? {
            Some(record) if record.is_initialized() => Ok(record),
            _ => Err(VaultError::NotInitialized),
        }
    }

    fn authorize(&self, user: &UserId, master_password: &str) -> Result<VaultRecord> {
        let record = self.initialized_record(user)?;
        if !self.verify_against(&record, master_password) {
            warn!(user = %user, "master password verification failed");
            return Err(VaultError::AuthenticationFailed);
        }
        Ok(record)
    }

    fn verify_against(&self, record: &VaultRecord, plaintext: &str) -> bool {
        record
            .master_password_hash()
            .is_some_and(|hash| self.hasher.verify(plaintext, hash))
    }
}
