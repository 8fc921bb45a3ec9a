//! `VaultStore`: the persisted user -> record mapping.
//!
//! Every mutation is a full load-modify-persist cycle over the whole
//! document, serialized by a lock shared by every `VaultStore` in the
//! process that points at the same file, so concurrent callers never lose
//! each other's updates.  Reads take no lock: the atomic rename in
//! `format::write_document` guarantees they only ever see a complete
//! document.
//!
//! Separate processes writing the same file are not coordinated; run one
//! process per vault file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{const_mutex, Mutex};
use tracing::debug;

use super::format::{self, VaultDocument};
use super::record::{UserId, VaultRecord};
use crate::errors::Result;

/// Write locks keyed by resolved vault path.  Entries live for the rest
/// of the process; there is one per distinct vault file.
static WRITE_LOCKS: Mutex<BTreeMap<PathBuf, Arc<Mutex<()>>>> = const_mutex(BTreeMap::new());

/// Handle to the vault document on disk.
///
/// Handles are cheap to create: every handle on the same file shares one
/// write lock, so a second `VaultStore::new` on the same path is safe.
/// Sharing one handle (e.g. inside `VaultService` behind an `Arc`) is
/// still the normal setup.
#[derive(Debug)]
pub struct VaultStore {
    /// Path to the JSON vault file.
    path: PathBuf,

    /// Guards every load-modify-persist cycle on `path`.
    write_lock: Arc<Mutex<()>>,
}

impl VaultStore {
    /// Create a store backed by the file at `path`.
    ///
    /// Nothing is read or written until the first operation; a missing
    /// file is a valid empty vault.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let write_lock = Arc::clone(
            WRITE_LOCKS
                .lock()
                .entry(lock_key(&path))
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        );

        Self { path, write_lock }
    }

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Load the full document.
    ///
    /// A missing file yields an empty document; a corrupt file is an error.
    pub fn load(&self) -> Result<VaultDocument> {
        let document = format::read_document(&self.path)?;
        if document.is_none() {
            debug!(path = %self.path.display(), "vault file absent, starting empty");
        }
        Ok(document.unwrap_or_default())
    }

    /// Fetch one user's record, if any.
    pub fn read_user(&self, user: &UserId) -> Result<Option<VaultRecord>> {
        let mut document = self.load()?;
        Ok(document.remove(user))
    }

    /// Service names stored for `user`, sorted.  Never includes the
    /// master-password field.
    pub fn list_services(&self, user: &UserId) -> Result<Vec<String>> {
        Ok(self
            .read_user(user)?
            .map(|record| record.services())
            .unwrap_or_default())
    }

    /// Every service -> encrypted secret pair for `user`, without the
    /// master-password field.
    pub fn export_credentials(&self, user: &UserId) -> Result<BTreeMap<String, String>> {
        Ok(self
            .read_user(user)?
            .map(|record| record.credentials().clone())
            .unwrap_or_default())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Apply `update` to `user`'s record and persist the whole document.
    ///
    /// The record is created empty if absent.  If `update` fails, its
    /// error is returned and nothing is written.
    pub fn mutate<F>(&self, user: &UserId, update: F) -> Result<VaultRecord>
    where
        F: FnOnce(&mut VaultRecord) -> Result<()>,
    {
        let _guard = self.write_lock.lock();

        let mut document = self.load()?;
        let mut record = document.get(user).cloned().unwrap_or_default();
        update(&mut record)?;

        document.insert(user.clone(), record.clone());
        self.persist(&document)?;

        debug!(user = %user, "vault record updated");
        Ok(record)
    }

    /// Remove one credential.
    ///
    /// Returns `false` without writing anything when the user or service
    /// does not exist.
    pub fn delete_credential(&self, user: &UserId, service: &str) -> Result<bool> {
        let _guard = self.write_lock.lock();

        let mut document = self.load()?;
        let removed = document
            .get_mut(user)
            .is_some_and(|record| record.remove_credential(service));

        if removed {
            self.persist(&document)?;
            debug!(user = %user, service, "credential removed");
        }
        Ok(removed)
    }

    /// Remove a user's entire record, master password included.
    ///
    /// Returns `false` without writing anything when the user is unknown.
    pub fn remove_user(&self, user: &UserId) -> Result<bool> {
        let _guard = self.write_lock.lock();

        let mut document = self.load()?;
        let removed = document.remove(user).is_some();

        if removed {
            self.persist(&document)?;
            debug!(user = %user, "vault record removed");
        }
        Ok(removed)
    }

    fn persist(&self, document: &VaultDocument) -> Result<()> {
        format::write_document(&self.path, document)?;
        debug!(path = %self.path.display(), users = document.len(), "vault persisted");
        Ok(())
    }
}

/// Resolve `path` to the key its write lock is registered under.
///
/// The parent directory is canonicalized when it exists, so `vault.json`,
/// `./vault.json` and the absolute path share one lock.
fn lock_key(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf()),
    }
}
