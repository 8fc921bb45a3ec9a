//! The on-disk vault document and its crash-safe write protocol.
//!
//! The whole vault is a single pretty-printed JSON object keyed by user id:
//!
//! ```text
//! { "<user id>": { "master_pass": "<phc hash>", "<service>": "<ciphertext>", ... }, ... }
//! ```
//!
//! Writes never touch the live file directly.  The new document goes to a
//! temp file in the same directory, is flushed to disk, and then renamed
//! over the target, so a crash leaves either the old or the new document.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use super::record::{UserId, VaultRecord};
use crate::errors::{Result, VaultError};

/// The full persisted mapping of user id -> record.
pub type VaultDocument = BTreeMap<UserId, VaultRecord>;

/// Read and parse the vault document.
///
/// Returns `Ok(None)` when the file does not exist yet (first run).  A file
/// that exists but cannot be parsed is a `CorruptStore` error, never an
/// empty vault.
pub fn read_document(path: &Path) -> Result<Option<VaultDocument>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let document = serde_json::from_slice(&data).map_err(|e| VaultError::CorruptStore {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(Some(document))
}

/// Write the vault document to disk **atomically**.
///
/// 1. Serialize the document to JSON.
/// 2. Write it to a uniquely named, owner-only temp file next to the
///    target and `fsync` it.
/// 3. Rename the temp file over the target path.
/// 4. On Unix, `fsync` the directory so the rename itself is durable.
///
/// Concurrent writers never share a temp file, so the last rename wins
/// and no writer fails.  If any step fails the temp file is removed.
pub fn write_document(path: &Path, document: &VaultDocument) -> Result<()> {
    let buf = serde_json::to_vec_pretty(document)
        .map_err(|e| VaultError::SerializationError(format!("vault document: {e}")))?;

    let parent = parent_dir(path);
    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let mut tmp = tempfile::Builder::new()
        .prefix(&temp_prefix(path))
        .suffix(".tmp")
        .tempfile_in(parent)?;
    tmp.write_all(&buf)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    sync_dir(parent)?;
    Ok(())
}

/// File-name prefix of the temp files used while writing `path`.
///
/// They live in the same directory so the final rename stays on one
/// filesystem, and are hidden (`.vault.json.XXXXXX.tmp`).
pub fn temp_prefix(path: &Path) -> String {
    format!(
        ".{}.",
        path.file_name().unwrap_or_default().to_string_lossy()
    )
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    fs::File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
