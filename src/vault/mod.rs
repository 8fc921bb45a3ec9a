//! Vault module — persisted per-user credential storage.
//!
//! This module provides:
//! - `UserId` and `VaultRecord` types (`record`)
//! - JSON vault document with crash-safe writes (`format`)
//! - `VaultStore` for serialized read-modify-write access (`store`)

pub mod format;
pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use format::VaultDocument;
pub use record::{validate_service_name, UserId, VaultRecord, MASTER_PASS_KEY};
pub use store::VaultStore;
