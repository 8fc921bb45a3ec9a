//! Cryptographic primitives for CredVault.
//!
//! This module provides:
//! - The process-wide AES-256 encryption key (`key`)
//! - AES-256-GCM encryption of stored credentials (`cipher`)
//! - Argon2id master-password hashing and verification (`hasher`)

pub mod cipher;
pub mod hasher;
pub mod key;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{CipherProvider, CredentialHasher, ...};
pub use cipher::CipherProvider;
pub use hasher::{Argon2Params, CredentialHasher};
pub use key::EncryptionKey;
