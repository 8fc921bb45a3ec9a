//! CLI module — Clap argument parser, output helpers, and command implementations.
//!
//! The CLI is a thin local front end over `VaultService`: it collects
//! input, calls exactly one service operation and renders the result.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::{CipherProvider, CredentialHasher};
use crate::errors::{Result, VaultError};
use crate::service::VaultService;
use crate::vault::{UserId, VaultStore};

/// Minimum master password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable consulted before prompting for the master password.
const MASTER_PASSWORD_ENV: &str = "CREDVAULT_MASTER_PASSWORD";

/// CredVault CLI: per-user encrypted credential vault.
#[derive(Parser)]
#[command(
    name = "credvault",
    about = "Per-user encrypted credential vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault owner (default: local)
    #[arg(short, long, env = "CREDVAULT_USER", default_value = "local", global = true)]
    pub user: String,

    /// Vault file (overrides `vault_path` from credvault.toml)
    #[arg(long, global = true)]
    pub vault: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate a new encryption key for CREDVAULT_KEY
    Keygen,

    /// Set (or replace) the master password
    Init,

    /// Check the master password
    Verify,

    /// Store a credential (add or overwrite)
    Store {
        /// Service name (e.g. GitHub)
        service: String,
        /// Secret value (omit for interactive prompt)
        value: Option<String>,
    },

    /// Show a credential
    Get {
        /// Service name
        service: String,
    },

    /// Replace an existing credential
    Update {
        /// Service name
        service: String,
        /// New secret value (omit for interactive prompt)
        value: Option<String>,
    },

    /// Delete a credential
    Delete {
        /// Service name
        service: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List stored service names
    List,

    /// Export all credentials in plaintext
    Export {
        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Delete the whole vault record, master password included
    Destroy {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

impl Cli {
    /// The vault owner selected on the command line.
    pub fn user_id(&self) -> UserId {
        UserId::from(self.user.as_str())
    }
}

/// Resolve the vault file path: `--vault` wins over the config file.
pub fn vault_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    match &cli.vault {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(settings.vault_path(&std::env::current_dir()?)),
    }
}

/// Build the `VaultService` from settings and the provisioned key.
pub fn open_service(cli: &Cli, settings: &Settings) -> Result<VaultService> {
    let key = settings.encryption_key()?;
    let hasher = CredentialHasher::new(&settings.argon2_params())?;
    let store = VaultStore::new(vault_path(cli, settings)?);

    Ok(VaultService::new(store, CipherProvider::new(&key), hasher))
}

/// Get the master password, trying in order:
/// 1. `CREDVAULT_MASTER_PASSWORD` env var (scripts/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_master_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(MASTER_PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used by `init`).
///
/// Also respects `CREDVAULT_MASTER_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
pub fn prompt_new_master_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(MASTER_PASSWORD_ENV) {
        if !pw.is_empty() {
            if pw.len() < MIN_PASSWORD_LEN {
                return Err(VaultError::CommandFailed(format!(
                    "master password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Master password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Read a secret value from one of three sources:
/// the inline argument, piped stdin, or a hidden prompt.
pub fn read_secret_value(service: &str, value: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(v) = value {
        output::warning("Value provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        return Ok(Zeroizing::new(strip_line_ending(&buf).to_string()));
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Enter secret for {service}"))
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Drop the single line ending `echo` or a file adds to piped input.
/// Any other trailing whitespace is part of the secret.
fn strip_line_ending(input: &str) -> &str {
    input
        .strip_suffix("\r\n")
        .or_else(|| input.strip_suffix('\n'))
        .unwrap_or(input)
}

/// Ask for a yes/no confirmation, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}
