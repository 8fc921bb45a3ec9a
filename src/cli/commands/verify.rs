//! `credvault verify` — check the master password without touching credentials.

use crate::cli::output;
use crate::cli::{open_service, prompt_master_password, Cli};
use crate::config::Settings;
use crate::errors::{Result, VaultError};

/// Execute the `verify` command.
pub fn execute(cli: &Cli, settings: &Settings) -> Result<()> {
    let service = open_service(cli, settings)?;
    let password = prompt_master_password()?;

    if !service.verify_master_password(&cli.user_id(), &password)? {
        return Err(VaultError::AuthenticationFailed);
    }

    output::success("Master password is correct.");
    Ok(())
}
