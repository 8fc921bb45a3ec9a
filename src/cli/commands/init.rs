//! `credvault init` — set or replace the master password.

use crate::cli::output;
use crate::cli::{open_service, prompt_master_password, prompt_new_master_password, Cli};
use crate::config::Settings;
use crate::errors::{Result, VaultError};

/// Execute the `init` command.
pub fn execute(cli: &Cli, settings: &Settings) -> Result<()> {
    let service = open_service(cli, settings)?;
    let user = cli.user_id();

    // Replacing an existing master password requires knowing the current one.
    let replacing = service.is_initialized(&user)?;
    if replacing {
        output::info("A master password is already set — enter it to replace it.");
        let current = prompt_master_password()?;
        if !service.verify_master_password(&user, &current)? {
            return Err(VaultError::AuthenticationFailed);
        }
    }

    let password = prompt_new_master_password()?;
    service.set_master_password(&user, &password)?;

    if replacing {
        output::success(&format!(
            "Master password replaced for '{user}' (stored credentials kept)"
        ));
    } else {
        output::success(&format!("Master password set for '{user}'"));
        output::tip("Run `credvault store <SERVICE>` to add a credential.");
    }

    Ok(())
}
