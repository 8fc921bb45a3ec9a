//! `credvault destroy` — delete the user's whole vault record.

use crate::cli::output;
use crate::cli::{confirm, open_service, prompt_master_password, Cli};
use crate::config::Settings;
use crate::errors::Result;

/// Execute the `destroy` command.
pub fn execute(cli: &Cli, settings: &Settings, force: bool) -> Result<()> {
    let user = cli.user_id();

    if !force
        && !confirm(&format!(
            "Delete ALL credentials and the master password for '{user}'?"
        ))?
    {
        output::info("Cancelled.");
        return Ok(());
    }

    let service = open_service(cli, settings)?;
    let password = prompt_master_password()?;

    if service.destroy_vault(&user, &password)? {
        output::success(&format!("Vault for '{user}' destroyed"));
    }

    Ok(())
}
