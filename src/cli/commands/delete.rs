//! `credvault delete` — remove a credential.

use crate::cli::output;
use crate::cli::{confirm, open_service, prompt_master_password, Cli};
use crate::config::Settings;
use crate::errors::Result;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, settings: &Settings, name: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Delete credential '{name}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let service = open_service(cli, settings)?;
    let password = prompt_master_password()?;

    if service.delete_credential(&cli.user_id(), &password, name)? {
        output::success(&format!("Deleted credential for '{name}'"));
    } else {
        output::warning(&format!("No credential to delete for '{name}'"));
    }

    Ok(())
}
