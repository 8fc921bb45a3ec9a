//! `credvault store` — add or overwrite a credential.

use crate::cli::output;
use crate::cli::{open_service, read_secret_value, Cli};
use crate::config::Settings;
use crate::errors::Result;

/// Execute the `store` command.
pub fn execute(cli: &Cli, settings: &Settings, name: &str, value: Option<&str>) -> Result<()> {
    let service = open_service(cli, settings)?;
    let user = cli.user_id();

    // Fail before asking for the secret if the vault is not set up.
    service.list_services(&user)?;

    let secret = read_secret_value(name, value)?;
    service.store_credential(&user, name, &secret)?;

    output::success(&format!("Stored credential for '{name}'"));
    Ok(())
}
