//! `credvault update` — replace an existing credential.

use crate::cli::output;
use crate::cli::{open_service, prompt_master_password, read_secret_value, Cli};
use crate::config::Settings;
use crate::errors::{Result, VaultError};

/// Execute the `update` command.
pub fn execute(cli: &Cli, settings: &Settings, name: &str, value: Option<&str>) -> Result<()> {
    let service = open_service(cli, settings)?;
    let user = cli.user_id();
    let password = prompt_master_password()?;

    // Check the password and the service before asking for the new secret.
    if !service.verify_master_password(&user, &password)? {
        return Err(VaultError::AuthenticationFailed);
    }
    if !service.list_services(&user)?.iter().any(|s| s == name) {
        return Err(VaultError::CredentialNotFound(name.to_string()));
    }

    let secret = read_secret_value(name, value)?;
    service.update_credential(&user, &password, name, &secret)?;

    output::success(&format!("Updated credential for '{name}'"));
    Ok(())
}
