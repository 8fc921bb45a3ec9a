//! `credvault get` — decrypt and print a single credential.

use crate::cli::{open_service, prompt_master_password, Cli};
use crate::config::Settings;
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(cli: &Cli, settings: &Settings, name: &str) -> Result<()> {
    let service = open_service(cli, settings)?;
    let password = prompt_master_password()?;

    let secret = service.get_credential(&cli.user_id(), &password, name)?;
    println!("{}", secret.as_str());

    Ok(())
}
