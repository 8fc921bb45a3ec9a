//! `credvault list` — show stored service names (no secrets).

use crate::cli::output;
use crate::cli::{open_service, Cli};
use crate::config::Settings;
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, settings: &Settings) -> Result<()> {
    let service = open_service(cli, settings)?;
    let services = service.list_services(&cli.user_id())?;

    output::info(&format!("{} credential(s) for '{}'", services.len(), cli.user));
    output::print_services_table(&services);

    Ok(())
}
