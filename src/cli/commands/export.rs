//! `credvault export` — export every credential in plaintext.
//!
//! Supported formats:
//! - `text` (default): one `service: secret` line per credential
//! - `json`: JSON object { "service": "secret", ... }

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_service, prompt_master_password, vault_path, Cli};
use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::service::ExportedCredential;

/// Execute the `export` command.
pub fn execute(
    cli: &Cli,
    settings: &Settings,
    format: &str,
    output_path: Option<&str>,
) -> Result<()> {
    // Validate the format before asking for anything.
    if !matches!(format, "text" | "json") {
        return Err(VaultError::CommandFailed(format!(
            "unknown export format '{format}' — use 'text' or 'json'"
        )));
    }

    let service = open_service(cli, settings)?;
    let password = prompt_master_password()?;
    let entries = service.export_all(&cli.user_id(), &password)?;

    if entries.is_empty() {
        output::info("No credentials to export.");
        return Ok(());
    }

    let content = match format {
        "json" => format_as_json(&entries)?,
        _ => format_as_text(&entries),
    };

    match output_path {
        Some(dest) => {
            let dest_path = Path::new(dest);

            // Safety: refuse to overwrite the vault itself.
            let cwd = std::env::current_dir()?;
            if cwd.join(dest_path) == cwd.join(vault_path(cli, settings)?) {
                return Err(VaultError::CommandFailed(
                    "refusing to export over the vault file".into(),
                ));
            }

            write_private(dest_path, &content)?;
            output::success(&format!(
                "Exported {} credential(s) to {dest} (format: {format})",
                entries.len()
            ));
            output::warning("The export file contains plaintext secrets — delete it when done.");
        }
        None => {
            // Write to stdout (no success message, just raw output).
            print!("{}", content.as_str());
        }
    }

    Ok(())
}

/// Format credentials as `service: secret` lines.
fn format_as_text(entries: &[ExportedCredential]) -> Zeroizing<String> {
    use std::fmt::Write;
    let mut out = Zeroizing::new(String::new());
    for (service, secret) in entries {
        let _ = writeln!(out, "{service}: {}", secret.as_str());
    }
    out
}

/// Format credentials as a JSON object.
fn format_as_json(entries: &[ExportedCredential]) -> Result<Zeroizing<String>> {
    let map: BTreeMap<&str, &str> = entries
        .iter()
        .map(|(service, secret)| (service.as_str(), secret.as_str()))
        .collect();

    serde_json::to_string_pretty(&map)
        .map(|json| Zeroizing::new(json + "\n"))
        .map_err(|e| VaultError::SerializationError(format!("JSON export: {e}")))
}

/// Write `content` to `path`, owner-only on Unix.
///
/// The file is created with mode 0600 so the plaintext is never readable
/// by other users, and an existing file is narrowed before it is written.
fn write_private(path: &Path, content: &str) -> Result<()> {
    let write_err = |e: std::io::Error| {
        VaultError::CommandFailed(format!("failed to write export file: {e}"))
    };

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| {
                VaultError::CommandFailed(format!("failed to set export file permissions: {e}"))
            })?;
    }

    file.write_all(content.as_bytes()).map_err(write_err)?;
    Ok(())
}
