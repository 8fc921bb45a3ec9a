//! `credvault keygen` — print a fresh base64 encryption key.

use crate::cli::output;
use crate::crypto::EncryptionKey;
use crate::errors::Result;

/// Execute the `keygen` command.
pub fn execute() -> Result<()> {
    let key = EncryptionKey::generate();

    // Only the key goes to stdout so it can be captured directly.
    println!("{}", key.to_base64().as_str());

    output::tip("Store it somewhere safe and export it as CREDVAULT_KEY.");
    output::warning("Losing this key makes every stored credential unreadable.");
    Ok(())
}
