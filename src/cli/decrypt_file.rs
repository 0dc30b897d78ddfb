//! Decrypt-file command - inverse of encrypt-file.

use std::fs;
use std::path::Path as FsPath;

use tracing::info;

use crate::cli::output;
use crate::error::Result;

/// Decrypt a whole-file envelope; stdout unless `out` is given.
pub fn execute(
    input: &FsPath,
    out: Option<&FsPath>,
    unsafe_passphrase: Option<String>,
) -> Result<()> {
    info!("decrypting whole file {}", input.display());

    let data = fs::read_to_string(input)?;
    let cipher = super::cipher(unsafe_passphrase)?;
    let plaintext = cipher.decrypt(data.trim())?;

    match out {
        Some(path) => {
            fs::write(path, &plaintext)?;
            output::warn(&format!(
                "plaintext written to {} - do not commit it",
                path.display()
            ));
        }
        None => print!("{}", plaintext),
    }
    Ok(())
}
