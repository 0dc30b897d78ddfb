//! Decrypt command - print or write a config file with secrets in the clear.

use std::fs;
use std::path::Path as FsPath;

use tracing::info;

use crate::cli::output;
use crate::core::file::SecureFile;
use crate::core::format::Format;
use crate::error::Result;

/// Decrypt the secure values of `input`; stdout unless `out` is given.
pub fn execute(
    input: &FsPath,
    out: Option<&FsPath>,
    format: Option<Format>,
    keys: &[String],
    unsafe_passphrase: Option<String>,
) -> Result<()> {
    let format = super::resolve_format(format, input)?;
    info!(format = %format, "decrypting {}", input.display());

    let data = fs::read_to_string(input)?;
    let cipher = super::cipher(unsafe_passphrase)?;

    let file = SecureFile::open(format, &data, cipher, keys)?;
    let plaintext = file.export_plaintext(format)?;

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
