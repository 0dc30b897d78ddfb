//! Encrypt command - seal secure values in a config file.

use std::fs;
use std::path::Path as FsPath;

use tracing::info;

use crate::cli::output;
use crate::core::file::SecureFile;
use crate::core::format::Format;
use crate::error::Result;

/// Encrypt the secure values of `input` and write the result to `out`.
pub fn execute(
    input: &FsPath,
    out: &FsPath,
    format: Option<Format>,
    keys: &[String],
    unsafe_passphrase: Option<String>,
) -> Result<()> {
    let format = super::resolve_format(format, input)?;
    info!(format = %format, "encrypting {}", input.display());

    let data = fs::read_to_string(input)?;
    let cipher = super::cipher(unsafe_passphrase)?;

    let file = SecureFile::from_plaintext(format, &data, cipher, keys)?;
    let sealed = file.export(format)?;

    super::write_output(out, input, &sealed)?;
    if out != FsPath::new("-") {
        output::success(&format!(
            "encrypted {} value(s) into {}",
            keys.len(),
            out.display()
        ));
    }
    Ok(())
}
