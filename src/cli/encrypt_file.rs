//! Encrypt-file command - seal an entire file into one envelope.

use std::fs;
use std::path::Path as FsPath;

use tracing::info;

use crate::cli::output;
use crate::error::Result;

/// Encrypt the whole of `input` as a single value.
pub fn execute(input: &FsPath, out: &FsPath, unsafe_passphrase: Option<String>) -> Result<()> {
    info!("encrypting whole file {}", input.display());

    let data = fs::read_to_string(input)?;
    let cipher = super::cipher(unsafe_passphrase)?;
    let sealed = cipher.encrypt(&data)?;

    super::write_output(out, input, &sealed)?;
    if out != FsPath::new("-") {
        output::success(&format!("encrypted {}", out.display()));
    }
    Ok(())
}
