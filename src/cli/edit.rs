//! Edit command - open the plaintext in an editor, re-encrypt on save.

use std::fs;
use std::io::Write;
use std::path::Path as FsPath;
use std::process::Command;

use tracing::{debug, info};

use crate::cli::output;
use crate::core::file::SecureFile;
use crate::core::format::Format;
use crate::error::{Error, Result};

/// Edit `input` in place through a plaintext scratch file.
///
/// The scratch file lives in the system temp directory and is removed on
/// every exit path, including errors, when the handle drops.
pub fn execute(
    input: &FsPath,
    format: Option<Format>,
    keys: &[String],
    editor: &str,
    unsafe_passphrase: Option<String>,
) -> Result<()> {
    let format = super::resolve_format(format, input)?;
    info!(format = %format, "editing {}", input.display());

    let data = fs::read_to_string(input)?;
    let cipher = super::cipher(unsafe_passphrase)?;
    let mut file = SecureFile::open(format, &data, cipher, keys)?;

    let mut scratch = tempfile::Builder::new()
        .prefix("sealenv-")
        .suffix(scratch_suffix(format))
        .tempfile()?;
    scratch.write_all(file.export_plaintext(format)?.as_bytes())?;
    scratch.flush()?;
    debug!("scratch file at {}", scratch.path().display());

    let status = Command::new("/bin/sh")
        .arg("-c")
        .arg(format!("{} {}", editor, scratch.path().display()))
        .status()?;
    if !status.success() {
        return Err(Error::Other(format!("editor exited with {}", status)));
    }

    let edited = fs::read_to_string(scratch.path())?;
    file.update_from(format, &edited)?;
    fs::write(input, file.export(format)?)?;

    output::success(&format!("updated {}", input.display()));
    Ok(())
}

/// Suffix for the scratch file, so editors pick the right syntax mode.
fn scratch_suffix(format: Format) -> &'static str {
    match format {
        Format::Yaml => ".yaml",
        Format::Json => ".json",
        Format::Dotenv => ".env",
    }
}
