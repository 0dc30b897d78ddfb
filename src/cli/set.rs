//! Set command - write one encrypted value into a config file.

use std::fs;
use std::path::Path as FsPath;

use tracing::info;

use crate::cli::output;
use crate::core::cipher::SymmetricCipher;
use crate::core::file::SecureFile;
use crate::core::format::Format;
use crate::error::{Error, PathError, Result};

/// Set `key` to `value` in `input`, rewriting the file in place.
///
/// The target key is the only path treated as secure, so other encrypted
/// values pass through untouched. When the key does not resolve yet the
/// document is reopened as plaintext and the key is created.
pub fn execute(
    input: &FsPath,
    format: Option<Format>,
    key: &str,
    value: &str,
    unsafe_passphrase: Option<String>,
) -> Result<()> {
    let format = super::resolve_format(format, input)?;
    info!(format = %format, "setting {} in {}", key, input.display());

    let data = fs::read_to_string(input)?;
    let pass = super::passphrase::resolve(unsafe_passphrase)?;
    let paths = vec![key.to_string()];

    let cipher = Box::new(SymmetricCipher::new(pass.to_vec()));
    let mut file = match SecureFile::open(format, &data, cipher, &paths) {
        Ok(file) => file,
        Err(Error::Path(
            PathError::NotFound { .. } | PathError::IndexOutOfRange { .. },
        )) => {
            // New key: nothing to decrypt, the value encrypts on export.
            let cipher = Box::new(SymmetricCipher::new(pass.to_vec()));
            SecureFile::from_plaintext(format, &data, cipher, &paths)?
        }
        Err(e) => return Err(e),
    };

    file.set(key, value)?;
    fs::write(input, file.export(format)?)?;

    output::success(&format!("set {}", key));
    Ok(())
}
