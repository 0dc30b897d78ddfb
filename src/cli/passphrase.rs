//! Passphrase resolution.
//!
//! Sources, in priority order: the `--unsafe-passphrase` flag, the
//! `PASSPHRASE` env var, the `SEALENV_PASSPHRASE` env var, then an
//! interactive hidden prompt when stdin is a terminal.

use std::io::IsTerminal;

use dialoguer::Password;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

const ENV_VAR: &str = "PASSPHRASE";
const LEGACY_ENV_VAR: &str = "SEALENV_PASSPHRASE";

/// Resolve the passphrase, prompting as a last resort.
pub fn resolve(flag: Option<String>) -> Result<Zeroizing<Vec<u8>>> {
    if let Some(pass) = flag {
        if !pass.is_empty() {
            return Ok(Zeroizing::new(pass.into_bytes()));
        }
    }

    for var in [ENV_VAR, LEGACY_ENV_VAR] {
        if let Ok(pass) = std::env::var(var) {
            if !pass.is_empty() {
                return Ok(Zeroizing::new(pass.into_bytes()));
            }
        }
    }

    if !std::io::stdin().is_terminal() {
        return Err(Error::Other(
            "no passphrase provided (use --unsafe-passphrase or the PASSPHRASE env var)"
                .to_string(),
        ));
    }

    let pass = Password::new().with_prompt("Passphrase").interact()?;
    Ok(Zeroizing::new(pass.into_bytes()))
}
