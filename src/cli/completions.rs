//! Completions command - generate shell completion scripts.

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::error::Result;

/// Write a completion script for `shell` to stdout.
pub fn execute(shell: Shell) -> Result<()> {
    let mut cmd = super::Cli::command();
    generate(shell, &mut cmd, "sealenv", &mut std::io::stdout());
    Ok(())
}
