//! Command-line interface.

pub mod completions;
pub mod decrypt;
pub mod decrypt_file;
pub mod edit;
pub mod encrypt;
pub mod encrypt_file;
pub mod output;
pub mod passphrase;
pub mod set;

use std::path::{Path as FsPath, PathBuf};

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::core::cipher::{Cipher, SymmetricCipher};
use crate::core::format::Format;
use crate::error::Result;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default())
    .valid(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .invalid(AnsiColor::Red.on_default().effects(Effects::BOLD))
    .error(AnsiColor::Red.on_default().effects(Effects::BOLD));

/// Sealenv - encrypt secrets inside config files.
#[derive(Parser)]
#[command(
    name = "sealenv",
    about = "Encrypt secrets inside YAML, JSON, and dotenv config files",
    version,
    styles = STYLES
)]
pub struct Cli {
    /// Enable verbose logging output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Encrypt values in a config file
    Encrypt {
        /// Path to the input file
        #[arg(long = "in", value_name = "PATH")]
        input: PathBuf,
        /// Path to the output file (use - for stdout)
        #[arg(long = "out", value_name = "PATH")]
        out: PathBuf,
        /// Key path of a secure value (repeatable)
        #[arg(long = "key", value_name = "KEYPATH", required = true)]
        keys: Vec<String>,
        /// File format (yaml, json, dotenv); detected from the file name by default
        #[arg(long)]
        format: Option<Format>,
        /// Unsafely pass the passphrase on the command line
        #[arg(long, value_name = "PASS")]
        unsafe_passphrase: Option<String>,
    },

    /// Decrypt values from a config file
    Decrypt {
        /// Path to the input file
        #[arg(long = "in", value_name = "PATH")]
        input: PathBuf,
        /// Write plaintext to this file instead of stdout
        #[arg(long = "out", value_name = "PATH")]
        out: Option<PathBuf>,
        /// Key path of a secure value (repeatable)
        #[arg(long = "key", value_name = "KEYPATH", required = true)]
        keys: Vec<String>,
        /// File format (yaml, json, dotenv); detected from the file name by default
        #[arg(long)]
        format: Option<Format>,
        /// Unsafely pass the passphrase on the command line
        #[arg(long, value_name = "PASS")]
        unsafe_passphrase: Option<String>,
    },

    /// Edit an encrypted file in your editor, re-encrypting on save
    Edit {
        /// Path to the file to edit in place
        #[arg(long = "in", value_name = "PATH")]
        input: PathBuf,
        /// Key path of a secure value (repeatable)
        #[arg(long = "key", value_name = "KEYPATH", required = true)]
        keys: Vec<String>,
        /// File format (yaml, json, dotenv); detected from the file name by default
        #[arg(long)]
        format: Option<Format>,
        /// Text editor to open for the scratch file
        #[arg(long, env = "EDITOR", default_value = "vi")]
        editor: String,
        /// Unsafely pass the passphrase on the command line
        #[arg(long, value_name = "PASS")]
        unsafe_passphrase: Option<String>,
    },

    /// Set one encrypted value in a config file
    Set {
        /// Path to the file to rewrite in place
        #[arg(long = "in", value_name = "PATH")]
        input: PathBuf,
        /// Flat dot-separated key path (e.g. .database.password)
        #[arg(long = "key", value_name = "KEYPATH")]
        key: String,
        /// Value to store at the key path
        #[arg(long = "value", value_name = "VALUE")]
        value: String,
        /// File format (yaml, json, dotenv); detected from the file name by default
        #[arg(long)]
        format: Option<Format>,
        /// Unsafely pass the passphrase on the command line
        #[arg(long, value_name = "PASS")]
        unsafe_passphrase: Option<String>,
    },

    /// Encrypt an entire file into a single envelope
    EncryptFile {
        /// Path to the input file
        #[arg(long = "in", value_name = "PATH")]
        input: PathBuf,
        /// Path to the output file (use - for stdout)
        #[arg(long = "out", value_name = "PATH")]
        out: PathBuf,
        /// Unsafely pass the passphrase on the command line
        #[arg(long, value_name = "PASS")]
        unsafe_passphrase: Option<String>,
    },

    /// Decrypt a file encrypted with encrypt-file
    DecryptFile {
        /// Path to the input file
        #[arg(long = "in", value_name = "PATH")]
        input: PathBuf,
        /// Write plaintext to this file instead of stdout
        #[arg(long = "out", value_name = "PATH")]
        out: Option<PathBuf>,
        /// Unsafely pass the passphrase on the command line
        #[arg(long, value_name = "PASS")]
        unsafe_passphrase: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Execute a parsed CLI invocation.
pub fn execute(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    match cli.command {
        Command::Encrypt {
            input,
            out,
            keys,
            format,
            unsafe_passphrase,
        } => encrypt::execute(&input, &out, format, &keys, unsafe_passphrase),
        Command::Decrypt {
            input,
            out,
            keys,
            format,
            unsafe_passphrase,
        } => decrypt::execute(&input, out.as_deref(), format, &keys, unsafe_passphrase),
        Command::Edit {
            input,
            keys,
            format,
            editor,
            unsafe_passphrase,
        } => edit::execute(&input, format, &keys, &editor, unsafe_passphrase),
        Command::Set {
            input,
            key,
            value,
            format,
            unsafe_passphrase,
        } => set::execute(&input, format, &key, &value, unsafe_passphrase),
        Command::EncryptFile {
            input,
            out,
            unsafe_passphrase,
        } => encrypt_file::execute(&input, &out, unsafe_passphrase),
        Command::DecryptFile {
            input,
            out,
            unsafe_passphrase,
        } => decrypt_file::execute(&input, out.as_deref(), unsafe_passphrase),
        Command::Completions { shell } => completions::execute(shell),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "sealenv=debug" } else { "sealenv=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Build the symmetric cipher from the resolved passphrase.
pub(crate) fn cipher(unsafe_passphrase: Option<String>) -> Result<Box<dyn Cipher>> {
    let pass = passphrase::resolve(unsafe_passphrase)?;
    Ok(Box::new(SymmetricCipher::new(pass.to_vec())))
}

/// Pick the file format: explicit flag first, file name otherwise.
pub(crate) fn resolve_format(flag: Option<Format>, path: &FsPath) -> Result<Format> {
    match flag {
        Some(format) => Ok(format),
        None => Ok(Format::detect(path)?),
    }
}

/// Write command output: `-` means stdout, writing back over the input is
/// allowed, and any other existing file is refused.
pub(crate) fn write_output(out: &FsPath, input: &FsPath, contents: &str) -> Result<()> {
    use std::io::Write;

    if out == FsPath::new("-") {
        print!("{}", contents);
        return Ok(());
    }

    if out == input {
        std::fs::write(out, contents)?;
    } else {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(out)?;
        file.write_all(contents.as_bytes())?;
    }
    Ok(())
}
