//! Selective encryption for structured config files
//!
//! Sealenv encrypts chosen leaf values inside YAML, JSON, and dotenv files
//! while leaving the rest of the document human-readable. Values are
//! addressed with JSON-path-like selectors, sealed with a passphrase-derived
//! cipher, and re-encrypted only when they actually change, so encrypted
//! files produce stable diffs under version control.
//!
//! # Quick start
//!
//! ```no_run
//! use sealenv::{Format, SecureFile, SymmetricCipher};
//!
//! let cipher = Box::new(SymmetricCipher::new("hunter2"));
//! let paths = vec![".database.password".to_string()];
//!
//! let file = SecureFile::from_plaintext(
//!     Format::Yaml,
//!     "database:\n  password: hunter2\n  host: localhost\n",
//!     cipher,
//!     &paths,
//! )?;
//! let sealed = file.export(Format::Yaml)?;
//! # Ok::<(), sealenv::error::Error>(())
//! ```
//!
//! # Architecture
//!
//! - **`core`**: the engine: [`SecureFile`], the [`Value`] document model
//!   with insertion-ordered maps, [`Path`] selectors, and the [`Cipher`]
//!   seam with the passphrase-based [`SymmetricCipher`]
//! - **`cli`**: the `sealenv` command-line interface
//!
//! Key ordering survives a full parse/serialize round trip in every format;
//! dotenv comments are the one thing lost. The walk over a document is
//! synchronous and single-threaded, and an error at any node aborts the
//! whole operation with nothing written.

pub mod cli;
pub mod core;
pub mod error;

// Re-export the public API
pub use crate::core::cipher::{Cipher, SymmetricCipher};
pub use crate::core::file::SecureFile;
pub use crate::core::format::Format;
pub use crate::core::path::{Path, Segment};
pub use crate::core::value::Value;
pub use crate::error::{Error, Result};
