//! Error types for sealenv.
//!
//! Errors are grouped by subsystem; every failure a caller may want to
//! distinguish gets its own variant.

use thiserror::Error;

/// Document parsing and serialization errors.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("unrecognized config file format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[source] serde_yaml::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("failed to serialize document: {0}")]
    Serialize(String),

    #[error("unexpected syntax on line {line}: '{content}'")]
    DotenvSyntax { line: usize, content: String },

    #[error("invalid key on line {line}: {key}")]
    DotenvKey { line: usize, key: String },

    #[error("dotenv files only support flat string values, found {kind} at {key}")]
    DotenvValue { key: String, kind: &'static str },

    #[error("unexpected non-string key at {path}")]
    InvalidKey { path: String },

    #[error("unsupported {kind} value at {path}")]
    UnsupportedType { path: String, kind: String },
}

/// Path parsing and traversal errors.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("invalid path '{path}': {reason}")]
    Syntax { path: String, reason: String },

    #[error("could not find key {key} in {visited} (while reading {path})")]
    NotFound {
        path: String,
        visited: String,
        key: String,
    },

    #[error("index in path is out of range: {path} ({visited} has length {len})")]
    IndexOutOfRange {
        path: String,
        visited: String,
        len: usize,
    },

    #[error("cannot read {kind} at {visited} (while reading {path})")]
    TypeMismatch {
        path: String,
        visited: String,
        kind: &'static str,
    },

    #[error("expected a string at {path}, found {kind}")]
    NotAString { path: String, kind: &'static str },
}

/// Cryptographic operation errors.
///
/// The decrypt path only ever reports `Corrupt` or `Authentication`, so a
/// caller learns nothing about which internal check failed.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("corrupt ciphertext")]
    Corrupt,

    #[error("failed to decrypt value")]
    Authentication,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("system rng failure: {0}")]
    Rng(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
}

/// Top-level sealenv error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for sealenv operations.
pub type Result<T> = std::result::Result<T, Error>;
