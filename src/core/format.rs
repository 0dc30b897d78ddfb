//! Config file formats and detection.

use std::fmt;
use std::path::Path as FsPath;
use std::str::FromStr;

use crate::core::value::Value;
use crate::core::{dotenv, json, yaml};
use crate::error::DocumentError;

/// A supported config file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Dotenv,
}

impl Format {
    /// Detect the format from a file name.
    ///
    /// Leading-dot file names (`.env`, `.env.production`) are dotenv;
    /// otherwise the lowercased extension decides.
    pub fn detect(path: &FsPath) -> Result<Format, DocumentError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DocumentError::UnsupportedFormat(path.display().to_string()))?;

        if name.starts_with('.') {
            return Ok(Format::Dotenv);
        }

        let extension = FsPath::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| DocumentError::UnsupportedFormat(name.to_string()))?;
        extension.to_ascii_lowercase().parse()
    }

    /// Parse input into a document tree.
    ///
    /// Empty input parses to an empty map for every format, so a document
    /// can be grown from a nonexistent or blank file.
    pub fn parse(&self, input: &str) -> Result<Value, DocumentError> {
        if input.trim().is_empty() {
            return Ok(Value::empty_map());
        }
        match self {
            Format::Yaml => yaml::parse(input),
            Format::Json => json::parse(input),
            Format::Dotenv => dotenv::parse(input),
        }
    }

    /// Serialize a document tree back to text.
    pub fn serialize(&self, value: &Value) -> Result<String, DocumentError> {
        match self {
            Format::Yaml => yaml::serialize(value),
            Format::Json => json::serialize(value),
            Format::Dotenv => dotenv::serialize(value),
        }
    }
}

impl FromStr for Format {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Format, DocumentError> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            "dotenv" | "env" | ".env" => Ok(Format::Dotenv),
            other => Err(DocumentError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Yaml => write!(f, "yaml"),
            Format::Json => write!(f, "json"),
            Format::Dotenv => write!(f, "dotenv"),
        }
    }
}
