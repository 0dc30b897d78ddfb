//! The secure config file engine.
//!
//! A [`SecureFile`] holds one parsed document with plaintext at its secure
//! paths, plus the bookkeeping needed to re-encrypt only what changed.
//! Opening an encrypted file remembers, per secure path, both the original
//! envelope and the decrypted plaintext; at export time an unchanged value
//! re-emits its original envelope byte for byte, so files under version
//! control produce stable diffs.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::core::cipher::Cipher;
use crate::core::format::Format;
use crate::core::path::Path;
use crate::core::value::{Mapping, Value};
use crate::error::{PathError, Result};

/// One config file with encrypted-at-rest values.
pub struct SecureFile {
    /// The live document, plaintext at secure paths.
    values: Value,
    cipher: Box<dyn Cipher>,
    secure_paths: Vec<Path>,
    /// Envelope read from disk at open time, per secure path.
    last_encrypted: HashMap<Path, String>,
    /// Plaintext decrypted at open time, per secure path.
    old_values: HashMap<Path, String>,
}

impl fmt::Debug for SecureFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureFile")
            .field("values", &self.values)
            .field("secure_paths", &self.secure_paths)
            .field("last_encrypted", &self.last_encrypted)
            .field("old_values", &self.old_values)
            .finish_non_exhaustive()
    }
}

impl SecureFile {
    /// Build an engine from plaintext input.
    ///
    /// There is no prior ciphertext to remember, so the first [`export`]
    /// encrypts every secure path fresh.
    ///
    /// [`export`]: SecureFile::export
    pub fn from_plaintext(
        format: Format,
        input: &str,
        cipher: Box<dyn Cipher>,
        secure_paths: &[String],
    ) -> Result<SecureFile> {
        let values = format.parse(input)?;
        let secure_paths = parse_secure_paths(secure_paths)?;

        Ok(SecureFile {
            values,
            cipher,
            secure_paths,
            last_encrypted: HashMap::new(),
            old_values: HashMap::new(),
        })
    }

    /// Build an engine from encrypted input.
    ///
    /// Every secure path must resolve to a string in the input; its
    /// envelope is remembered and its plaintext decrypted into the live
    /// document. A missing path or a failed decryption aborts the open.
    pub fn open(
        format: Format,
        input: &str,
        cipher: Box<dyn Cipher>,
        secure_paths: &[String],
    ) -> Result<SecureFile> {
        let encrypted = format.parse(input)?;
        let secure_paths = parse_secure_paths(secure_paths)?;

        let mut last_encrypted = HashMap::with_capacity(secure_paths.len());
        for path in &secure_paths {
            let envelope = path.read_from(&encrypted)?;
            last_encrypted.insert(path.clone(), envelope.to_string());
        }

        let mut old_values = HashMap::with_capacity(secure_paths.len());
        let mut decrypt = |path: &Path, sealed: &str| -> Result<String> {
            let plaintext = cipher.decrypt(sealed)?;
            old_values.insert(path.clone(), plaintext.clone());
            Ok(plaintext)
        };
        let values = transform(&encrypted, &Path::root(), &secure_paths, &mut decrypt)?;

        debug!(paths = secure_paths.len(), "opened encrypted document");
        Ok(SecureFile {
            values,
            cipher,
            secure_paths,
            last_encrypted,
            old_values,
        })
    }

    /// Set a string value at a flat, dot-separated path.
    ///
    /// Missing intermediate maps are created; an existing non-map on the
    /// way is a type error. Index segments and quoted keys are not
    /// accepted here.
    pub fn set(&mut self, path: &str, value: &str) -> Result<()> {
        let keys = flat_keys(path)?;
        let (leaf, parents) = keys
            .split_last()
            .expect("flat_keys never returns an empty list");

        let mut current = match &mut self.values {
            Value::Map(map) => map,
            other => {
                return Err(PathError::TypeMismatch {
                    path: path.to_string(),
                    visited: ".".to_string(),
                    kind: other.kind(),
                }
                .into())
            }
        };

        let mut visited = Path::root();
        for key in parents {
            visited = visited.append_key(key);
            let entry = current
                .entry((*key).to_string())
                .or_insert_with(Value::empty_map);
            current = match entry {
                Value::Map(map) => map,
                other => {
                    return Err(PathError::TypeMismatch {
                        path: path.to_string(),
                        visited: visited.to_string(),
                        kind: other.kind(),
                    }
                    .into())
                }
            };
        }

        current.insert((*leaf).to_string(), Value::from(value));
        Ok(())
    }

    /// Replace the live document wholesale from re-parsed input.
    ///
    /// Used after an editor session, where keys may have been added,
    /// removed, or renamed. The change-detection tables survive, so a
    /// secret whose value did not change keeps its original envelope on
    /// the next export.
    pub fn update_from(&mut self, format: Format, input: &str) -> Result<()> {
        self.values = format.parse(input)?;
        Ok(())
    }

    /// Serialize with secure paths encrypted.
    ///
    /// A secure value equal to the one decrypted at open time re-emits the
    /// remembered envelope verbatim; anything else is encrypted fresh. Any
    /// encryption failure aborts the whole export.
    pub fn export(&self, format: Format) -> Result<String> {
        let cipher = &self.cipher;
        let old_values = &self.old_values;
        let last_encrypted = &self.last_encrypted;

        let sealed = transform(
            &self.values,
            &Path::root(),
            &self.secure_paths,
            &mut |path, plaintext| {
                if let (Some(old), Some(envelope)) =
                    (old_values.get(path), last_encrypted.get(path))
                {
                    if old == plaintext {
                        debug!(path = %path, "keeping envelope (unchanged)");
                        return Ok(envelope.clone());
                    }
                }
                debug!(path = %path, "encrypting value");
                cipher.encrypt(plaintext)
            },
        )?;

        Ok(format.serialize(&sealed)?)
    }

    /// Serialize with secure paths left in plaintext.
    ///
    /// This is the decrypt output and the editor's scratch buffer; the
    /// result must never be written back to the managed file.
    pub fn export_plaintext(&self, format: Format) -> Result<String> {
        let raw = transform(
            &self.values,
            &Path::root(),
            &self.secure_paths,
            &mut |_, plaintext| Ok(plaintext.to_string()),
        )?;

        Ok(format.serialize(&raw)?)
    }
}

fn parse_secure_paths(paths: &[String]) -> Result<Vec<Path>> {
    paths
        .iter()
        .map(|p| Ok(Path::parse(p)?))
        .collect::<Result<Vec<_>>>()
}

/// Recursively copy a document, rewriting string leaves at secure paths
/// through `map_secure`. Everything else is copied as-is.
fn transform(
    value: &Value,
    path: &Path,
    secure_paths: &[Path],
    map_secure: &mut dyn FnMut(&Path, &str) -> Result<String>,
) -> Result<Value> {
    match value {
        Value::Map(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, child) in map {
                let mapped = transform(child, &path.append_key(key), secure_paths, map_secure)?;
                out.insert(key.clone(), mapped);
            }
            Ok(Value::Map(out))
        }
        Value::Sequence(seq) => {
            let mut out = Vec::with_capacity(seq.len());
            for (i, element) in seq.iter().enumerate() {
                out.push(transform(
                    element,
                    &path.append_index(i),
                    secure_paths,
                    map_secure,
                )?);
            }
            Ok(Value::Sequence(out))
        }
        Value::String(s) => {
            if secure_paths.contains(path) {
                Ok(Value::String(map_secure(path, s)?))
            } else {
                trace!(path = %path, "copying value");
                Ok(value.clone())
            }
        }
        other => Ok(other.clone()),
    }
}

fn flat_keys(path: &str) -> Result<Vec<&str>> {
    let syntax = |reason: &str| PathError::Syntax {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if path.contains(['[', ']', '\'', '"']) {
        return Err(syntax("only flat dot-separated keys are allowed here").into());
    }
    let rest = path
        .strip_prefix('.')
        .ok_or_else(|| syntax("must start with '.'"))?;
    if rest.is_empty() {
        return Err(syntax("missing key").into());
    }

    let keys: Vec<&str> = rest.split('.').collect();
    if keys.iter().any(|k| k.is_empty()) {
        return Err(syntax("unexpected empty key").into());
    }
    Ok(keys)
}
