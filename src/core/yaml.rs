//! YAML codec.
//!
//! `serde_yaml`'s `Mapping` iterates in insertion order, so converting its
//! value tree into ours keeps the original key order end to end. Null keys
//! are dropped silently, matching upstream YAML behavior; any other
//! non-string key is an error.

use serde_yaml::Value as Yaml;

use crate::core::path::Path;
use crate::core::value::{Mapping, Value};
use crate::error::DocumentError;

pub fn parse(input: &str) -> Result<Value, DocumentError> {
    let doc: Yaml = serde_yaml::from_str(input).map_err(DocumentError::Yaml)?;
    match convert(doc, &Path::root())? {
        // An empty document reads as null; treat it as an empty map so
        // callers can grow a document from nothing.
        Value::Null => Ok(Value::empty_map()),
        value => Ok(value),
    }
}

pub fn serialize(value: &Value) -> Result<String, DocumentError> {
    serde_yaml::to_string(&to_yaml(value)?)
        .map_err(|e| DocumentError::Serialize(e.to_string()))
}

fn convert(node: Yaml, path: &Path) -> Result<Value, DocumentError> {
    match node {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(b)),
        Yaml::Number(n) => convert_number(&n, path),
        Yaml::String(s) => Ok(Value::String(s)),
        Yaml::Sequence(seq) => {
            let mut out = Vec::with_capacity(seq.len());
            for (i, element) in seq.into_iter().enumerate() {
                out.push(convert(element, &path.append_index(i))?);
            }
            Ok(Value::Sequence(out))
        }
        Yaml::Mapping(mapping) => {
            let mut map = Mapping::with_capacity(mapping.len());
            for (key, val) in mapping {
                match key {
                    Yaml::Null => continue,
                    Yaml::String(key) => {
                        let converted = convert(val, &path.append_key(&key))?;
                        map.insert(key, converted);
                    }
                    _ => {
                        return Err(DocumentError::InvalidKey {
                            path: path.to_string(),
                        })
                    }
                }
            }
            Ok(Value::Map(map))
        }
        Yaml::Tagged(tagged) => Err(DocumentError::UnsupportedType {
            path: path.to_string(),
            kind: format!("tagged ({})", tagged.tag),
        }),
    }
}

fn convert_number(n: &serde_yaml::Number, path: &Path) -> Result<Value, DocumentError> {
    if let Some(i) = n.as_i64() {
        Ok(Value::Integer(i))
    } else if n.as_u64().is_some() {
        Err(DocumentError::UnsupportedType {
            path: path.to_string(),
            kind: "out-of-range integer".to_string(),
        })
    } else if let Some(f) = n.as_f64() {
        Ok(Value::Float(f))
    } else {
        Err(DocumentError::UnsupportedType {
            path: path.to_string(),
            kind: "number".to_string(),
        })
    }
}

fn to_yaml(value: &Value) -> Result<Yaml, DocumentError> {
    Ok(match value {
        Value::Null => Yaml::Null,
        Value::Bool(b) => Yaml::Bool(*b),
        Value::Integer(i) => Yaml::Number((*i).into()),
        Value::Float(f) => Yaml::Number((*f).into()),
        Value::String(s) => Yaml::String(s.clone()),
        Value::Sequence(seq) => {
            Yaml::Sequence(seq.iter().map(to_yaml).collect::<Result<_, _>>()?)
        }
        Value::Map(map) => {
            let mut out = serde_yaml::Mapping::with_capacity(map.len());
            for (key, val) in map {
                out.insert(Yaml::String(key.clone()), to_yaml(val)?);
            }
            Yaml::Mapping(out)
        }
    })
}
