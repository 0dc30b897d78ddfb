//! JSON codec.
//!
//! Built on `serde_json` with the `preserve_order` feature, so object keys
//! come back in document order. Export is pretty-printed with a tab indent.

use serde::Serialize;
use serde_json::Value as Json;

use crate::core::path::Path;
use crate::core::value::{Mapping, Value};
use crate::error::DocumentError;

pub fn parse(input: &str) -> Result<Value, DocumentError> {
    let doc: Json = serde_json::from_str(input).map_err(DocumentError::Json)?;
    convert(doc, &Path::root())
}

pub fn serialize(value: &Value) -> Result<String, DocumentError> {
    let doc = to_json(value)?;
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)
        .map_err(|e| DocumentError::Serialize(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| DocumentError::Serialize(e.to_string()))
}

fn convert(node: Json, path: &Path) -> Result<Value, DocumentError> {
    match node {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(b)),
        Json::Number(n) => {
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
        Json::String(s) => Ok(Value::String(s)),
        Json::Array(seq) => {
            let mut out = Vec::with_capacity(seq.len());
            for (i, element) in seq.into_iter().enumerate() {
                out.push(convert(element, &path.append_index(i))?);
            }
            Ok(Value::Sequence(out))
        }
        Json::Object(object) => {
            let mut map = Mapping::with_capacity(object.len());
            for (key, val) in object {
                let converted = convert(val, &path.append_key(&key))?;
                map.insert(key, converted);
            }
            Ok(Value::Map(map))
        }
    }
}

fn to_json(value: &Value) -> Result<Json, DocumentError> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Integer(i) => Json::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .ok_or_else(|| {
                DocumentError::Serialize(format!("non-finite float: {}", f))
            })?,
        Value::String(s) => Json::String(s.clone()),
        Value::Sequence(seq) => {
            Json::Array(seq.iter().map(to_json).collect::<Result<_, _>>()?)
        }
        Value::Map(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, val) in map {
                out.insert(key.clone(), to_json(val)?);
            }
            Json::Object(out)
        }
    })
}
