//! dotenv codec.
//!
//! Line-oriented `KEY=value` files. Blank lines and comment lines are
//! skipped on parse (and therefore lost on round-trip); values are taken
//! verbatim after the first `=`, including whitespace and `#` characters.
//! Only a flat map of strings can be represented.

use std::fmt::Write;

use crate::core::value::{Mapping, Value};
use crate::error::DocumentError;

pub fn parse(input: &str) -> Result<Value, DocumentError> {
    let mut map = Mapping::new();

    for (number, line) in input.split('\n').enumerate() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let equals = line.find('=').ok_or_else(|| DocumentError::DotenvSyntax {
            line: number + 1,
            content: line.to_string(),
        })?;
        let key = &line[..equals];
        if !is_valid_key(key) {
            return Err(DocumentError::DotenvKey {
                line: number + 1,
                key: key.to_string(),
            });
        }

        map.insert(key.to_string(), Value::from(&line[equals + 1..]));
    }

    Ok(Value::Map(map))
}

pub fn serialize(value: &Value) -> Result<String, DocumentError> {
    let map = match value {
        Value::Map(map) => map,
        other => {
            return Err(DocumentError::DotenvValue {
                key: ".".to_string(),
                kind: other.kind(),
            })
        }
    };

    let mut out = String::new();
    for (key, val) in map {
        match val {
            Value::String(s) => {
                let _ = writeln!(out, "{}={}", key, s);
            }
            other => {
                return Err(DocumentError::DotenvValue {
                    key: key.clone(),
                    kind: other.kind(),
                })
            }
        }
    }
    Ok(out)
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(value: &Value) -> &Mapping {
        match value {
            Value::Map(map) => map,
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let doc = parse("# comment\n\n  # indented comment\nK=V\n").unwrap();
        let map = entries(&doc);
        assert_eq!(map.len(), 1);
        assert_eq!(map["K"], Value::from("V"));
    }

    #[test]
    fn test_hash_in_value_is_kept() {
        let doc = parse("# comment\nK=V # part of value\n").unwrap();
        assert_eq!(entries(&doc)["K"], Value::from("V # part of value"));
    }

    #[test]
    fn test_value_taken_verbatim_after_first_equals() {
        let doc = parse("DATABASE_URL=postgres://u:p@host/db?a=b\n").unwrap();
        assert_eq!(
            entries(&doc)["DATABASE_URL"],
            Value::from("postgres://u:p@host/db?a=b")
        );
    }

    #[test]
    fn test_missing_equals_is_an_error() {
        assert!(matches!(
            parse("JUSTAKEY\n"),
            Err(DocumentError::DotenvSyntax { line: 1, .. })
        ));
    }

    #[test]
    fn test_invalid_key_is_an_error() {
        assert!(matches!(
            parse("BAD KEY=v\n"),
            Err(DocumentError::DotenvKey { line: 1, .. })
        ));
    }

    #[test]
    fn test_dotted_keys_allowed() {
        let doc = parse("app.db.url=x\n").unwrap();
        assert!(entries(&doc).contains_key("app.db.url"));
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let input = "ZULU=1\nALPHA=2\nMIKE=3\n";
        let doc = parse(input).unwrap();
        assert_eq!(serialize(&doc).unwrap(), input);
    }

    #[test]
    fn test_serialize_rejects_nested_values() {
        let mut map = Mapping::new();
        map.insert("nested".to_string(), Value::empty_map());
        assert!(matches!(
            serialize(&Value::Map(map)),
            Err(DocumentError::DotenvValue { .. })
        ));
    }

    #[test]
    fn test_serialize_rejects_non_map_root() {
        assert!(serialize(&Value::from("just a string")).is_err());
    }
}
