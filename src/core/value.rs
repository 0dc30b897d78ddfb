//! Document value tree.
//!
//! A parsed config file is a tree of [`Value`] nodes. Map nodes use an
//! [`IndexMap`] so that iteration order is exactly insertion order; the
//! serializers rely on this to reproduce the original key order on export.

use indexmap::IndexMap;

/// Insertion-ordered map node.
pub type Mapping = IndexMap<String, Value>;

/// A single node in a parsed configuration document.
///
/// Covers the union of leaf and interior types that YAML, JSON, and dotenv
/// can express. Anything a format can produce beyond these variants is
/// rejected at parse time with a descriptive error rather than smuggled in
/// as an opaque value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Map(Mapping),
}

impl Value {
    /// Short type name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Map(_) => "map",
        }
    }

    /// The string contents, if this is a string leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// An empty map node.
    pub fn empty_map() -> Value {
        Value::Map(Mapping::new())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::Bool(true).kind(), "bool");
        assert_eq!(Value::Integer(3).kind(), "integer");
        assert_eq!(Value::Float(1.5).kind(), "float");
        assert_eq!(Value::from("x").kind(), "string");
        assert_eq!(Value::Sequence(vec![]).kind(), "sequence");
        assert_eq!(Value::empty_map().kind(), "map");
    }

    #[test]
    fn test_map_preserves_insertion_order() {
        let mut map = Mapping::new();
        map.insert("zebra".to_string(), Value::from("1"));
        map.insert("apple".to_string(), Value::from("2"));
        map.insert("mango".to_string(), Value::from("3"));

        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::Integer(1).as_str(), None);
    }
}
