//! JSON-path-like selectors for addressing leaf values in a document.
//!
//! A path is a sequence of segments, written like `.spec[0].data.HELLO` or
//! `.data['.key.with.dots']`. Keys containing dots, quotes, or brackets are
//! spelled with the quoted bracket form; quoted contents are taken verbatim,
//! there are no escapes. Equality compares segment sequences, never the
//! textual spelling, so `.obj.nested.key` and `.obj['nested'].key` are the
//! same path.

use std::fmt;
use std::str::FromStr;

use crate::core::value::Value;
use crate::error::PathError;

/// One step of a [`Path`]: a map lookup or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// A parsed, immutable selector.
///
/// `append_key`/`append_index` return a new path; the original is untouched.
/// The `Display` form is for logs and error messages only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

fn syntax(path: &str, reason: impl Into<String>) -> PathError {
    PathError::Syntax {
        path: path.to_string(),
        reason: reason.into(),
    }
}

impl Path {
    /// The empty path, pointing at the document root.
    pub fn root() -> Path {
        Path::default()
    }

    /// Parse a selector string.
    ///
    /// A bare `.` (or the empty string) is the root marker; a leading `.[`
    /// is read as `[`. An empty ident anywhere else is a syntax error, as
    /// are negative or non-numeric bracket indices and unterminated
    /// brackets.
    pub fn parse(input: &str) -> Result<Path, PathError> {
        let bytes = input.as_bytes();
        let mut segments = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            match bytes[pos] {
                b'.' => {
                    let start = pos + 1;
                    if start == bytes.len() {
                        if pos == 0 {
                            break; // bare "." is the root
                        }
                        return Err(syntax(input, "unexpected empty key"));
                    }
                    if bytes[start] == b'[' {
                        if pos == 0 {
                            pos = start;
                            continue;
                        }
                        return Err(syntax(input, "unexpected empty key"));
                    }
                    let mut end = start;
                    while end < bytes.len() && bytes[end] != b'.' && bytes[end] != b'[' {
                        end += 1;
                    }
                    if end == start {
                        return Err(syntax(input, "unexpected empty key"));
                    }
                    segments.push(Segment::Key(input[start..end].to_string()));
                    pos = end;
                }
                b'[' => {
                    let close = match input[pos + 1..].find(']') {
                        Some(offset) => pos + 1 + offset,
                        None => return Err(syntax(input, "missing ']'")),
                    };
                    let inner = &input[pos + 1..close];
                    if inner.is_empty() {
                        return Err(syntax(input, "unexpected empty key"));
                    }
                    let quote = inner.as_bytes()[0];
                    if inner.len() >= 2
                        && (quote == b'"' || quote == b'\'')
                        && inner.as_bytes()[inner.len() - 1] == quote
                    {
                        segments.push(Segment::Key(inner[1..inner.len() - 1].to_string()));
                    } else {
                        let index: i64 = inner.parse().map_err(|_| {
                            syntax(input, format!("unexpected non-integer '{}'", inner))
                        })?;
                        if index < 0 {
                            return Err(syntax(
                                input,
                                format!("unexpected negative index '{}'", index),
                            ));
                        }
                        segments.push(Segment::Index(index as usize));
                    }
                    pos = close + 1;
                }
                other => {
                    return Err(syntax(input, format!("unexpected '{}'", other as char)));
                }
            }
        }

        Ok(Path { segments })
    }

    /// The segments of this path, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// A new path with a trailing map-key segment.
    pub fn append_key(&self, key: &str) -> Path {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.to_string()));
        Path { segments }
    }

    /// A new path with a trailing sequence-index segment.
    pub fn append_index(&self, index: usize) -> Path {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Path { segments }
    }

    /// Resolve this path against a document and return the string leaf.
    ///
    /// Every `Key` segment must land on a map with that key, every `Index`
    /// segment on a sequence long enough, and the final node must be a
    /// string.
    pub fn read_from<'a>(&self, root: &'a Value) -> Result<&'a str, PathError> {
        let mut current = root;
        let mut visited = Path::root();

        for segment in &self.segments {
            match segment {
                Segment::Key(key) => {
                    let map = match current {
                        Value::Map(map) => map,
                        other => {
                            return Err(PathError::TypeMismatch {
                                path: self.to_string(),
                                visited: visited.to_string(),
                                kind: other.kind(),
                            })
                        }
                    };
                    current = map.get(key).ok_or_else(|| PathError::NotFound {
                        path: self.to_string(),
                        visited: visited.to_string(),
                        key: key.clone(),
                    })?;
                    visited = visited.append_key(key);
                }
                Segment::Index(index) => {
                    let seq = match current {
                        Value::Sequence(seq) => seq,
                        other => {
                            return Err(PathError::TypeMismatch {
                                path: self.to_string(),
                                visited: visited.to_string(),
                                kind: other.kind(),
                            })
                        }
                    };
                    current = seq.get(*index).ok_or(PathError::IndexOutOfRange {
                        path: self.to_string(),
                        visited: visited.to_string(),
                        len: seq.len(),
                    })?;
                    visited = visited.append_index(*index);
                }
            }
        }

        current.as_str().ok_or_else(|| PathError::NotAString {
            path: self.to_string(),
            kind: current.kind(),
        })
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Path, PathError> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, ".");
        }
        for segment in &self.segments {
            match segment {
                Segment::Key(key)
                    if !key.is_empty()
                        && !key.contains(['.', '[', ']', '\'', '"']) =>
                {
                    write!(f, ".{}", key)?;
                }
                Segment::Key(key) => write!(f, "['{}']", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Mapping;

    fn key(k: &str) -> Segment {
        Segment::Key(k.to_string())
    }

    #[test]
    fn test_parse_token_sequence() {
        let path = Path::parse(".spec[0].key.a.b[1].foo").unwrap();
        assert_eq!(
            path.segments(),
            &[
                key("spec"),
                Segment::Index(0),
                key("key"),
                key("a"),
                key("b"),
                Segment::Index(1),
                key("foo"),
            ]
        );
    }

    #[test]
    fn test_parse_root_markers() {
        assert_eq!(Path::parse(".").unwrap(), Path::root());
        assert_eq!(Path::parse("").unwrap(), Path::root());
        assert_eq!(Path::parse(".[0]").unwrap().segments(), &[Segment::Index(0)]);
    }

    #[test]
    fn test_parse_rejects_empty_idents() {
        assert!(Path::parse(".foo..bar").is_err());
        assert!(Path::parse(".foo.").is_err());
        assert!(Path::parse(".a.[0]").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_brackets() {
        assert!(Path::parse(".a[]").is_err());
        assert!(Path::parse(".a[-1]").is_err());
        assert!(Path::parse(".a[x]").is_err());
        assert!(Path::parse(".a[0").is_err());
    }

    #[test]
    fn test_parse_quoted_keys() {
        let double = Path::parse(".test[\".nested.key\"]").unwrap();
        let single = Path::parse(".test['.nested.key']").unwrap();
        assert_eq!(double.segments(), &[key("test"), key(".nested.key")]);
        assert_eq!(double, single);
    }

    #[test]
    fn test_equality_ignores_spelling() {
        let path = Path::parse(".obj.nested['key']").unwrap();

        for equal in [".obj.nested.key", ".['obj'].nested.key", ".obj['nested'].key"] {
            assert_eq!(path, Path::parse(equal).unwrap(), "{} should be equal", equal);
        }
        for not_equal in [".obj.nested", ".['obj'].nested", ".obj['nested']"] {
            assert_ne!(
                path,
                Path::parse(not_equal).unwrap(),
                "{} should not be equal",
                not_equal
            );
        }
    }

    #[test]
    fn test_key_and_index_never_equal() {
        assert_ne!(Path::parse(".a[0]").unwrap(), Path::parse(".a.0").unwrap());
    }

    #[test]
    fn test_append_returns_new_path() {
        let base = Path::parse(".a").unwrap();
        let extended = base.append_key("b").append_index(2);
        assert_eq!(base.segments().len(), 1);
        assert_eq!(extended, Path::parse(".a.b[2]").unwrap());
    }

    #[test]
    fn test_read_from_nested() {
        let mut data = Mapping::new();
        data.insert("data".to_string(), Value::from("testing"));
        let root = Value::Map(Mapping::from_iter([(
            "spec".to_string(),
            Value::Sequence(vec![Value::Map(data)]),
        )]));

        let path = Path::parse(".spec[0].data").unwrap();
        assert_eq!(path.read_from(&root).unwrap(), "testing");
    }

    #[test]
    fn test_read_from_quoted_key() {
        let mut inner = Mapping::new();
        inner.insert(".nested.key".to_string(), Value::from("testing"));
        let root = Value::Map(Mapping::from_iter([(
            "test".to_string(),
            Value::Map(inner),
        )]));

        let path = Path::parse(".test['.nested.key']").unwrap();
        assert_eq!(path.read_from(&root).unwrap(), "testing");
    }

    #[test]
    fn test_read_from_errors() {
        let root = Value::Map(Mapping::from_iter([
            ("a".to_string(), Value::from("x")),
            ("n".to_string(), Value::Integer(4)),
        ]));

        assert!(matches!(
            Path::parse(".missing").unwrap().read_from(&root),
            Err(PathError::NotFound { .. })
        ));
        assert!(matches!(
            Path::parse(".a.b").unwrap().read_from(&root),
            Err(PathError::TypeMismatch { .. })
        ));
        assert!(matches!(
            Path::parse(".a[1]").unwrap().read_from(&root),
            Err(PathError::TypeMismatch { .. })
        ));
        assert!(matches!(
            Path::parse(".n").unwrap().read_from(&root),
            Err(PathError::NotAString { .. })
        ));
    }

    #[test]
    fn test_index_out_of_range() {
        let root = Value::Map(Mapping::from_iter([(
            "seq".to_string(),
            Value::Sequence(vec![Value::from("only")]),
        )]));
        assert!(matches!(
            Path::parse(".seq[3]").unwrap().read_from(&root),
            Err(PathError::IndexOutOfRange { len: 1, .. })
        ));
    }

    #[test]
    fn test_display_round_trips_plain_and_quoted() {
        let path = Path::parse(".spec[0].data['.dotted.key']").unwrap();
        assert_eq!(path.to_string(), ".spec[0].data['.dotted.key']");
        assert_eq!(Path::root().to_string(), ".");
    }
}
