use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::path::PathCursor;

/// The output of a query: a tree of objects and strings.
///
/// A `Value` is built fresh for every query and owned by whoever issued it.
/// Dropping it releases everything the query produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// An ordered mapping of names to values.
    Object(Object),
    /// A string scalar.
    String(String),
}

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// An object with no fields.
    pub fn empty_object() -> Self {
        Self::Object(Object::new())
    }

    /// Returns `true` if this is an object.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// The string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Object(_) => None,
        }
    }

    /// The fields, if this is an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(obj) => Some(obj),
            Self::String(_) => None,
        }
    }

    /// Walk nested objects along `path` and return the value found there.
    ///
    /// `"/"` and `""` return `self`. Returns `None` if a segment is missing,
    /// if a string is reached before the path is exhausted, or if the path
    /// does not begin with `/`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut cursor = PathCursor::new(path).ok()?;
        let mut current = self;
        while let Some(segment) = cursor.next_segment() {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Self::Object(obj)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Object(obj) => {
                f.write_str("{")?;
                for (i, (name, value)) in obj.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name:?}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Object(obj) => obj.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
        }
    }
}

/// Fields of an object value, kept in insertion order.
///
/// Insertion order is enumeration order of the entries that produced the
/// fields. Uniqueness of names is guaranteed upstream by the registry, so
/// `insert` does not check for duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Object {
    fields: Vec<(String, Value)>,
}

impl Object {
    /// Create an empty object.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), value));
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the object has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
