//! Ordered field container for SCL documents.
//!
//! A [`Document`] maps field names to [`Value`]s and is backed by [`IndexMap`],
//! so iteration follows insertion order. The parser inserts fields in source
//! order and the serializer writes them back in that order, which makes
//! parse → serialize output deterministic.
//!
//! ## Examples
//!
//! ```rust
//! use serde_scl::{Document, Value};
//!
//! let mut doc = Document::new();
//! doc.insert("host".to_string(), Value::from("localhost"));
//! doc.insert("port".to_string(), Value::from(5432));
//!
//! let keys: Vec<_> = doc.keys().cloned().collect();
//! assert_eq!(keys, vec!["host", "port"]);
//! ```

use crate::Value;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// An ordered map of field names to typed values.
///
/// Field names are unique; [`Document::insert`] replaces an existing entry in
/// place (keeping its position), mirroring `IndexMap`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document(IndexMap<String, Value>);

impl Document {
    /// Creates an empty `Document`.
    #[must_use]
    pub fn new() -> Self {
        Document(IndexMap::new())
    }

    /// Creates an empty `Document` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Document(IndexMap::with_capacity(capacity))
    }

    /// Inserts a field.
    ///
    /// If the document already contained this name, the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_scl::{Document, Value};
    ///
    /// let mut doc = Document::new();
    /// assert!(doc.insert("key".to_string(), Value::from(42)).is_none());
    /// assert!(doc.insert("key".to_string(), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, name: String, value: Value) -> Option<Value> {
        self.0.insert(name, value)
    }

    /// Returns a reference to the value of the named field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the field names, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over `(name, value)` pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Document(IndexMap::from_iter(iter))
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_keeps_position() {
        let mut doc = Document::new();
        doc.insert("a".into(), Value::Num(1));
        doc.insert("b".into(), Value::Num(2));
        doc.insert("a".into(), Value::Num(3));

        let entries: Vec<_> = doc.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
        assert_eq!(entries, vec![("a", Value::Num(3)), ("b", Value::Num(2))]);
    }

    #[test]
    fn test_from_iterator_preserves_order() {
        let doc: Document = vec![
            ("z".to_string(), Value::Bool(true)),
            ("a".to_string(), Value::Bool(false)),
        ]
        .into_iter()
        .collect();
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["z", "a"]);
    }
}
