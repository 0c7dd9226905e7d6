//! Dynamically-typed host values.
//!
//! [`Dynamic`] is the untyped counterpart of [`Value`](crate::Value): plain
//! booleans, numbers and strings plus *shared* mappings and sequences. It is
//! what you hand to [`dumps`](crate::dumps) when the data was built at runtime
//! (or came out of another format) and has no declared SCL types yet; the
//! type validator infers them.
//!
//! [`DynMap`] and [`DynSeq`] are reference-counted handles with interior
//! mutability, so cloning a handle aliases the same container. That makes it
//! possible to build self-referencing structures, which the serializer
//! detects and rejects instead of recursing forever.
//!
//! ## Examples
//!
//! ```rust
//! use serde_scl::{dumps, DynMap, Dynamic};
//!
//! let db = DynMap::new();
//! db.insert("host", Dynamic::from("localhost"));
//! db.insert("port", Dynamic::from(5432));
//!
//! let root = DynMap::new();
//! root.insert("db", Dynamic::Map(db));
//!
//! let text = dumps(&Dynamic::Map(root)).unwrap();
//! assert!(text.contains("port :: num { 5432 }"));
//! ```

use indexmap::IndexMap;
use serde::{ser, Deserialize, Deserializer, Serialize, Serializer};
use std::cell::{Ref, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// An untyped host value.
///
/// `Debug` and `PartialEq` walk the structure recursively and therefore must
/// not be used on cyclic values. `Serialize` fails on a cycle, or past
/// [`MAX_DEPTH`](crate::MAX_DEPTH) nested containers.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Dynamic {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Seq(DynSeq),
    Map(DynMap),
}

/// A shared, ordered string-keyed mapping.
#[derive(Clone, Default)]
pub struct DynMap(Rc<RefCell<IndexMap<String, Dynamic>>>);

/// A shared sequence.
#[derive(Clone, Default)]
pub struct DynSeq(Rc<RefCell<Vec<Dynamic>>>);

impl DynMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, returning the previous value for `key`.
    ///
    /// Takes `&self`: every clone of this handle sees the change.
    pub fn insert(&self, key: impl Into<String>, value: Dynamic) -> Option<Dynamic> {
        self.0.borrow_mut().insert(key.into(), value)
    }

    /// Returns a clone of the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Dynamic> {
        self.0.borrow().get(key).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Borrows the underlying entries.
    ///
    /// # Panics
    ///
    /// Panics if the map is currently being mutated through another handle.
    pub fn entries(&self) -> Ref<'_, IndexMap<String, Dynamic>> {
        self.0.borrow()
    }

    /// Returns `true` if both handles point at the same mapping.
    #[must_use]
    pub fn ptr_eq(&self, other: &DynMap) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Identity of the shared allocation, stable while any handle is alive.
    pub(crate) fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl DynSeq {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value; every clone of this handle sees the change.
    pub fn push(&self, value: Dynamic) {
        self.0.borrow_mut().push(value);
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Dynamic> {
        self.0.borrow().get(index).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Borrows the underlying items.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is currently being mutated through another handle.
    pub fn items(&self) -> Ref<'_, Vec<Dynamic>> {
        self.0.borrow()
    }

    /// Returns `true` if both handles point at the same sequence.
    #[must_use]
    pub fn ptr_eq(&self, other: &DynSeq) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl PartialEq for DynMap {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl PartialEq for DynSeq {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl fmt::Debug for DynMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.borrow().iter()).finish()
    }
}

impl fmt::Debug for DynSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.borrow().iter()).finish()
    }
}

impl<K: Into<String>> FromIterator<(K, Dynamic)> for DynMap {
    fn from_iter<T: IntoIterator<Item = (K, Dynamic)>>(iter: T) -> Self {
        let entries = iter.into_iter().map(|(k, v)| (k.into(), v)).collect();
        DynMap(Rc::new(RefCell::new(entries)))
    }
}

impl FromIterator<Dynamic> for DynSeq {
    fn from_iter<T: IntoIterator<Item = Dynamic>>(iter: T) -> Self {
        DynSeq(Rc::new(RefCell::new(iter.into_iter().collect())))
    }
}

impl Dynamic {
    /// Human-readable name of this value's runtime shape, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Dynamic::Null => "null",
            Dynamic::Bool(_) => "boolean",
            Dynamic::Int(_) => "integer",
            Dynamic::Float(_) => "float",
            Dynamic::String(_) => "string",
            Dynamic::Seq(_) => "sequence",
            Dynamic::Map(_) => "mapping",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Dynamic::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Dynamic::Map(_))
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Dynamic::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Dynamic::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Dynamic::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&DynMap> {
        match self {
            Dynamic::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_seq(&self) -> Option<&DynSeq> {
        match self {
            Dynamic::Seq(seq) => Some(seq),
            _ => None,
        }
    }
}

thread_local! {
    /// Containers currently being serialized on this thread.
    static SERIALIZING: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
}

/// Marks a container as in progress until dropped.
struct SerializeGuard(usize);

impl SerializeGuard {
    fn enter<E: ser::Error>(id: usize) -> Result<Self, E> {
        SERIALIZING.with(|active| {
            let mut active = active.borrow_mut();
            if active.len() > crate::MAX_DEPTH {
                return Err(E::custom(format!(
                    "nesting deeper than {} levels",
                    crate::MAX_DEPTH
                )));
            }
            if !active.insert(id) {
                return Err(E::custom("cyclic structure"));
            }
            Ok(SerializeGuard(id))
        })
    }
}

impl Drop for SerializeGuard {
    fn drop(&mut self) {
        SERIALIZING.with(|active| {
            active.borrow_mut().remove(&self.0);
        });
    }
}

impl Serialize for Dynamic {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Dynamic::Null => serializer.serialize_unit(),
            Dynamic::Bool(b) => serializer.serialize_bool(*b),
            Dynamic::Int(i) => serializer.serialize_i64(*i),
            Dynamic::Float(f) => serializer.serialize_f64(*f),
            Dynamic::String(s) => serializer.serialize_str(s),
            Dynamic::Seq(seq) => {
                use serde::ser::SerializeSeq;
                let _guard = SerializeGuard::enter::<S::Error>(seq.id())?;
                let items = seq.items();
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for element in items.iter() {
                    out.serialize_element(element)?;
                }
                out.end()
            }
            Dynamic::Map(map) => {
                use serde::ser::SerializeMap;
                let _guard = SerializeGuard::enter::<S::Error>(map.id())?;
                let entries = map.entries();
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Dynamic {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct DynamicVisitor;

        impl<'de> Visitor<'de> for DynamicVisitor {
            type Value = Dynamic;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any self-describing value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Dynamic::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Dynamic::Int(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i64::try_from(value).map(Dynamic::Int).map_err(|_| {
                    E::custom(format!("integer {} does not fit a 64-bit signed num", value))
                })
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Dynamic::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Dynamic::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Dynamic::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Dynamic::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Dynamic::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let out = DynSeq::new();
                while let Some(elem) = seq.next_element()? {
                    out.push(elem);
                }
                Ok(Dynamic::Seq(out))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let out = DynMap::new();
                while let Some((key, value)) = map.next_entry::<String, Dynamic>()? {
                    out.insert(key, value);
                }
                Ok(Dynamic::Map(out))
            }
        }

        deserializer.deserialize_any(DynamicVisitor)
    }
}

impl From<bool> for Dynamic {
    fn from(value: bool) -> Self {
        Dynamic::Bool(value)
    }
}

impl From<i32> for Dynamic {
    fn from(value: i32) -> Self {
        Dynamic::Int(value as i64)
    }
}

impl From<i64> for Dynamic {
    fn from(value: i64) -> Self {
        Dynamic::Int(value)
    }
}

impl From<u32> for Dynamic {
    fn from(value: u32) -> Self {
        Dynamic::Int(value as i64)
    }
}

impl From<f64> for Dynamic {
    fn from(value: f64) -> Self {
        Dynamic::Float(value)
    }
}

impl From<String> for Dynamic {
    fn from(value: String) -> Self {
        Dynamic::String(value)
    }
}

impl From<&str> for Dynamic {
    fn from(value: &str) -> Self {
        Dynamic::String(value.to_string())
    }
}

impl From<Vec<Dynamic>> for Dynamic {
    fn from(value: Vec<Dynamic>) -> Self {
        Dynamic::Seq(value.into_iter().collect())
    }
}

impl From<DynMap> for Dynamic {
    fn from(value: DynMap) -> Self {
        Dynamic::Map(value)
    }
}

impl From<DynSeq> for Dynamic {
    fn from(value: DynSeq) -> Self {
        Dynamic::Seq(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_alias() {
        let map = DynMap::new();
        let alias = map.clone();
        alias.insert("k", Dynamic::from(1));
        assert_eq!(map.get("k"), Some(Dynamic::Int(1)));
        assert!(map.ptr_eq(&alias));
        assert_eq!(map.id(), alias.id());
    }

    #[test]
    fn test_distinct_handles_compare_by_content() {
        let a: DynSeq = vec![Dynamic::from(1), Dynamic::from(2)].into_iter().collect();
        let b: DynSeq = vec![Dynamic::from(1), Dynamic::from(2)].into_iter().collect();
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_self_reference_is_constructible() {
        let map = DynMap::new();
        map.insert("me", Dynamic::Map(map.clone()));
        let inner = map.get("me").unwrap();
        assert!(inner.as_map().unwrap().ptr_eq(&map));
    }

    #[test]
    fn test_serialize_rejects_cycles() {
        let seq = DynSeq::new();
        seq.push(Dynamic::from(1));
        seq.push(Dynamic::Seq(seq.clone()));
        let err = serde_json::to_string(&Dynamic::Seq(seq.clone())).unwrap_err();
        assert!(err.to_string().contains("cyclic structure"));

        let shared = DynMap::new();
        shared.insert("n", Dynamic::from(1));
        let root: DynMap = vec![
            ("a", Dynamic::Map(shared.clone())),
            ("b", Dynamic::Map(shared)),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            serde_json::to_string(&Dynamic::Map(root)).unwrap(),
            r#"{"a":{"n":1},"b":{"n":1}}"#
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Dynamic::Null.kind_name(), "null");
        assert_eq!(Dynamic::from(1.5).kind_name(), "float");
        assert_eq!(Dynamic::from(vec![]).kind_name(), "sequence");
    }
}
