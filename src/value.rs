//! Typed value model for SCL documents.
//!
//! Every value produced by the parser is tagged with the SCL type it was
//! declared with:
//!
//! - [`TypeSpec`]: a declared type tag (`bool`, `str`, `num`, `fl`, `ml`,
//!   `class`, or `list(T)`)
//! - [`Value`]: the tagged union of all SCL values
//! - [`List`]: a homogeneous list that remembers its declared element type,
//!   even when empty
//!
//! ## Examples
//!
//! ```rust
//! use serde_scl::{List, TypeSpec, Value};
//!
//! let mut ports = List::new(TypeSpec::Num);
//! ports.push(Value::from(80)).unwrap();
//! ports.push(Value::from(443)).unwrap();
//!
//! // Element types are enforced on construction
//! assert!(ports.push(Value::from("http")).is_err());
//!
//! let value = Value::List(ports);
//! assert_eq!(value.type_spec(), TypeSpec::list(TypeSpec::Num));
//! assert_eq!(value.type_spec().to_string(), "list(num)");
//! ```

use crate::error::TypeError;
use crate::Document;
use serde::{Serialize, Serializer};
use std::fmt;

/// A declared SCL type.
///
/// Displays as the keyword used in SCL text, so `TypeSpec::list(TypeSpec::Float)`
/// prints as `list(fl)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeSpec {
    Bool,
    Str,
    Num,
    Float,
    Multiline,
    Class,
    List(Box<TypeSpec>),
}

impl TypeSpec {
    /// Shorthand for `TypeSpec::List(Box::new(element))`.
    #[must_use]
    pub fn list(element: TypeSpec) -> Self {
        TypeSpec::List(Box::new(element))
    }

    /// Returns the keyword for this type, `list` for any list type.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            TypeSpec::Bool => "bool",
            TypeSpec::Str => "str",
            TypeSpec::Num => "num",
            TypeSpec::Float => "fl",
            TypeSpec::Multiline => "ml",
            TypeSpec::Class => "class",
            TypeSpec::List(_) => "list",
        }
    }

    /// Returns `true` for the five literal-backed types.
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, TypeSpec::Class | TypeSpec::List(_))
    }

    /// Returns the element type of a list type.
    #[must_use]
    pub fn element(&self) -> Option<&TypeSpec> {
        match self {
            TypeSpec::List(inner) => Some(inner),
            _ => None,
        }
    }

    /// Returns `true` if `class` appears anywhere in this type.
    #[must_use]
    pub fn contains_class(&self) -> bool {
        match self {
            TypeSpec::Class => true,
            TypeSpec::List(inner) => inner.contains_class(),
            _ => false,
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::List(inner) => write!(f, "list({})", inner),
            other => f.write_str(other.keyword()),
        }
    }
}

/// A homogeneous SCL list.
///
/// The element type is fixed when the list is created and every pushed item
/// is checked against it, so a `List` can never hold a mismatched value.
#[derive(Clone, Debug, PartialEq)]
pub struct List {
    element_type: TypeSpec,
    items: Vec<Value>,
}

impl List {
    /// Creates an empty list of the given element type.
    #[must_use]
    pub fn new(element_type: TypeSpec) -> Self {
        List {
            element_type,
            items: Vec::new(),
        }
    }

    /// Builds a list from existing values, checking each one.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::ElementMismatch`] for the first value that does not
    /// conform to `element_type`.
    pub fn from_values(element_type: TypeSpec, items: Vec<Value>) -> crate::Result<Self> {
        let mut list = List::new(element_type);
        list.items.reserve(items.len());
        for item in items {
            list.push(item)?;
        }
        Ok(list)
    }

    /// Appends a value.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::ElementMismatch`] if the value does not conform to
    /// the list's element type.
    pub fn push(&mut self, value: Value) -> crate::Result<()> {
        if !value.conforms_to(&self.element_type) {
            return Err(TypeError::ElementMismatch {
                index: self.items.len(),
                expected: self.element_type.to_string(),
                found: value.type_spec().to_string(),
            }
            .into());
        }
        self.items.push(value);
        Ok(())
    }

    #[must_use]
    pub fn element_type(&self) -> &TypeSpec {
        &self.element_type
    }

    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Consumes the list, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A typed SCL value.
///
/// # Examples
///
/// ```rust
/// use serde_scl::{TypeSpec, Value};
///
/// let port = Value::Num(5432);
/// assert_eq!(port.type_spec(), TypeSpec::Num);
/// assert_eq!(port.as_i64(), Some(5432));
///
/// let note = Value::Multiline("line one\nline two".to_string());
/// assert_eq!(note.as_str(), Some("line one\nline two"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Str(String),
    Float(f64),
    Num(i64),
    Multiline(String),
    Object(Document),
    List(List),
}

impl Value {
    /// Returns the type this value would be declared with.
    ///
    /// Lists report their declared element type, which matters for empty lists.
    #[must_use]
    pub fn type_spec(&self) -> TypeSpec {
        match self {
            Value::Bool(_) => TypeSpec::Bool,
            Value::Str(_) => TypeSpec::Str,
            Value::Float(_) => TypeSpec::Float,
            Value::Num(_) => TypeSpec::Num,
            Value::Multiline(_) => TypeSpec::Multiline,
            Value::Object(_) => TypeSpec::Class,
            Value::List(list) => TypeSpec::list(list.element_type.clone()),
        }
    }

    /// Returns `true` if this value may appear where `ty` is declared.
    #[must_use]
    pub fn conforms_to(&self, ty: &TypeSpec) -> bool {
        match (self, ty) {
            (Value::Bool(_), TypeSpec::Bool)
            | (Value::Str(_), TypeSpec::Str)
            | (Value::Float(_), TypeSpec::Float)
            | (Value::Num(_), TypeSpec::Num)
            | (Value::Multiline(_), TypeSpec::Multiline)
            | (Value::Object(_), TypeSpec::Class) => true,
            (Value::List(list), TypeSpec::List(element)) => list.element_type == **element,
            _ => false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text of a `str` or `ml` value.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Multiline(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a `num`, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns a `fl` value, or a `num` widened to `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Num(n) => Some(*n as f64),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Object(doc) => Some(doc),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }
}

/// Serializes as the plain data model (strings, numbers, maps, sequences).
///
/// The `str`/`ml` distinction and empty-list element types are not part of
/// serde's data model; use [`dumps`](crate::dumps) to preserve them.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Num(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) | Value::Multiline(s) => serializer.serialize_str(s),
            Value::Object(doc) => doc.serialize(serializer),
            Value::List(list) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for element in list {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Num(n) => Ok(n),
            other => Err(crate::Error::custom(format!(
                "expected num, found {}",
                other.type_spec()
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value.as_f64().ok_or_else(|| {
            crate::Error::custom(format!("expected fl, found {}", value.type_spec()))
        })
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(crate::Error::custom(format!(
                "expected bool, found {}",
                other.type_spec()
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Str(s) | Value::Multiline(s) => Ok(s),
            other => Err(crate::Error::custom(format!(
                "expected str, found {}",
                other.type_spec()
            ))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Num(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Num(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Num(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

/// Text without a line break becomes `str`, text with one becomes `ml`.
impl From<String> for Value {
    fn from(value: String) -> Self {
        if value.contains('\n') {
            Value::Multiline(value)
        } else {
            Value::Str(value)
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::from(value.to_string())
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Object(value)
    }
}

impl From<List> for Value {
    fn from(value: List) -> Self {
        Value::List(value)
    }
}
