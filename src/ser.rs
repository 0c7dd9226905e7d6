//! SCL serialization.
//!
//! Two pieces live here:
//!
//! - [`Serializer`] writes a typed [`Document`] as canonical SCL text.
//! - [`DynamicSerializer`] is a serde serializer that turns any
//!   `T: Serialize` into a [`Dynamic`] host value, which the type validator
//!   then converts into a document.
//!
//! ## Canonical layout
//!
//! ```text
//! name :: str { "text" }
//! ratio :: fl { 2.0 }
//! desc :: ml {
//!     'verbatim
//! content'
//! }
//! db :: class {
//!     port :: num { 5432 }
//! }
//! ports :: list(num) { 1, 2, 3 }
//! servers :: list(class) {
//!     {
//!         host :: str { "a" }
//!     },
//!     { }
//! }
//! ```
//!
//! Serializing the result of parsing canonical text reproduces it byte for
//! byte.
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde_scl::{loads, SclOptions, Serializer};
//!
//! let doc = loads("on :: bool { yes }").unwrap();
//! let mut serializer = Serializer::new(SclOptions::default());
//! serializer.serialize_document(&doc).unwrap();
//! assert_eq!(serializer.into_inner(), "on :: bool { true }\n");
//! ```

use crate::error::TypeError;
use crate::options::SclOptions;
use crate::validate;
use crate::{DynMap, DynSeq, Document, Dynamic, Error, List, Result, Value, MAX_DEPTH};
use serde::{ser, Serialize};
use std::borrow::Cow;

/// Anything that can be written as an SCL document.
///
/// Implemented for [`Document`] (used as-is) and [`Dynamic`] (converted by
/// type inference). Both produce identical text for equivalent content.
pub trait ToDocument {
    /// Returns the document to serialize.
    ///
    /// # Errors
    ///
    /// Fails if the value has no SCL representation.
    fn to_document_with(&self, options: &SclOptions) -> Result<Cow<'_, Document>>;
}

impl ToDocument for Document {
    fn to_document_with(&self, _options: &SclOptions) -> Result<Cow<'_, Document>> {
        Ok(Cow::Borrowed(self))
    }
}

impl ToDocument for Dynamic {
    fn to_document_with(&self, options: &SclOptions) -> Result<Cow<'_, Document>> {
        validate::to_document(self, options).map(Cow::Owned)
    }
}

/// The SCL text serializer.
///
/// Writes documents in canonical layout, indenting by `options.indent`
/// spaces per nesting level.
pub struct Serializer {
    output: String,
    options: SclOptions,
    path: String,
    depth: usize,
}

impl Serializer {
    pub fn new(options: SclOptions) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
            path: String::new(),
            depth: 0,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends every field of `doc` at the top level.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::UnsupportedValue`] for a non-finite float or
    /// for multiline text containing `'`, and [`TypeError::NestingTooDeep`]
    /// past [`MAX_DEPTH`] levels of classes and lists.
    pub fn serialize_document(&mut self, doc: &Document) -> Result<()> {
        self.write_fields(doc, 0)
    }

    fn write_indent(&mut self, level: usize) {
        let width = level * self.options.indent;
        self.output.extend(std::iter::repeat(' ').take(width));
    }

    fn write_fields(&mut self, doc: &Document, level: usize) -> Result<()> {
        for (name, value) in doc {
            let len = self.path.len();
            if !self.path.is_empty() {
                self.path.push('.');
            }
            self.path.push_str(name);

            self.write_indent(level);
            self.write_name(name);
            self.output.push_str(" :: ");
            self.output.push_str(&value.type_spec().to_string());
            self.output.push(' ');
            self.write_braced(value, level)?;
            self.output.push('\n');

            self.path.truncate(len);
        }
        Ok(())
    }

    fn write_name(&mut self, name: &str) {
        if is_bare_name(name) {
            self.output.push_str(name);
        } else {
            write_quoted(&mut self.output, name);
        }
    }

    /// Runs `f` one class or list deeper.
    fn nested(&mut self, f: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            let path = if self.path.is_empty() { "<root>" } else { &self.path };
            return Err(TypeError::too_deep(path).into());
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Writes `{ ... }` for a value whose opening line sits at `level`.
    fn write_braced(&mut self, value: &Value, level: usize) -> Result<()> {
        match value {
            Value::Object(doc) if doc.is_empty() => self.output.push_str("{ }"),
            Value::Object(doc) => self.nested(|this| {
                this.output.push_str("{\n");
                this.write_fields(doc, level + 1)?;
                this.write_indent(level);
                this.output.push('}');
                Ok(())
            })?,
            Value::List(list) => self.write_list(list, level)?,
            Value::Multiline(_) => {
                self.output.push_str("{\n");
                self.write_indent(level + 1);
                self.write_literal(value)?;
                self.output.push('\n');
                self.write_indent(level);
                self.output.push('}');
            }
            scalar => {
                self.output.push_str("{ ");
                self.write_literal(scalar)?;
                self.output.push_str(" }");
            }
        }
        Ok(())
    }

    fn write_list(&mut self, list: &List, level: usize) -> Result<()> {
        if list.is_empty() {
            self.output.push_str("{ }");
            return Ok(());
        }
        self.nested(|this| this.write_list_items(list, level))
    }

    fn write_list_items(&mut self, list: &List, level: usize) -> Result<()> {
        let one_per_line = list.element_type().contains_class();
        self.output.push_str(if one_per_line { "{\n" } else { "{ " });

        for (i, item) in list.iter().enumerate() {
            let len = self.path.len();
            self.path.push_str(&format!("[{}]", i));

            if one_per_line {
                if i > 0 {
                    self.output.push_str(",\n");
                }
                self.write_indent(level + 1);
                self.write_braced(item, level + 1)?;
            } else {
                if i > 0 {
                    self.output.push_str(", ");
                }
                match item {
                    Value::List(inner) => self.write_list(inner, level)?,
                    scalar => self.write_literal(scalar)?,
                }
            }

            self.path.truncate(len);
        }

        if one_per_line {
            self.output.push('\n');
            self.write_indent(level);
            self.output.push('}');
        } else {
            self.output.push_str(" }");
        }
        Ok(())
    }

    fn write_literal(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Num(n) => self.output.push_str(&n.to_string()),
            Value::Float(f) => {
                let text = format_float(*f).ok_or_else(|| {
                    self.unsupported(&format!("non-finite float {}", f))
                })?;
                self.output.push_str(&text);
            }
            Value::Str(s) => write_quoted(&mut self.output, s),
            Value::Multiline(s) => {
                if s.contains('\'') {
                    return Err(self.unsupported("multiline text containing '"));
                }
                self.output.push('\'');
                self.output.push_str(s);
                self.output.push('\'');
            }
            Value::Object(_) | Value::List(_) => {
                return Err(self.unsupported("nested value where a literal is required"))
            }
        }
        Ok(())
    }

    fn unsupported(&self, found: &str) -> Error {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        TypeError::unsupported(path, found).into()
    }
}

/// Shortest round-tripping form, always with a decimal point.
fn format_float(f: f64) -> Option<String> {
    if !f.is_finite() {
        return None;
    }
    let mut text = f.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    Some(text)
}

fn is_bare_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(name, "true" | "false" | "yes" | "no")
}

fn write_quoted(output: &mut String, s: &str) {
    output.push('"');
    for ch in s.chars() {
        match ch {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => output.push_str(&format!("\\u{:04X}", c as u32)),
            c => output.push(c),
        }
    }
    output.push('"');
}

/// Converts any `T: Serialize` into a [`Dynamic`].
///
/// # Errors
///
/// Fails for integers above `i64::MAX` and for map keys that are not strings
/// or integers.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_scl::{to_dynamic, Dynamic};
///
/// #[derive(Serialize)]
/// struct Server { host: String, port: u16 }
///
/// let value = to_dynamic(&Server { host: "a".into(), port: 80 }).unwrap();
/// let map = value.as_map().unwrap();
/// assert_eq!(map.get("port"), Some(Dynamic::Int(80)));
/// ```
pub fn to_dynamic<T>(value: &T) -> Result<Dynamic>
where
    T: Serialize + ?Sized,
{
    value.serialize(DynamicSerializer)
}

/// Serde serializer producing [`Dynamic`] values.
///
/// Enum variants follow serde's externally tagged form: unit variants become
/// strings, other variants single-entry maps keyed by the variant name.
pub struct DynamicSerializer;

pub struct SerializeVec {
    seq: DynSeq,
}

pub struct SerializeTupleVariant {
    name: &'static str,
    seq: DynSeq,
}

pub struct SerializeMap {
    map: DynMap,
    current_key: Option<String>,
}

pub struct SerializeStructVariant {
    name: &'static str,
    map: DynMap,
}

fn tagged(name: &'static str, value: Dynamic) -> Dynamic {
    let map = DynMap::new();
    map.insert(name, value);
    Dynamic::Map(map)
}

impl ser::Serializer for DynamicSerializer {
    type Ok = Dynamic;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Dynamic> {
        Ok(Dynamic::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Dynamic> {
        Ok(Dynamic::Int(v as i64))
    }

    fn serialize_i16(self, v: i16) -> Result<Dynamic> {
        Ok(Dynamic::Int(v as i64))
    }

    fn serialize_i32(self, v: i32) -> Result<Dynamic> {
        Ok(Dynamic::Int(v as i64))
    }

    fn serialize_i64(self, v: i64) -> Result<Dynamic> {
        Ok(Dynamic::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Dynamic> {
        Ok(Dynamic::Int(v as i64))
    }

    fn serialize_u16(self, v: u16) -> Result<Dynamic> {
        Ok(Dynamic::Int(v as i64))
    }

    fn serialize_u32(self, v: u32) -> Result<Dynamic> {
        Ok(Dynamic::Int(v as i64))
    }

    fn serialize_u64(self, v: u64) -> Result<Dynamic> {
        i64::try_from(v)
            .map(Dynamic::Int)
            .map_err(|_| Error::custom(format!("integer {} does not fit a 64-bit signed num", v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Dynamic> {
        Ok(Dynamic::Float(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Result<Dynamic> {
        Ok(Dynamic::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Dynamic> {
        Ok(Dynamic::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Dynamic> {
        Ok(Dynamic::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Dynamic> {
        Ok(Dynamic::Seq(v.iter().map(|&b| Dynamic::Int(b as i64)).collect()))
    }

    fn serialize_none(self) -> Result<Dynamic> {
        Ok(Dynamic::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Dynamic>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Dynamic> {
        Ok(Dynamic::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Dynamic> {
        Ok(Dynamic::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Dynamic> {
        Ok(Dynamic::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Dynamic>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Dynamic>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, to_dynamic(value)?))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec { seq: DynSeq::new() })
    }

    fn serialize_tuple(self, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec { seq: DynSeq::new() })
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec { seq: DynSeq::new() })
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            name: variant,
            seq: DynSeq::new(),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            map: DynMap::new(),
            current_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        self.serialize_map(None)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            name: variant,
            map: DynMap::new(),
        })
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Dynamic;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.seq.push(to_dynamic(value)?);
        Ok(())
    }

    fn end(self) -> Result<Dynamic> {
        Ok(Dynamic::Seq(self.seq))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Dynamic;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Dynamic> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Dynamic;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Dynamic> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Dynamic;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.seq.push(to_dynamic(value)?);
        Ok(())
    }

    fn end(self) -> Result<Dynamic> {
        Ok(tagged(self.name, Dynamic::Seq(self.seq)))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Dynamic;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_dynamic(key)? {
            Dynamic::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            Dynamic::Int(i) => {
                self.current_key = Some(i.to_string());
                Ok(())
            }
            other => Err(Error::custom(format!(
                "map keys must be strings, found {}",
                other.kind_name()
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_dynamic(value)?);
        Ok(())
    }

    fn end(self) -> Result<Dynamic> {
        Ok(Dynamic::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Dynamic;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key, to_dynamic(value)?);
        Ok(())
    }

    fn end(self) -> Result<Dynamic> {
        Ok(Dynamic::Map(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Dynamic;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key, to_dynamic(value)?);
        Ok(())
    }

    fn end(self) -> Result<Dynamic> {
        Ok(tagged(self.name, Dynamic::Map(self.map)))
    }
}
