//! SCL deserialization into Rust types.
//!
//! Text is first parsed into a typed [`Document`]; this module then walks the
//! document with serde, so any `T: Deserialize` can be read from SCL.
//!
//! ## Usage
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_scl::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Db { host: String, port: u16 }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config { db: Db, tags: Vec<String> }
//!
//! let text = r#"
//!     db :: class {
//!         host :: str { "localhost" }
//!         port :: num { 5432 }
//!     }
//!     tags :: list(str) { "a", "b" }
//! "#;
//! let config: Config = from_str(text).unwrap();
//! assert_eq!(config.db.port, 5432);
//! ```
//!
//! ## Mapping
//!
//! | SCL           | serde data model |
//! |---------------|------------------|
//! | `bool`        | bool |
//! | `num`         | i64 (narrower integers are range-checked by serde) |
//! | `fl`          | f64 |
//! | `str`, `ml`   | string |
//! | `class`       | map / struct |
//! | `list(T)`     | sequence |
//!
//! Options are always `Some` since SCL has no null; leave a field out to get
//! `None`. Enums are read from a string (unit variants) or a single-field
//! class keyed by the variant name.

use crate::{Document, Error, List, Result, Value};
use serde::de::value::StringDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{de, forward_to_deserialize_any};

/// Deserializes a `T` from a parsed document.
///
/// # Errors
///
/// Returns [`Error::Custom`] when the document's shape does not match `T`.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use serde_scl::{from_document, loads};
///
/// let doc = loads("a :: num { 1 } b :: num { 2 }").unwrap();
/// let map: HashMap<String, i32> = from_document(doc).unwrap();
/// assert_eq!(map["b"], 2);
/// ```
pub fn from_document<T>(doc: Document) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(Value::Object(doc)))
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(list: List) -> Self {
        SeqDeserializer {
            iter: list.into_items().into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(doc: Document) -> Self {
        MapDeserializer {
            iter: doc.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                let key: StringDeserializer<Error> = key.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant: StringDeserializer<Error> = self.variant.into_deserializer();
        let variant = seed.deserialize(variant)?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None => Ok(()),
            Some(_) => Err(Error::custom("expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::List(list)) => visitor.visit_seq(SeqDeserializer::new(list)),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Object(doc)) => visitor.visit_map(MapDeserializer::new(doc)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}

/// Deserializer over a single owned [`Value`].
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Num(n) => visitor.visit_i64(n),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Str(s) | Value::Multiline(s) => visitor.visit_string(s),
            Value::List(list) => visitor.visit_seq(SeqDeserializer::new(list)),
            Value::Object(doc) => visitor.visit_map(MapDeserializer::new(doc)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Str(variant) => visitor.visit_enum(EnumDeserializer {
                variant,
                value: None,
            }),
            Value::Object(doc) if doc.len() == 1 => match doc.into_iter().next() {
                Some((variant, value)) => visitor.visit_enum(EnumDeserializer {
                    variant,
                    value: Some(value),
                }),
                None => Err(Error::custom("expected enum variant")),
            },
            other => Err(Error::custom(format!(
                "expected enum as str or single-field class, found {}",
                other.type_spec()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    enum Mode {
        Off,
        Level(u8),
        Window { w: u32, h: u32 },
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Settings {
        a: Mode,
        b: Mode,
        c: Mode,
        missing: Option<String>,
        present: Option<f32>,
    }

    #[test]
    fn test_enums_and_options() {
        let doc = loads(
            r#"
            a :: str { "Off" }
            b :: class { Level :: num { 3 } }
            c :: class { Window :: class { w :: num { 640 } h :: num { 480 } } }
            present :: fl { 0.5 }
            "#,
        )
        .unwrap();
        let settings: Settings = from_document(doc).unwrap();
        assert_eq!(
            settings,
            Settings {
                a: Mode::Off,
                b: Mode::Level(3),
                c: Mode::Window { w: 640, h: 480 },
                missing: None,
                present: Some(0.5),
            }
        );
    }

    #[test]
    fn test_num_widens_to_float_field() {
        #[derive(Deserialize)]
        struct Ratio {
            r: f64,
        }
        let ratio: Ratio = from_document(loads("r :: num { 2 }").unwrap()).unwrap();
        assert_eq!(ratio.r, 2.0);
    }

    #[test]
    fn test_out_of_range_integer_is_rejected() {
        #[derive(Deserialize, Debug)]
        #[allow(dead_code)]
        struct Port {
            port: u16,
        }
        let err = from_document::<Port>(loads("port :: num { 70000 }").unwrap()).unwrap_err();
        assert!(matches!(err, Error::Custom(_)));
    }

    #[test]
    fn test_nested_lists() {
        let grid: std::collections::BTreeMap<String, Vec<Vec<i64>>> =
            from_document(loads("g :: list(list(num)) { { 1 }, { } }").unwrap()).unwrap();
        assert_eq!(grid["g"], vec![vec![1], vec![]]);
    }
}
