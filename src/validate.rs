//! Type validation shared by the parser and the serializer.
//!
//! In the parse direction, [`coerce`] turns a literal token into a [`Value`]
//! of the declared type. In the serialize direction, [`infer_type`] decides
//! which SCL type a [`Dynamic`] host value gets, and [`to_document`] converts
//! a whole dynamic mapping into a typed [`Document`].
//!
//! Inference rules:
//!
//! | host value                 | SCL type |
//! |----------------------------|----------|
//! | boolean                    | `bool`   |
//! | integer                    | `num`    |
//! | finite float               | `fl`     |
//! | string without line break  | `str`    |
//! | string with line break     | `ml` (or `str` if it contains `'`) |
//! | mapping                    | `class`  |
//! | sequence                   | `list(T)`, all elements unified to `T` |
//!
//! Inside a list, `str` and `ml` elements unify to `str`. Other mixes are a
//! [`TypeError::HeterogeneousList`]. Null values and non-finite floats have no
//! SCL form and fail with [`TypeError::UnsupportedValue`].
//!
//! ## Examples
//!
//! ```rust
//! use serde_scl::{infer_type, scl, TypeSpec};
//!
//! let value = scl!([[1, 2], []]);
//! assert_eq!(
//!     infer_type(&value).unwrap(),
//!     TypeSpec::list(TypeSpec::list(TypeSpec::Num))
//! );
//! ```

use crate::dynamic::{DynMap, DynSeq, Dynamic};
use crate::error::TypeError;
use crate::lexer::{Token, TokenKind};
use crate::{Document, List, Result, SclOptions, TypeSpec, Value, MAX_DEPTH};
use std::collections::HashSet;
use tracing::debug;

/// Converts a literal token into a value of the declared type.
///
/// # Errors
///
/// - [`TypeError::Mismatch`] if the literal kind does not fit `ty`. `class`
///   and `list` values never come from a single literal.
/// - [`TypeError::NumberOutOfRange`] if a `num` literal does not fit `i64`,
///   or a `fl` literal is not finite.
///
/// # Examples
///
/// ```rust
/// use serde_scl::lexer::{Token, TokenKind};
/// use serde_scl::{coerce, TypeSpec, Value};
///
/// let token = Token::new(TokenKind::NumberLiteral("3".into()), 1, 1);
/// assert_eq!(coerce(&TypeSpec::Float, &token).unwrap(), Value::Float(3.0));
/// assert!(coerce(&TypeSpec::Str, &token).is_err());
/// ```
pub fn coerce(ty: &TypeSpec, token: &Token) -> Result<Value> {
    let (line, col) = (token.line, token.col);
    let out_of_range = |raw: &str| TypeError::NumberOutOfRange {
        literal: raw.to_string(),
        ty: ty.to_string(),
        line,
        col,
    };

    let value = match (ty, &token.kind) {
        (TypeSpec::Bool, TokenKind::BooleanLiteral(b)) => Value::Bool(*b),
        (TypeSpec::Str, TokenKind::StringLiteral(s)) => Value::Str(s.clone()),
        (TypeSpec::Multiline, TokenKind::MultilineStringLiteral(s)) => Value::Multiline(s.clone()),
        (TypeSpec::Num, TokenKind::NumberLiteral(raw)) => {
            Value::Num(raw.parse::<i64>().map_err(|_| out_of_range(raw))?)
        }
        (TypeSpec::Float, TokenKind::NumberLiteral(raw) | TokenKind::FloatLiteral(raw)) => {
            match raw.parse::<f64>() {
                Ok(f) if f.is_finite() => Value::Float(f),
                _ => return Err(out_of_range(raw).into()),
            }
        }
        (expected, found) => {
            return Err(
                TypeError::mismatch(&expected.to_string(), &found.describe(), line, col).into(),
            )
        }
    };
    Ok(value)
}

/// Infers the SCL type of a dynamic value with default options.
///
/// # Errors
///
/// See [`infer_type_with_options`].
pub fn infer_type(value: &Dynamic) -> Result<TypeSpec> {
    infer_type_with_options(value, &SclOptions::default())
}

/// Infers the SCL type of a dynamic value.
///
/// Empty sequences take their element type from non-empty siblings in the
/// same list; when nothing constrains them, `options.empty_list_type` is used.
///
/// # Errors
///
/// Returns [`TypeError::HeterogeneousList`], [`TypeError::UnsupportedValue`],
/// [`TypeError::CyclicStructure`] or [`TypeError::NestingTooDeep`] for values
/// with no SCL type. Mapping contents are checked too, so a `null` anywhere
/// inside the value is an error.
pub fn infer_type_with_options(value: &Dynamic, options: &SclOptions) -> Result<TypeSpec> {
    let mut converter = Converter::new(options);
    let ty = converter.shape(value)?.finalize(&options.empty_list_type);
    // shapes stop at mappings; converting walks their fields
    converter.convert(value, &ty)?;
    Ok(ty)
}

/// Converts a dynamic mapping into a typed document.
///
/// # Errors
///
/// Fails if the root is not a mapping, if any nested value has no SCL type
/// (see [`infer_type_with_options`]), or if a mapping or sequence contains
/// itself. Errors name the offending location as a path like
/// `db.servers[1].host`.
///
/// # Examples
///
/// ```rust
/// use serde_scl::{scl, to_document, SclOptions, Value};
///
/// let doc = to_document(&scl!({ "port": 8080 }), &SclOptions::default()).unwrap();
/// assert_eq!(doc.get("port"), Some(&Value::Num(8080)));
/// ```
pub fn to_document(value: &Dynamic, options: &SclOptions) -> Result<Document> {
    let mut converter = Converter::new(options);
    match value {
        Dynamic::Map(map) => converter.document(map),
        other => Err(TypeError::unsupported(
            ROOT,
            &format!("top level must be a mapping, found {}", other.kind_name()),
        )
        .into()),
    }
}

const ROOT: &str = "<root>";

/// Inferred type before empty-list defaults are applied.
#[derive(Clone, Debug, PartialEq)]
enum Shape {
    Leaf(TypeSpec),
    /// `None` while every element seen so far was an empty list.
    List(Option<Box<Shape>>),
}

impl Shape {
    fn unify(&self, other: &Shape) -> Option<Shape> {
        match (self, other) {
            (Shape::Leaf(a), Shape::Leaf(b)) if a == b => Some(self.clone()),
            (Shape::Leaf(TypeSpec::Str), Shape::Leaf(TypeSpec::Multiline))
            | (Shape::Leaf(TypeSpec::Multiline), Shape::Leaf(TypeSpec::Str)) => {
                Some(Shape::Leaf(TypeSpec::Str))
            }
            (Shape::List(None), Shape::List(_)) => Some(other.clone()),
            (Shape::List(_), Shape::List(None)) => Some(self.clone()),
            (Shape::List(Some(a)), Shape::List(Some(b))) => {
                a.unify(b).map(|s| Shape::List(Some(Box::new(s))))
            }
            _ => None,
        }
    }

    fn finalize(self, empty: &TypeSpec) -> TypeSpec {
        match self {
            Shape::Leaf(ty) => ty,
            Shape::List(None) => TypeSpec::list(empty.clone()),
            Shape::List(Some(inner)) => TypeSpec::list(inner.finalize(empty)),
        }
    }

    fn describe(&self) -> String {
        match self {
            Shape::Leaf(ty) => ty.to_string(),
            Shape::List(None) => "list".to_string(),
            Shape::List(Some(inner)) => format!("list({})", inner.describe()),
        }
    }
}

enum Segment<'a> {
    Field(&'a str),
    Index(usize),
}

/// Walks a dynamic value, tracking the current path and the containers
/// currently being descended into.
struct Converter<'o> {
    options: &'o SclOptions,
    visiting: HashSet<usize>,
    path: String,
}

impl<'o> Converter<'o> {
    fn new(options: &'o SclOptions) -> Self {
        Converter {
            options,
            visiting: HashSet::new(),
            path: String::new(),
        }
    }

    fn path(&self) -> &str {
        if self.path.is_empty() {
            ROOT
        } else {
            &self.path
        }
    }

    fn at<T>(&mut self, segment: Segment<'_>, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let len = self.path.len();
        match segment {
            Segment::Field(name) => {
                if !self.path.is_empty() {
                    self.path.push('.');
                }
                self.path.push_str(name);
            }
            Segment::Index(i) => {
                self.path.push('[');
                self.path.push_str(&i.to_string());
                self.path.push(']');
            }
        }
        let result = f(self);
        self.path.truncate(len);
        result
    }

    /// Runs `f` with container `id` marked as visiting; the mark is removed
    /// when `f` returns, whatever the outcome.
    fn visit<T>(&mut self, id: usize, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        // the root mapping holds the top-level fields, so it does not count
        if self.visiting.len() > MAX_DEPTH {
            return Err(TypeError::too_deep(self.path()).into());
        }
        if !self.visiting.insert(id) {
            debug!(path = %self.path(), "cyclic structure detected");
            return Err(TypeError::CyclicStructure {
                path: self.path().to_string(),
            }
            .into());
        }
        let result = f(self);
        self.visiting.remove(&id);
        result
    }

    fn shape(&mut self, value: &Dynamic) -> Result<Shape> {
        match value {
            Dynamic::Null => Err(TypeError::unsupported(self.path(), "null").into()),
            Dynamic::Bool(_) => Ok(Shape::Leaf(TypeSpec::Bool)),
            Dynamic::Int(_) => Ok(Shape::Leaf(TypeSpec::Num)),
            Dynamic::Float(f) if f.is_finite() => Ok(Shape::Leaf(TypeSpec::Float)),
            Dynamic::Float(f) => {
                Err(TypeError::unsupported(self.path(), &format!("non-finite float {}", f)).into())
            }
            Dynamic::String(s) if s.contains('\n') && !s.contains('\'') => {
                Ok(Shape::Leaf(TypeSpec::Multiline))
            }
            Dynamic::String(_) => Ok(Shape::Leaf(TypeSpec::Str)),
            // fields are inferred when the mapping itself is converted
            Dynamic::Map(_) => Ok(Shape::Leaf(TypeSpec::Class)),
            Dynamic::Seq(seq) => self.visit(seq.id(), |this| this.seq_shape(seq)),
        }
    }

    fn seq_shape(&mut self, seq: &DynSeq) -> Result<Shape> {
        let items = seq.items();
        let mut unified: Option<Shape> = None;
        for (i, item) in items.iter().enumerate() {
            let shape = self.at(Segment::Index(i), |this| this.shape(item))?;
            unified = Some(match unified {
                None => shape,
                Some(prev) => prev.unify(&shape).ok_or_else(|| TypeError::HeterogeneousList {
                    path: self.path().to_string(),
                    expected: prev.describe(),
                    found: shape.describe(),
                })?,
            });
        }
        Ok(Shape::List(unified.map(Box::new)))
    }

    fn document(&mut self, map: &DynMap) -> Result<Document> {
        self.visit(map.id(), |this| {
            let entries = map.entries();
            let mut doc = Document::with_capacity(entries.len());
            for (name, item) in entries.iter() {
                let value = this.at(Segment::Field(name), |this| {
                    let ty = this.shape(item)?.finalize(&this.options.empty_list_type);
                    this.convert(item, &ty)
                })?;
                doc.insert(name.clone(), value);
            }
            Ok(doc)
        })
    }

    /// Converts a value whose type has already been inferred.
    fn convert(&mut self, value: &Dynamic, ty: &TypeSpec) -> Result<Value> {
        let converted = match (value, ty) {
            (Dynamic::Bool(b), TypeSpec::Bool) => Value::Bool(*b),
            (Dynamic::Int(n), TypeSpec::Num) => Value::Num(*n),
            (Dynamic::Float(f), TypeSpec::Float) => Value::Float(*f),
            (Dynamic::String(s), TypeSpec::Str) => Value::Str(s.clone()),
            (Dynamic::String(s), TypeSpec::Multiline) => Value::Multiline(s.clone()),
            (Dynamic::Map(map), TypeSpec::Class) => Value::Object(self.document(map)?),
            (Dynamic::Seq(seq), TypeSpec::List(element)) => {
                Value::List(self.visit(seq.id(), |this| this.list(seq, element))?)
            }
            (other, ty) => {
                return Err(TypeError::unsupported(
                    self.path(),
                    &format!("{} cannot be written as {}", other.kind_name(), ty),
                )
                .into())
            }
        };
        Ok(converted)
    }

    fn list(&mut self, seq: &DynSeq, element: &TypeSpec) -> Result<List> {
        let items = seq.items();
        let mut list = List::new(element.clone());
        for (i, item) in items.iter().enumerate() {
            let value = self.at(Segment::Index(i), |this| this.convert(item, element))?;
            list.push(value)?;
        }
        Ok(list)
    }
}
