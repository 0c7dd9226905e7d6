//! # serde_scl
//!
//! A reader/writer for SCL, a small statically-typed configuration format,
//! with a Serde bridge.
//!
//! ## What is SCL?
//!
//! Every SCL field declares a name, an explicit type and a braced value:
//!
//! ```text
//! [ comments are bracketed and may nest ]
//! name :: str { "api" }
//! port :: num { 8080 }
//! ratio :: fl { 0.75 }
//! debug :: bool { yes }
//! banner :: ml {
//!     'verbatim text
//! over several lines'
//! }
//! db :: class {
//!     hosts :: list(str) { "a", "b" }
//! }
//! ```
//!
//! Types are checked while parsing, so `port :: num { "8080" }` is an error
//! rather than a string that happens to look like a number.
//!
//! ## Key Features
//!
//! - **Typed documents**: [`loads`] produces a [`Document`] whose values keep
//!   their declared types, including the element type of empty lists
//! - **Canonical output**: [`dumps`] writes one canonical layout, so
//!   `dumps(loads(text))` is stable
//! - **Serde Compatible**: [`to_string`] / [`from_str`] work with any
//!   `#[derive(Serialize, Deserialize)]` type
//! - **Dynamic values**: [`Dynamic`] and the [`scl!`] macro build untyped
//!   host data whose SCL types are inferred on output
//! - **Precise errors**: lexical, grammar and type errors carry line and
//!   column; conversion errors carry a path such as `db.servers[1].host`
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_scl::{dumps, loads, Value};
//!
//! let doc = loads("db :: class { port :: num { 5432 } }").unwrap();
//! let db = doc.get("db").and_then(Value::as_document).unwrap();
//! assert_eq!(db.get("port"), Some(&Value::Num(5432)));
//!
//! assert_eq!(dumps(&doc).unwrap(), "db :: class {\n    port :: num { 5432 }\n}\n");
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_scl::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! let user = User { id: 7, name: "Alice".into(), tags: vec!["admin".into()] };
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, "id :: num { 7 }\nname :: str { \"Alice\" }\ntags :: list(str) { \"admin\" }\n");
//!
//! let back: User = from_str(&text).unwrap();
//! assert_eq!(user, back);
//! ```
//!
//! ### Dynamic Values with scl! Macro
//!
//! ```rust
//! use serde_scl::{dumps, scl};
//!
//! let data = scl!({
//!     "name": "Alice",
//!     "scores": [1.5, 2.0]
//! });
//! let text = dumps(&data).unwrap();
//! assert!(text.contains("scores :: list(fl) { 1.5, 2.0 }"));
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (no subscriber is installed): `debug`
//! when a document is loaded or dumped and when a cyclic structure is
//! rejected, `trace` for every parsed field.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - loading and dumping a config file
//! - **`macro.rs`** - building values with the scl! macro
//! - **`dynamic_values.rs`** - type inference for host values
//! - **`custom_options.rs`** - indentation, empty lists and dedent
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod document;
pub mod dynamic;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod macros;
pub mod options;
pub mod parser;
pub mod ser;
pub mod validate;
pub mod value;

pub use de::from_document;
pub use document::Document;
pub use dynamic::{DynMap, DynSeq, Dynamic};
pub use error::{Error, LexError, ParseError, Result, TypeError};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use options::SclOptions;
pub use parser::{parse, Parser};
pub use ser::{to_dynamic, DynamicSerializer, Serializer, ToDocument};
pub use validate::{coerce, infer_type, infer_type_with_options, to_document};
pub use value::{List, TypeSpec, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use tracing::debug;

/// Deepest nesting of classes and lists accepted when parsing, converting or
/// writing. The same bound applies to `list(...)` type specs.
pub const MAX_DEPTH: usize = 128;

/// Parses SCL text into a typed document.
///
/// # Errors
///
/// Returns the first [`LexError`], [`ParseError`] or [`TypeError`] found;
/// all of them carry the line and column of the offending input.
///
/// # Examples
///
/// ```rust
/// use serde_scl::{loads, Value};
///
/// let doc = loads("ports :: list(num) { 80, 443 }").unwrap();
/// assert_eq!(doc.get("ports").and_then(Value::as_list).map(|l| l.len()), Some(2));
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn loads(text: &str) -> Result<Document> {
    loads_with_options(text, &SclOptions::default())
}

/// Parses SCL text into a typed document with custom options.
///
/// # Errors
///
/// See [`loads`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn loads_with_options(text: &str, options: &SclOptions) -> Result<Document> {
    let doc = Parser::new(Lexer::new(text))
        .with_options(options)
        .parse_document()?;
    debug!(fields = doc.len(), bytes = text.len(), "loaded document");
    Ok(doc)
}

/// Writes a document, or a dynamic mapping, as canonical SCL text.
///
/// # Errors
///
/// Fails with a [`TypeError`] if the input has no SCL representation:
/// heterogeneous lists, nulls, non-finite floats, cycles, or a
/// non-mapping root.
///
/// # Examples
///
/// ```rust
/// use serde_scl::{dumps, loads};
///
/// let doc = loads("on :: bool { yes }").unwrap();
/// assert_eq!(dumps(&doc).unwrap(), "on :: bool { true }\n");
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn dumps<D>(value: &D) -> Result<String>
where
    D: ToDocument + ?Sized,
{
    dumps_with_options(value, &SclOptions::default())
}

/// Writes a document, or a dynamic mapping, as SCL text with custom options.
///
/// # Errors
///
/// See [`dumps`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn dumps_with_options<D>(value: &D, options: &SclOptions) -> Result<String>
where
    D: ToDocument + ?Sized,
{
    let doc = value.to_document_with(options)?;
    let mut serializer = Serializer::new(options.clone());
    serializer.serialize_document(&doc)?;
    let text = serializer.into_inner();
    debug!(fields = doc.len(), bytes = text.len(), "dumped document");
    Ok(text)
}

/// Serialize any `T: Serialize` to an SCL string.
///
/// The value must serialize as a map or struct; its fields become the
/// top-level SCL fields.
///
/// # Errors
///
/// Returns an error if the value has no SCL representation (for example a
/// `None` field, which SCL cannot express; skip it with
/// `#[serde(skip_serializing_if = "Option::is_none")]`).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &SclOptions::default())
}

/// Serialize any `T: Serialize` to an SCL string with custom options.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_scl::{to_string_with_options, SclOptions};
///
/// #[derive(Serialize)]
/// struct Db { port: u16 }
/// #[derive(Serialize)]
/// struct Config { db: Db }
///
/// let options = SclOptions::new().with_indent(2);
/// let text = to_string_with_options(&Config { db: Db { port: 1 } }, &options).unwrap();
/// assert_eq!(text, "db :: class {\n  port :: num { 1 }\n}\n");
/// ```
///
/// # Errors
///
/// See [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &SclOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    dumps_with_options(&to_dynamic(value)?, options)
}

/// Serialize any `T: Serialize` to a writer in SCL format.
///
/// # Examples
///
/// ```rust
/// use serde_scl::{scl, to_writer};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &scl!({ "n": 1 })).unwrap();
/// assert_eq!(buffer, b"n :: num { 1 }\n");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &SclOptions::default())
}

/// Serialize any `T: Serialize` to a writer in SCL format with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &SclOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from a string of SCL text.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_scl::from_str;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x :: num { 1 } y :: num { 2 }").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid SCL or cannot be deserialized
/// to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_document(loads(s)?)
}

/// Deserialize an instance of type `T` from an I/O stream of SCL.
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid SCL, or the data
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of SCL text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid SCL, or
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}
