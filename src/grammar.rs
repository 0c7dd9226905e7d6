//! SCL Format Reference
//!
//! This module documents the SCL text format as implemented by this library.
//!
//! # Overview
//!
//! An SCL document is a sequence of field declarations. Every field names
//! its type explicitly, so a document can be validated without a schema:
//!
//! ```text
//! name :: type { value }
//! ```
//!
//! # Lexical Structure
//!
//! ## Whitespace and Comments
//!
//! Whitespace (including newlines) only separates tokens. Comments are
//! enclosed in square brackets, may span lines, and nest:
//!
//! ```text
//! [ a comment [ with a nested part ] still a comment ]
//! port :: num { 8080 } [ trailing comment ]
//! ```
//!
//! An unclosed `[` is an error.
//!
//! ## Literals
//!
//! | Kind      | Syntax                         | Example            |
//! |-----------|--------------------------------|--------------------|
//! | Boolean   | `true`, `false`, `yes`, `no`   | `yes`              |
//! | Number    | optional `-`, digits           | `-42`              |
//! | Float     | number, `.`, at least one digit| `3.25`             |
//! | String    | double-quoted, with escapes    | `"a\tb"`           |
//! | Multiline | single-quoted, verbatim        | `'line 1`↵`line 2'`|
//!
//! Boolean words are case-sensitive. `-` must be immediately followed by a
//! digit and `.` must be followed by a digit, so `1.` is not a float.
//!
//! String escapes: `\n \t \r \" \\ \' \/ \0 \b \f \uXXXX`. Any other escaped
//! character stands for itself. Raw line breaks inside a string are kept.
//!
//! Multiline strings have no escapes at all: everything between the quotes,
//! including leading indentation and line breaks, is the value. A multiline
//! string therefore cannot contain `'`.
//!
//! ## Names
//!
//! Identifiers start with a letter or `_` and continue with letters, digits,
//! `_` or `-`. A run of digits directly followed by a letter is also an
//! identifier (`2fa`). The type words `bool str num fl ml class list` are
//! reserved as type keywords, but may still be used as field names.
//!
//! # Grammar
//!
//! ```text
//! Document   := { FieldDecl } EndOfInput
//! FieldDecl  := FieldName '::' TypeSpec '{' ValueBody '}'
//! FieldName  := Identifier | TypeKeyword | StringLiteral | NumberLiteral
//! TypeSpec   := bool | str | num | fl | ml | class | list '(' TypeSpec ')'
//! ValueBody  := Literal                                 scalar type
//!             | { FieldDecl }                           class
//!             | [ Element { ',' Element } [ ',' ] ]     list(T), may be empty
//! Element    := Literal                                 T scalar
//!             | '{' ValueBody(T) '}'                    T is class or list
//! ```
//!
//! # Types
//!
//! | Type       | Accepts                                  |
//! |------------|------------------------------------------|
//! | `bool`     | boolean literal                          |
//! | `str`      | string literal                           |
//! | `num`      | number literal within 64-bit signed range|
//! | `fl`       | number or float literal, finite          |
//! | `ml`       | multiline literal                        |
//! | `class`    | nested field declarations                |
//! | `list(T)`  | comma-separated elements of type `T`     |
//!
//! Classes, lists and `list(` type specs nest at most
//! [`MAX_DEPTH`](crate::MAX_DEPTH) levels deep.
//!
//! `num` never accepts a float literal, even `1.0`. Field names must be
//! unique within one class (or at the top level); the same name may appear
//! in different classes.
//!
//! # Canonical Output
//!
//! ```text
//! name :: str { "text" }
//! count :: num { -42 }
//! ratio :: fl { 2.0 }
//! on :: bool { true }
//! desc :: ml {
//!     'verbatim
//! content'
//! }
//! db :: class {
//!     port :: num { 5432 }
//! }
//! empty :: class { }
//! ports :: list(num) { 1, 2, 3 }
//! none :: list(str) { }
//! grid :: list(list(num)) { { 1, 2 }, { } }
//! servers :: list(class) {
//!     {
//!         host :: str { "a" }
//!     },
//!     { }
//! }
//! ```
//!
//! - Indentation is 4 spaces per level by default
//!   ([`SclOptions::with_indent`](crate::SclOptions::with_indent)).
//! - Floats always contain a `.`; booleans are always `true`/`false`.
//! - Names matching `[A-Za-z_][A-Za-z0-9_-]*` are written bare unless they
//!   are boolean words; all other names are quoted.
//! - Strings escape `\\ \" \n \r \t`, and other control characters as
//!   `\uXXXX`.
//! - Lists whose element type contains `class` put each element on its own
//!   line; all other lists are written inline.
//! - Every field ends with a newline. An empty document is the empty string.
