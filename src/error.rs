//! Error types for SCL parsing and serialization.
//!
//! Every failure aborts the whole `loads`/`dumps` call; nothing is partially
//! recovered. Errors are grouped the way the pipeline is:
//!
//! - **[`LexError`]**: the text could not be split into tokens (unterminated
//!   strings or comments, stray characters). Always carries line/column.
//! - **[`ParseError`]**: the tokens do not follow the grammar (missing `::`,
//!   unknown type keyword, duplicate field, premature end of input).
//! - **[`TypeError`]**: a value does not conform to its declared type, or a
//!   dynamic host value has no SCL representation.
//!
//! Nesting is capped at [`MAX_DEPTH`](crate::MAX_DEPTH) levels on every path,
//! so deep input fails with `NestingTooDeep` instead of exhausting the stack.
//!
//! ## Examples
//!
//! ```rust
//! use serde_scl::{loads, Error, TypeError};
//!
//! let err = loads(r#"age :: num { "30" }"#).unwrap_err();
//! assert!(matches!(err, Error::Type(TypeError::Mismatch { .. })));
//! assert!(err.to_string().contains("line 1"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The text could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The token stream does not match the grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A value does not conform to its type, or cannot be represented.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error raised through serde
    #[error("Error: {0}")]
    Custom(String),
}

/// Tokenizer failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unterminated string starting at line {line}, column {col}")]
    UnterminatedString { line: usize, col: usize },

    #[error("Unterminated multiline string starting at line {line}, column {col}")]
    UnterminatedMultiline { line: usize, col: usize },

    #[error("Unterminated comment starting at line {line}, column {col}")]
    UnterminatedComment { line: usize, col: usize },

    #[error("Unexpected character {found:?} at line {line}, column {col}")]
    UnexpectedCharacter { found: char, line: usize, col: usize },

    #[error("Invalid escape sequence at line {line}, column {col}: {msg}")]
    InvalidEscape {
        line: usize,
        col: usize,
        msg: String,
    },
}

/// Grammar failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unexpected token at line {line}, column {col}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        col: usize,
    },

    #[error("Unexpected end of input at line {line}, column {col}: expected {expected}")]
    UnexpectedEndOfInput {
        expected: String,
        line: usize,
        col: usize,
    },

    #[error("Duplicate field '{name}' at line {line}, column {col}")]
    DuplicateField { name: String, line: usize, col: usize },

    /// Classes, lists or `list(` types nested deeper than [`MAX_DEPTH`](crate::MAX_DEPTH).
    #[error("Nesting deeper than {limit} levels at line {line}, column {col}")]
    NestingTooDeep { limit: usize, line: usize, col: usize },
}

/// Type conformance and representability failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// A literal of the wrong kind for the declared type.
    #[error("Type mismatch at line {line}, column {col}: expected {expected}, found {found}")]
    Mismatch {
        expected: String,
        found: String,
        line: usize,
        col: usize,
    },

    /// A numeric literal that does not fit the declared type.
    #[error("Number out of range at line {line}, column {col}: {literal} does not fit {ty}")]
    NumberOutOfRange {
        literal: String,
        ty: String,
        line: usize,
        col: usize,
    },

    /// A value pushed into a [`List`](crate::List) whose element type it does not match.
    #[error("List element {index} has type {found}, expected {expected}")]
    ElementMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Heterogeneous list at {path}: expected {expected} elements, found {found}")]
    HeterogeneousList {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Unsupported value at {path}: {found}")]
    UnsupportedValue { path: String, found: String },

    #[error("Cyclic structure at {path}")]
    CyclicStructure { path: String },

    /// A value nested deeper than [`MAX_DEPTH`](crate::MAX_DEPTH).
    #[error("Nesting deeper than {limit} levels at {path}")]
    NestingTooDeep { path: String, limit: usize },
}

impl LexError {
    /// Returns the 1-based `(line, column)` the error points at.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        match self {
            LexError::UnterminatedString { line, col }
            | LexError::UnterminatedMultiline { line, col }
            | LexError::UnterminatedComment { line, col }
            | LexError::UnexpectedCharacter { line, col, .. }
            | LexError::InvalidEscape { line, col, .. } => (*line, *col),
        }
    }
}

impl ParseError {
    /// Creates an unexpected-token error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_scl::ParseError;
    ///
    /// let err = ParseError::unexpected_token("'::'", "'{'", 3, 9);
    /// assert!(err.to_string().contains("expected '::'"));
    /// ```
    pub fn unexpected_token(expected: &str, found: &str, line: usize, col: usize) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
            line,
            col,
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(expected: &str, line: usize, col: usize) -> Self {
        ParseError::UnexpectedEndOfInput {
            expected: expected.to_string(),
            line,
            col,
        }
    }

    /// Returns the 1-based `(line, column)` the error points at.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        match self {
            ParseError::UnexpectedToken { line, col, .. }
            | ParseError::UnexpectedEndOfInput { line, col, .. }
            | ParseError::DuplicateField { line, col, .. }
            | ParseError::NestingTooDeep { line, col, .. } => (*line, *col),
        }
    }
}

impl TypeError {
    /// Creates a literal/type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_scl::TypeError;
    ///
    /// let err = TypeError::mismatch("num", "string literal", 5, 10);
    /// assert!(err.to_string().contains("expected num"));
    /// ```
    pub fn mismatch(expected: &str, found: &str, line: usize, col: usize) -> Self {
        TypeError::Mismatch {
            expected: expected.to_string(),
            found: found.to_string(),
            line,
            col,
        }
    }

    /// Creates an error for a value nested past [`MAX_DEPTH`](crate::MAX_DEPTH).
    pub fn too_deep(path: &str) -> Self {
        TypeError::NestingTooDeep {
            path: path.to_string(),
            limit: crate::MAX_DEPTH,
        }
    }

    /// Creates an unsupported-value error for something SCL cannot represent.
    pub fn unsupported(path: &str, found: &str) -> Self {
        TypeError::UnsupportedValue {
            path: path.to_string(),
            found: found.to_string(),
        }
    }
}

impl Error {
    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_scl::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the source position for lexical, grammar and literal errors.
    ///
    /// Errors raised while converting host values carry a path instead and
    /// return `None`.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Lex(e) => Some(e.position()),
            Error::Parse(e) => Some(e.position()),
            Error::Type(TypeError::Mismatch { line, col, .. })
            | Error::Type(TypeError::NumberOutOfRange { line, col, .. }) => Some((*line, *col)),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
