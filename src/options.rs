//! Configuration options for SCL reading and writing.
//!
//! [`SclOptions`] is passed to the `*_with_options` entry points. It controls
//! the indentation of serialized output, the element type given to empty
//! dynamic sequences (which carry no type information of their own), and
//! whether multiline strings are dedented on load.
//!
//! ## Examples
//!
//! ```rust
//! use serde_scl::{dumps_with_options, loads, SclOptions};
//!
//! let doc = loads("db :: class { port :: num { 5432 } }").unwrap();
//!
//! let options = SclOptions::new().with_indent(2);
//! let text = dumps_with_options(&doc, &options).unwrap();
//! assert_eq!(text, "db :: class {\n  port :: num { 5432 }\n}\n");
//! ```

use crate::TypeSpec;

/// Configuration options for SCL reading and writing.
///
/// # Examples
///
/// ```rust
/// use serde_scl::{SclOptions, TypeSpec};
///
/// let options = SclOptions::new()
///     .with_indent(2)
///     .with_empty_list_type(TypeSpec::Num)
///     .with_dedent_multiline(true);
/// assert_eq!(options.indent, 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SclOptions {
    /// Spaces per nesting level in serialized output.
    pub indent: usize,
    /// Element type of an empty dynamic sequence nothing else constrains.
    pub empty_list_type: TypeSpec,
    /// Strip common leading whitespace from continuation lines of `ml` values.
    pub dedent_multiline: bool,
}

impl Default for SclOptions {
    fn default() -> Self {
        SclOptions {
            indent: 4,
            empty_list_type: TypeSpec::Str,
            dedent_multiline: false,
        }
    }
}

impl SclOptions {
    /// Creates default options (4-space indent, `str` empty lists, verbatim `ml`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_scl::{SclOptions, TypeSpec};
    ///
    /// let options = SclOptions::new();
    /// assert_eq!(options.indent, 4);
    /// assert_eq!(options.empty_list_type, TypeSpec::Str);
    /// assert!(!options.dedent_multiline);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation size (number of spaces per level).
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the element type used for empty sequences in dynamic input.
    ///
    /// An empty sequence next to non-empty siblings takes their type instead;
    /// this only applies when nothing else constrains it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_scl::{dumps_with_options, scl, SclOptions, TypeSpec};
    ///
    /// let value = scl!({ "ports": [] });
    /// let options = SclOptions::new().with_empty_list_type(TypeSpec::Num);
    /// let text = dumps_with_options(&value, &options).unwrap();
    /// assert_eq!(text, "ports :: list(num) { }\n");
    /// ```
    #[must_use]
    pub fn with_empty_list_type(mut self, ty: TypeSpec) -> Self {
        self.empty_list_type = ty;
        self
    }

    /// Enables dedenting of multiline strings on load.
    ///
    /// The first line is kept as-is; the common leading whitespace of the
    /// remaining non-blank lines is removed.
    #[must_use]
    pub fn with_dedent_multiline(mut self, dedent: bool) -> Self {
        self.dedent_multiline = dedent;
        self
    }
}
