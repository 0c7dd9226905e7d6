//! Recursive-descent parser from tokens to a [`Document`].
//!
//! The grammar, with `T` the declared type of the enclosing field:
//!
//! ```text
//! Document   := { FieldDecl } EndOfInput
//! FieldDecl  := FieldName '::' TypeSpec '{' ValueBody(T) '}'
//! FieldName  := Identifier | TypeKeyword | StringLiteral | NumberLiteral
//! TypeSpec   := bool | str | num | fl | ml | class | list '(' TypeSpec ')'
//! ValueBody  := Literal                                   T scalar
//!             | { FieldDecl }                             T = class
//!             | [ Element { ',' Element } [ ',' ] ]       T = list(E)
//! Element    := Literal                                   E scalar
//!             | '{' ValueBody(E) '}'                      E = class or list
//! ```
//!
//! Literal tokens in value position are handed to [`coerce`], so a literal of
//! the wrong kind surfaces as a [`TypeError`](crate::TypeError), while any
//! other unexpected token is a [`ParseError`].

use crate::error::ParseError;
use crate::lexer::{Keyword, Token, TokenKind};
use crate::validate::coerce;
use crate::{Document, List, Result, SclOptions, TypeSpec, Value, MAX_DEPTH};
use tracing::trace;

/// Parser over any fallible token stream, with one token of lookahead.
///
/// If the stream ends without an `EndOfInput` token, one is synthesized at
/// the position of the last token seen.
pub struct Parser<I>
where
    I: Iterator<Item = Result<Token>>,
{
    tokens: I,
    peeked: Option<Token>,
    last_position: (usize, usize),
    dedent_multiline: bool,
    depth: usize,
}

impl<I> Parser<I>
where
    I: Iterator<Item = Result<Token>>,
{
    pub fn new(tokens: I) -> Self {
        Parser {
            tokens,
            peeked: None,
            last_position: (1, 1),
            dedent_multiline: false,
            depth: 0,
        }
    }

    /// Applies the load-time settings of `options`.
    #[must_use]
    pub fn with_options(mut self, options: &SclOptions) -> Self {
        self.dedent_multiline = options.dedent_multiline;
        self
    }

    /// Parses a complete document.
    ///
    /// # Errors
    ///
    /// Returns the first lexical, grammar or type error encountered. Tokens
    /// following `EndOfInput` are rejected.
    pub fn parse_document(mut self) -> Result<Document> {
        let doc = self.parse_fields(false)?;
        self.advance()?;
        match self.tokens.next() {
            Some(token) => {
                let token = token?;
                Err(ParseError::unexpected_token(
                    "no tokens after end of input",
                    &token.kind.describe(),
                    token.line,
                    token.col,
                )
                .into())
            }
            None => Ok(doc),
        }
    }

    fn pull(&mut self) -> Result<Token> {
        let token = match self.tokens.next() {
            Some(token) => token?,
            None => {
                let (line, col) = self.last_position;
                Token::new(TokenKind::EndOfInput, line, col)
            }
        };
        self.last_position = (token.line, token.col);
        Ok(token)
    }

    fn peek(&mut self) -> Result<&Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.pull()?,
        };
        Ok(self.peeked.insert(token))
    }

    fn peek_kind(&mut self) -> Result<&TokenKind> {
        Ok(&self.peek()?.kind)
    }

    fn advance(&mut self) -> Result<Token> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.pull(),
        }
    }

    fn too_deep(&mut self) -> Result<crate::Error> {
        let token = self.peek()?;
        Ok(ParseError::NestingTooDeep {
            limit: MAX_DEPTH,
            line: token.line,
            col: token.col,
        }
        .into())
    }

    /// Runs `f` one nesting level deeper.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_DEPTH {
            return Err(self.too_deep()?);
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token> {
        let token = self.advance()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected(&token, expected))
        }
    }

    fn parse_fields(&mut self, in_class: bool) -> Result<Document> {
        let mut doc = Document::new();
        loop {
            let done = match self.peek_kind()? {
                TokenKind::EndOfInput => !in_class,
                TokenKind::BraceClose => in_class,
                _ => false,
            };
            if done {
                return Ok(doc);
            }
            self.parse_field(&mut doc)?;
        }
    }

    fn parse_field(&mut self, doc: &mut Document) -> Result<()> {
        let token = self.advance()?;
        let name = match token.kind {
            TokenKind::Identifier(name)
            | TokenKind::StringLiteral(name)
            | TokenKind::NumberLiteral(name) => name,
            TokenKind::TypeKeyword(keyword) => keyword.as_str().to_string(),
            _ => return Err(unexpected(&token, "field name")),
        };
        if doc.contains_key(&name) {
            return Err(ParseError::DuplicateField {
                name,
                line: token.line,
                col: token.col,
            }
            .into());
        }

        self.expect(TokenKind::DoubleColon, "'::'")?;
        let ty = self.parse_type()?;
        self.expect(TokenKind::BraceOpen, "'{'")?;
        let value = self.parse_body(&ty)?;
        self.expect(TokenKind::BraceClose, "'}'")?;

        trace!(field = %name, ty = %ty, line = token.line, "parsed field");
        doc.insert(name, value);
        Ok(())
    }

    /// Reads a type spec. `list(` prefixes are counted rather than recursed
    /// into, then closed in one pass.
    fn parse_type(&mut self) -> Result<TypeSpec> {
        let mut lists = 0;
        let mut ty = loop {
            let token = self.advance()?;
            let keyword = match token.kind {
                TokenKind::TypeKeyword(keyword) => keyword,
                _ => return Err(unexpected(&token, "type keyword")),
            };
            match keyword {
                Keyword::Bool => break TypeSpec::Bool,
                Keyword::Str => break TypeSpec::Str,
                Keyword::Num => break TypeSpec::Num,
                Keyword::Fl => break TypeSpec::Float,
                Keyword::Ml => break TypeSpec::Multiline,
                Keyword::Class => break TypeSpec::Class,
                Keyword::List => {
                    if lists >= MAX_DEPTH {
                        return Err(ParseError::NestingTooDeep {
                            limit: MAX_DEPTH,
                            line: token.line,
                            col: token.col,
                        }
                        .into());
                    }
                    self.expect(TokenKind::ParenOpen, "'('")?;
                    lists += 1;
                }
            }
        };
        for _ in 0..lists {
            self.expect(TokenKind::ParenClose, "')'")?;
            ty = TypeSpec::list(ty);
        }
        Ok(ty)
    }

    /// Parses what sits between a field's braces, leaving the `}` in place.
    fn parse_body(&mut self, ty: &TypeSpec) -> Result<Value> {
        match ty {
            TypeSpec::Class => self.nested(|this| this.parse_fields(true).map(Value::Object)),
            TypeSpec::List(element) => {
                self.nested(|this| this.parse_list_body(element).map(Value::List))
            }
            scalar => self.parse_scalar(scalar),
        }
    }

    fn parse_scalar(&mut self, ty: &TypeSpec) -> Result<Value> {
        let token = self.advance()?;
        if !token.kind.is_literal() {
            return Err(unexpected(&token, &format!("{} literal", ty)));
        }
        match coerce(ty, &token)? {
            Value::Multiline(text) if self.dedent_multiline => Ok(Value::Multiline(dedent(&text))),
            value => Ok(value),
        }
    }

    fn parse_list_body(&mut self, element: &TypeSpec) -> Result<List> {
        let mut list = List::new(element.clone());
        loop {
            if *self.peek_kind()? == TokenKind::BraceClose {
                return Ok(list);
            }
            list.push(self.parse_element(element)?)?;

            let separator = self.advance()?;
            match separator.kind {
                TokenKind::Comma => {}
                TokenKind::BraceClose => {
                    self.peeked = Some(separator);
                    return Ok(list);
                }
                _ => return Err(unexpected(&separator, "',' or '}'")),
            }
        }
    }

    fn parse_element(&mut self, element: &TypeSpec) -> Result<Value> {
        if element.is_scalar() {
            return self.parse_scalar(element);
        }
        self.expect(TokenKind::BraceOpen, "'{'")?;
        let value = self.parse_body(element)?;
        self.expect(TokenKind::BraceClose, "'}'")?;
        Ok(value)
    }
}

fn unexpected(token: &Token, expected: &str) -> crate::Error {
    match token.kind {
        TokenKind::EndOfInput => ParseError::unexpected_eof(expected, token.line, token.col),
        ref found => {
            ParseError::unexpected_token(expected, &found.describe(), token.line, token.col)
        }
    }
    .into()
}

/// Removes the common leading whitespace of every line after the first.
///
/// Blank lines do not count towards the common prefix.
fn dedent(text: &str) -> String {
    let mut lines = text.split('\n');
    let Some(first) = lines.next() else {
        return String::new();
    };
    let rest: Vec<&str> = lines.collect();

    let common = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_blanks(line))
        .min()
        .unwrap_or(0);

    let mut out = String::with_capacity(text.len());
    out.push_str(first);
    for line in rest {
        out.push('\n');
        out.push_str(&line[leading_blanks(line).min(common)..]);
    }
    out
}

fn leading_blanks(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Parses a token sequence into a document.
///
/// The sequence may omit the trailing `EndOfInput` token.
///
/// # Errors
///
/// Returns the first grammar or type error encountered.
///
/// # Examples
///
/// ```rust
/// use serde_scl::{parse, tokenize, Value};
///
/// let tokens = tokenize("on :: bool { yes }").unwrap();
/// let doc = parse(tokens).unwrap();
/// assert_eq!(doc.get("on"), Some(&Value::Bool(true)));
/// ```
pub fn parse<T>(tokens: T) -> Result<Document>
where
    T: IntoIterator<Item = Token>,
{
    Parser::new(tokens.into_iter().map(Ok)).parse_document()
}
