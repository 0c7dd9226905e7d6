//! Tokenizer for SCL text.
//!
//! [`Lexer`] is a lazy iterator: every call to `next()` advances past exactly
//! one token, skipping whitespace and `[ ... ]` comments on the way. It yields
//! [`TokenKind::EndOfInput`] once and then `None`. After an error it yields
//! nothing further.
//!
//! ## Examples
//!
//! ```rust
//! use serde_scl::lexer::{tokenize, Keyword, TokenKind};
//!
//! let tokens = tokenize("port :: num { 8080 } [ http ]").unwrap();
//! let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Identifier("port".into()),
//!         TokenKind::DoubleColon,
//!         TokenKind::TypeKeyword(Keyword::Num),
//!         TokenKind::BraceOpen,
//!         TokenKind::NumberLiteral("8080".into()),
//!         TokenKind::BraceClose,
//!         TokenKind::EndOfInput,
//!     ]
//! );
//! ```

use crate::error::LexError;
use crate::Result;
use std::fmt;

type LexResult<T> = std::result::Result<T, LexError>;

/// One of the seven type words.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Bool,
    Str,
    Num,
    Fl,
    Ml,
    Class,
    List,
}

impl Keyword {
    /// Looks up a type word. Matching is case-sensitive.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "bool" => Some(Keyword::Bool),
            "str" => Some(Keyword::Str),
            "num" => Some(Keyword::Num),
            "fl" => Some(Keyword::Fl),
            "ml" => Some(Keyword::Ml),
            "class" => Some(Keyword::Class),
            "list" => Some(Keyword::List),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Keyword::Bool => "bool",
            Keyword::Str => "str",
            Keyword::Num => "num",
            Keyword::Fl => "fl",
            Keyword::Ml => "ml",
            Keyword::Class => "class",
            Keyword::List => "list",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a token, with its payload.
///
/// Numeric literals keep their raw text; the type validator decides how to
/// read them once the declared type is known.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    TypeKeyword(Keyword),
    DoubleColon,
    BraceOpen,
    BraceClose,
    ParenOpen,
    ParenClose,
    Comma,
    StringLiteral(String),
    MultilineStringLiteral(String),
    NumberLiteral(String),
    FloatLiteral(String),
    BooleanLiteral(bool),
    EndOfInput,
}

impl TokenKind {
    /// Returns `true` for the five literal kinds.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::StringLiteral(_)
                | TokenKind::MultilineStringLiteral(_)
                | TokenKind::NumberLiteral(_)
                | TokenKind::FloatLiteral(_)
                | TokenKind::BooleanLiteral(_)
        )
    }

    /// Short description used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Identifier(name) => format!("identifier '{}'", name),
            TokenKind::TypeKeyword(k) => format!("type keyword '{}'", k),
            TokenKind::DoubleColon => "'::'".to_string(),
            TokenKind::BraceOpen => "'{'".to_string(),
            TokenKind::BraceClose => "'}'".to_string(),
            TokenKind::ParenOpen => "'('".to_string(),
            TokenKind::ParenClose => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::StringLiteral(_) => "string literal".to_string(),
            TokenKind::MultilineStringLiteral(_) => "multiline string literal".to_string(),
            TokenKind::NumberLiteral(raw) => format!("number literal {}", raw),
            TokenKind::FloatLiteral(raw) => format!("float literal {}", raw),
            TokenKind::BooleanLiteral(b) => format!("boolean literal {}", b),
            TokenKind::EndOfInput => "end of input".to_string(),
        }
    }
}

/// A token with the 1-based position of its first character.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, line: usize, col: usize) -> Self {
        Token { kind, line, col }
    }
}

/// Lazy tokenizer over a borrowed string.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            position: 0,
            line: 1,
            column: 1,
            done: false,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.position..].chars().nth(1)
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Skips whitespace and comments up to the start of the next token.
    fn skip_trivia(&mut self) -> LexResult<()> {
        loop {
            match self.peek_char() {
                Some(ch) if ch.is_whitespace() => {
                    self.next_char();
                }
                Some('[') => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_comment(&mut self) -> LexResult<()> {
        let (line, col) = (self.line, self.column);
        self.next_char();
        let mut depth = 1usize;
        while depth > 0 {
            match self.next_char() {
                Some('[') => depth += 1,
                Some(']') => depth -= 1,
                Some(_) => {}
                None => return Err(LexError::UnterminatedComment { line, col }),
            }
        }
        Ok(())
    }

    fn lex_string(&mut self, line: usize, col: usize) -> LexResult<TokenKind> {
        self.next_char(); // opening quote
        let mut result = String::new();

        loop {
            let (esc_line, esc_col) = (self.line, self.column);
            match self.next_char() {
                None => return Err(LexError::UnterminatedString { line, col }),
                Some('"') => return Ok(TokenKind::StringLiteral(result)),
                Some('\\') => match self.next_char() {
                    None => return Err(LexError::UnterminatedString { line, col }),
                    Some('n') => result.push('\n'),
                    Some('t') => result.push('\t'),
                    Some('r') => result.push('\r'),
                    Some('0') => result.push('\0'),
                    Some('b') => result.push('\u{0008}'),
                    Some('f') => result.push('\u{000C}'),
                    Some('u') => result.push(self.lex_unicode_escape(esc_line, esc_col)?),
                    // covers \" \\ \' \/ and any unknown escape
                    Some(other) => result.push(other),
                },
                Some(ch) => result.push(ch),
            }
        }
    }

    fn lex_unicode_escape(&mut self, line: usize, col: usize) -> LexResult<char> {
        let mut code_point = 0u32;
        for _ in 0..4 {
            match self.peek_char().and_then(|ch| ch.to_digit(16)) {
                Some(digit) => {
                    self.next_char();
                    code_point = code_point * 16 + digit;
                }
                None => {
                    return Err(LexError::InvalidEscape {
                        line,
                        col,
                        msg: "expected 4 hex digits after \\u".to_string(),
                    })
                }
            }
        }
        char::from_u32(code_point).ok_or_else(|| LexError::InvalidEscape {
            line,
            col,
            msg: format!("\\u{:04X} is not a valid character", code_point),
        })
    }

    fn lex_multiline(&mut self, line: usize, col: usize) -> LexResult<TokenKind> {
        self.next_char(); // opening quote
        let start = self.position;
        loop {
            match self.next_char() {
                None => return Err(LexError::UnterminatedMultiline { line, col }),
                Some('\'') => {
                    let end = self.position - 1;
                    return Ok(TokenKind::MultilineStringLiteral(
                        self.input[start..end].to_string(),
                    ));
                }
                Some(_) => {}
            }
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        let start = self.position;
        let negative = self.peek_char() == Some('-');
        if negative {
            self.next_char();
        }
        self.eat_while(|ch| ch.is_ascii_digit());

        // `2fa` is a name, not a number followed by garbage
        if !negative && matches!(self.peek_char(), Some(ch) if ch.is_alphabetic() || ch == '_') {
            self.eat_while(is_word_char);
            return self.word(start);
        }

        if self.peek_char() == Some('.')
            && matches!(self.peek_second(), Some(ch) if ch.is_ascii_digit())
        {
            self.next_char();
            self.eat_while(|ch| ch.is_ascii_digit());
            return TokenKind::FloatLiteral(self.input[start..self.position].to_string());
        }

        TokenKind::NumberLiteral(self.input[start..self.position].to_string())
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while matches!(self.peek_char(), Some(ch) if pred(ch)) {
            self.next_char();
        }
    }

    fn word(&self, start: usize) -> TokenKind {
        let word = &self.input[start..self.position];
        match word {
            "true" | "yes" => TokenKind::BooleanLiteral(true),
            "false" | "no" => TokenKind::BooleanLiteral(false),
            _ => match Keyword::from_word(word) {
                Some(keyword) => TokenKind::TypeKeyword(keyword),
                None => TokenKind::Identifier(word.to_string()),
            },
        }
    }

    fn next_token(&mut self) -> LexResult<Token> {
        self.skip_trivia()?;
        let (line, col) = (self.line, self.column);

        let Some(ch) = self.peek_char() else {
            return Ok(Token::new(TokenKind::EndOfInput, line, col));
        };

        let kind = match ch {
            '{' => self.single(TokenKind::BraceOpen),
            '}' => self.single(TokenKind::BraceClose),
            '(' => self.single(TokenKind::ParenOpen),
            ')' => self.single(TokenKind::ParenClose),
            ',' => self.single(TokenKind::Comma),
            ':' if self.peek_second() == Some(':') => {
                self.next_char();
                self.next_char();
                TokenKind::DoubleColon
            }
            '"' => self.lex_string(line, col)?,
            '\'' => self.lex_multiline(line, col)?,
            '-' if matches!(self.peek_second(), Some(c) if c.is_ascii_digit()) => self.lex_number(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if c.is_alphabetic() || c == '_' => {
                let start = self.position;
                self.eat_while(is_word_char);
                self.word(start)
            }
            found => return Err(LexError::UnexpectedCharacter { found, line, col }),
        };

        Ok(Token::new(kind, line, col))
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.next_char();
        kind
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-'
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_token() {
            Ok(token) => {
                if token.kind == TokenKind::EndOfInput {
                    self.done = true;
                }
                Some(Ok(token))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Tokenizes the whole input, ending with a single `EndOfInput` token.
///
/// # Errors
///
/// Returns the first [`LexError`] encountered.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    Lexer::new(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn lex_err(text: &str) -> LexError {
        match tokenize(text) {
            Err(Error::Lex(e)) => e,
            other => panic!("expected lex error, got {other:?}"),
        }
    }

    #[test]
    fn test_list_type_tokens() {
        assert_eq!(
            kinds("xs :: list(fl) { 1.5, -2 }"),
            vec![
                TokenKind::Identifier("xs".into()),
                TokenKind::DoubleColon,
                TokenKind::TypeKeyword(Keyword::List),
                TokenKind::ParenOpen,
                TokenKind::TypeKeyword(Keyword::Fl),
                TokenKind::ParenClose,
                TokenKind::BraceOpen,
                TokenKind::FloatLiteral("1.5".into()),
                TokenKind::Comma,
                TokenKind::NumberLiteral("-2".into()),
                TokenKind::BraceClose,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_positions_are_one_based() {
        let tokens = tokenize("a :: bool\n  { yes }").unwrap();
        let positions: Vec<_> = tokens.iter().map(|t| (t.line, t.col)).collect();
        assert_eq!(
            positions,
            vec![(1, 1), (1, 3), (1, 6), (2, 3), (2, 5), (2, 9), (2, 10)]
        );
    }

    #[test]
    fn test_boolean_spellings() {
        assert_eq!(
            kinds("true false yes no True"),
            vec![
                TokenKind::BooleanLiteral(true),
                TokenKind::BooleanLiteral(false),
                TokenKind::BooleanLiteral(true),
                TokenKind::BooleanLiteral(false),
                TokenKind::Identifier("True".into()),
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_nested_comments_are_skipped() {
        assert_eq!(
            kinds("[ outer [ inner ] still outer ] x"),
            vec![TokenKind::Identifier("x".into()), TokenKind::EndOfInput]
        );
        assert_eq!(
            lex_err("x [ open [ ]"),
            LexError::UnterminatedComment { line: 1, col: 3 }
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\"b\\c\nd\té\q""#)[0],
            TokenKind::StringLiteral("a\"b\\c\nd\téq".into())
        );
        assert_eq!(
            kinds(r#""\'\/""#)[0],
            TokenKind::StringLiteral("'/".into())
        );
    }

    #[test]
    fn test_invalid_unicode_escape() {
        assert!(matches!(
            lex_err(r#""\u12G4""#),
            LexError::InvalidEscape { line: 1, col: 2, .. }
        ));
        assert!(matches!(
            lex_err(r#""\uD800""#),
            LexError::InvalidEscape { .. }
        ));
    }

    #[test]
    fn test_unterminated_strings_report_opening_quote() {
        assert_eq!(
            lex_err("x :: str {\n  \"abc"),
            LexError::UnterminatedString { line: 2, col: 3 }
        );
        assert_eq!(
            lex_err("x :: ml { 'abc"),
            LexError::UnterminatedMultiline { line: 1, col: 11 }
        );
    }

    #[test]
    fn test_multiline_is_verbatim() {
        assert_eq!(
            kinds("'  a\\n\n\tb '")[0],
            TokenKind::MultilineStringLiteral("  a\\n\n\tb ".into())
        );
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(
            kinds("0 -17 3.25 -0.5 007"),
            vec![
                TokenKind::NumberLiteral("0".into()),
                TokenKind::NumberLiteral("-17".into()),
                TokenKind::FloatLiteral("3.25".into()),
                TokenKind::FloatLiteral("-0.5".into()),
                TokenKind::NumberLiteral("007".into()),
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_digit_led_identifier() {
        assert_eq!(
            kinds("2fa-code"),
            vec![TokenKind::Identifier("2fa-code".into()), TokenKind::EndOfInput]
        );
    }

    #[test]
    fn test_unexpected_characters() {
        assert_eq!(
            lex_err("a : num"),
            LexError::UnexpectedCharacter {
                found: ':',
                line: 1,
                col: 3
            }
        );
        assert_eq!(
            lex_err("- 1"),
            LexError::UnexpectedCharacter {
                found: '-',
                line: 1,
                col: 1
            }
        );
        assert!(matches!(
            lex_err("1.x"),
            LexError::UnexpectedCharacter { found: '.', .. }
        ));
    }

    #[test]
    fn test_end_of_input_once_and_fused_after_error() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next().unwrap().unwrap().kind, TokenKind::EndOfInput);
        assert!(lexer.next().is_none());

        let mut lexer = Lexer::new("a @ b");
        assert!(lexer.next().unwrap().is_ok());
        assert!(lexer.next().unwrap().is_err());
        assert!(lexer.next().is_none());
    }
}
