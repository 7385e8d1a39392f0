//! Streaming JSON tokens.
//!
//! The codecs never see JSON text. They drive a [`JsonRead`] to pull tokens and a [`JsonWrite`]
//! to push them, which keeps the codec layer independent of where the JSON comes from or goes.
//!
//! Three implementations are provided:
//! - [`TextReader`], a pull tokenizer over a `&str`,
//! - [`TextWriter`], which renders compact or indented JSON text,
//! - [`TreeWriter`], which captures tokens as an in-memory [`Json`] tree. The map codec uses it
//!   to inspect the shape of encoded keys before committing them to the output.
//!
//! # Example
//! ```rust
//! use imjson::stream::*;
//!
//! let mut w = TextWriter::new();
//! w.begin_array().unwrap();
//! w.number(1u8.into()).unwrap();
//! w.string("two").unwrap();
//! w.end_array().unwrap();
//! let text = w.finish().unwrap();
//! assert_eq!(text, r#"[1,"two"]"#);
//!
//! let mut r = TextReader::new(&text);
//! r.begin_array().unwrap();
//! assert_eq!(r.peek(), Ok(Token::Num));
//! assert_eq!(r.next_number().map(|n| n == 1), Ok(true));
//! assert_eq!(r.next_str(), Ok("two".to_string()));
//! assert_eq!(r.has_next(), Ok(false));
//! r.end_array().unwrap();
//! assert_eq!(r.peek(), Ok(Token::End));
//! ```
use crate::Number;
use std::{error, fmt};

mod lex;
mod reader;
mod tree;
mod writer;

pub use reader::{TextReader, MAX_DEPTH};
pub use tree::{write_tree, Json, TreeWriter};
pub use writer::TextWriter;

/// The kind of the next token in a stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Token {
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    /// An object member name.
    Name,
    Str,
    Num,
    Bool,
    Null,
    /// The end of the document.
    End,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Token::BeginArray => "'['",
            Token::EndArray => "']'",
            Token::BeginObject => "'{'",
            Token::EndObject => "'}'",
            Token::Name => "a name",
            Token::Str => "a string",
            Token::Num => "a number",
            Token::Bool => "a boolean",
            Token::Null => "null",
            Token::End => "end of document",
        };
        f.write_str(s)
    }
}

/// A pull source of JSON tokens.
///
/// Calls must follow the document structure: `begin_array` only when [`peek`] reports
/// [`Token::BeginArray`], names only inside objects, and so on. Reading the wrong token is an
/// [`Error::Unexpected`].
///
/// [`peek`]: JsonRead::peek
pub trait JsonRead {
    /// The kind of the next token, without consuming it.
    fn peek(&mut self) -> Result<Token, Error>;

    /// Consumes `[`.
    fn begin_array(&mut self) -> Result<(), Error>;

    /// Consumes `]`.
    fn end_array(&mut self) -> Result<(), Error>;

    /// Consumes `{`.
    fn begin_object(&mut self) -> Result<(), Error>;

    /// Consumes `}`.
    fn end_object(&mut self) -> Result<(), Error>;

    /// Whether the current array or object has another element or member.
    fn has_next(&mut self) -> Result<bool, Error> {
        self.peek()
            .map(|t| !matches!(t, Token::EndArray | Token::EndObject | Token::End))
    }

    /// Consumes an object member name.
    fn next_name(&mut self) -> Result<String, Error>;

    /// Consumes `null`.
    fn next_null(&mut self) -> Result<(), Error>;

    /// Consumes a boolean. A string token spelling `true` or `false` is accepted.
    fn next_bool(&mut self) -> Result<bool, Error>;

    /// Consumes a number. A string token holding JSON number text is accepted.
    fn next_number(&mut self) -> Result<Number, Error>;

    /// Consumes a string. A number token is accepted and returned as its text.
    fn next_str(&mut self) -> Result<String, Error>;

    /// Turns the next member name into a string value token.
    ///
    /// Afterwards [`peek`] reports [`Token::Str`] and the typed reads accept the name's text,
    /// so a map key codec can decode `"12"` as the number `12`.
    ///
    /// [`peek`]: JsonRead::peek
    fn promote_name_to_value(&mut self) -> Result<(), Error>;
}

/// A push sink of JSON tokens.
///
/// Inside an object every value must be preceded by a [`name`](JsonWrite::name). A document
/// holds exactly one top-level value.
pub trait JsonWrite {
    /// Writes `[`.
    fn begin_array(&mut self) -> Result<(), Error>;

    /// Writes `]`.
    fn end_array(&mut self) -> Result<(), Error>;

    /// Writes `{`.
    fn begin_object(&mut self) -> Result<(), Error>;

    /// Writes `}`.
    fn end_object(&mut self) -> Result<(), Error>;

    /// Writes an object member name.
    fn name(&mut self, name: &str) -> Result<(), Error>;

    /// Writes `null`.
    fn null(&mut self) -> Result<(), Error>;

    /// Writes a boolean.
    fn bool(&mut self, value: bool) -> Result<(), Error>;

    /// Writes a number. NaN and the infinities are rejected.
    fn number(&mut self, value: Number) -> Result<(), Error>;

    /// Writes a string.
    fn string(&mut self, value: &str) -> Result<(), Error>;
}

/// Token stream error.
#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// The text is not valid JSON.
    Syntax {
        /// One-based line.
        line: usize,
        /// One-based column, in bytes.
        col: usize,
        /// What went wrong.
        msg: String,
    },
    /// A valid token was found, but not the one asked for.
    Unexpected {
        /// What the caller asked for.
        expected: Token,
        /// What the stream held.
        found: Token,
        /// One-based line.
        line: usize,
        /// One-based column, in bytes.
        col: usize,
    },
    /// A writer was driven out of order, e.g. a value inside an object without a name.
    State(String),
    /// A number with no JSON representation.
    NonFinite(f64),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax { line, col, msg } => write!(f, "at {}:{} :: {}", line, col, msg),
            Error::Unexpected {
                expected,
                found,
                line,
                col,
            } => write!(
                f,
                "at {}:{} :: expected {}, found {}",
                line, col, expected, found
            ),
            Error::State(msg) => write!(f, "invalid write: {}", msg),
            Error::NonFinite(v) => write!(f, "{} is not a valid JSON number", v),
        }
    }
}

/// Format `(line, col)`, both one-based.
fn position(src: &str, offset: usize) -> (usize, usize) {
    let before = &src[..offset.min(src.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    (line, before.len() - line_start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position() {
        let s = "Hello\nA\r\nBrave\nWorld";
        assert_eq!(position(s, 0), (1, 1));
        assert_eq!(position(s, 4), (1, 5));
        assert_eq!(position(s, 5), (1, 6));
        assert_eq!(position(s, 6), (2, 1));
        assert_eq!(position(s, 9), (3, 1));
        assert_eq!(position(s, 17), (4, 3));
        assert_eq!(position(s, 100), (4, 6));
        assert_eq!(position("", 0), (1, 1));
    }

    #[test]
    fn error_display() {
        let e = Error::Unexpected {
            expected: Token::BeginArray,
            found: Token::Str,
            line: 1,
            col: 3,
        };
        assert_eq!(e.to_string(), "at 1:3 :: expected '[', found a string");

        let e = Error::Syntax {
            line: 2,
            col: 1,
            msg: "expected ':'".into(),
        };
        assert_eq!(e.to_string(), "at 2:1 :: expected ':'");
    }
}
