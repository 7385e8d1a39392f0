use super::lex::{self, Lit};
use super::*;

/// How many arrays and objects may be open at once.
///
/// Codecs decode nested collections recursively, so the limit bounds their stack use.
pub const MAX_DEPTH: usize = 255;

#[derive(Debug, Copy, Clone, PartialEq)]
enum Scope {
    EmptyDocument,
    NonEmptyDocument,
    EmptyArray,
    NonEmptyArray,
    EmptyObject,
    /// A name was read, the `:` and value are next.
    DanglingName,
    NonEmptyObject,
}

#[derive(Debug, Clone, PartialEq)]
enum Lexeme<'a> {
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    Name(String),
    /// A name turned into a string value by `promote_name_to_value`.
    Promoted(String),
    Str(String),
    Num(&'a str),
    Bool(bool),
    Null,
    End,
}

impl<'a> Lexeme<'a> {
    fn token(&self) -> Token {
        match self {
            Lexeme::BeginArray => Token::BeginArray,
            Lexeme::EndArray => Token::EndArray,
            Lexeme::BeginObject => Token::BeginObject,
            Lexeme::EndObject => Token::EndObject,
            Lexeme::Name(_) => Token::Name,
            Lexeme::Promoted(_) | Lexeme::Str(_) => Token::Str,
            Lexeme::Num(_) => Token::Num,
            Lexeme::Bool(_) => Token::Bool,
            Lexeme::Null => Token::Null,
            Lexeme::End => Token::End,
        }
    }
}

/// Pull tokenizer over JSON text.
///
/// The reader is strict JSON (RFC 8259): no comments, no trailing commas, no unquoted names,
/// exactly one top-level value. Typed reads are lenient the same way every [`JsonRead`] is:
/// numbers can be read from strings holding number text and strings can be read from numbers.
///
/// Errors carry the one-based line and column of the offending input. Arrays and objects nest at
/// most [`MAX_DEPTH`] levels deep.
///
/// # Example
/// ```rust
/// use imjson::stream::*;
///
/// let mut r = TextReader::new(r#"{"a": [true, null]}"#);
/// r.begin_object().unwrap();
/// assert_eq!(r.next_name(), Ok("a".to_string()));
/// r.begin_array().unwrap();
/// assert_eq!(r.next_bool(), Ok(true));
/// r.next_null().unwrap();
/// r.end_array().unwrap();
/// r.end_object().unwrap();
/// assert_eq!(r.peek(), Ok(Token::End));
///
/// let mut r = TextReader::new("[1,\n 2,]");
/// r.begin_array().unwrap();
/// r.next_number().unwrap();
/// r.next_number().unwrap();
/// assert_eq!(
///     r.peek().map_err(|e| e.to_string()),
///     Err("at 2:4 :: unexpected character ']'".to_string())
/// );
/// ```
pub struct TextReader<'a> {
    src: &'a str,
    rest: &'a str,
    stack: Vec<Scope>,
    peeked: Option<Lexeme<'a>>,
    /// Offset where the last lexeme starts.
    start: usize,
}

impl<'a> TextReader<'a> {
    /// A reader positioned before the top-level value of `src`.
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            rest: src,
            stack: vec![Scope::EmptyDocument],
            peeked: None,
            start: 0,
        }
    }

    fn offset(&self) -> usize {
        self.src.len() - self.rest.len()
    }

    fn syntax<S: Into<String>>(&self, at: &str, msg: S) -> Error {
        let (line, col) = position(self.src, self.src.len() - at.len());
        Error::Syntax {
            line,
            col,
            msg: msg.into(),
        }
    }

    fn unexpected(&self, expected: Token, found: Token) -> Error {
        let (line, col) = position(self.src, self.start);
        Error::Unexpected {
            expected,
            found,
            line,
            col,
        }
    }

    fn set_top(&mut self, scope: Scope) {
        if let Some(top) = self.stack.last_mut() {
            *top = scope;
        }
    }

    fn skip_ws(&mut self) {
        if let Ok((rest, _)) = lex::ws(self.rest) {
            self.rest = rest;
        }
    }

    fn eat(&mut self, c: char) -> bool {
        match self.rest.strip_prefix(c) {
            Some(rest) => {
                self.start = self.offset();
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn fill(&mut self) -> Result<&Lexeme<'a>, Error> {
        if self.peeked.is_none() {
            let lexeme = self.lex()?;
            self.peeked = Some(lexeme);
        }
        self.peeked
            .as_ref()
            .ok_or_else(|| Error::State("no token available".into()))
    }

    fn lex(&mut self) -> Result<Lexeme<'a>, Error> {
        self.skip_ws();
        let top = *self
            .stack
            .last()
            .ok_or_else(|| Error::State("reader has no open scope".into()))?;

        match top {
            Scope::EmptyDocument => {
                self.set_top(Scope::NonEmptyDocument);
                self.value()
            }
            Scope::NonEmptyDocument => {
                self.start = self.offset();
                if self.rest.is_empty() {
                    Ok(Lexeme::End)
                } else {
                    Err(self.syntax(self.rest, "trailing characters after the top-level value"))
                }
            }
            Scope::EmptyArray => {
                if self.eat(']') {
                    return Ok(Lexeme::EndArray);
                }
                self.set_top(Scope::NonEmptyArray);
                self.value()
            }
            Scope::NonEmptyArray => {
                if self.eat(']') {
                    Ok(Lexeme::EndArray)
                } else if self.eat(',') {
                    self.value()
                } else {
                    Err(self.expected_one_of(",", "]"))
                }
            }
            Scope::EmptyObject => {
                if self.eat('}') {
                    return Ok(Lexeme::EndObject);
                }
                self.set_top(Scope::DanglingName);
                self.name()
            }
            Scope::NonEmptyObject => {
                if self.eat('}') {
                    Ok(Lexeme::EndObject)
                } else if self.eat(',') {
                    self.set_top(Scope::DanglingName);
                    self.name()
                } else {
                    Err(self.expected_one_of(",", "}"))
                }
            }
            Scope::DanglingName => {
                if !self.eat(':') {
                    return Err(self.expected_one_of(":", ":"));
                }
                self.set_top(Scope::NonEmptyObject);
                self.value()
            }
        }
    }

    fn expected_one_of(&self, a: &str, b: &str) -> Error {
        let msg = match (a == b, self.rest.chars().next()) {
            (true, Some(c)) => format!("expected '{}', found '{}'", a, c),
            (true, None) => format!("expected '{}', got end of input", a),
            (false, Some(c)) => format!("expected '{}' or '{}', found '{}'", a, b, c),
            (false, None) => format!("expected '{}' or '{}', got end of input", a, b),
        };
        self.syntax(self.rest, msg)
    }

    fn name(&mut self) -> Result<Lexeme<'a>, Error> {
        self.skip_ws();
        self.start = self.offset();
        if !self.rest.starts_with('"') {
            return Err(self.syntax(self.rest, "expected a quoted member name"));
        }
        self.lexed(lex::string(self.rest)).map(Lexeme::Name)
    }

    fn value(&mut self) -> Result<Lexeme<'a>, Error> {
        self.skip_ws();
        self.start = self.offset();
        match self.rest.chars().next() {
            Some('[') => {
                self.eat('[');
                Ok(Lexeme::BeginArray)
            }
            Some('{') => {
                self.eat('{');
                Ok(Lexeme::BeginObject)
            }
            Some('"') => self.lexed(lex::string(self.rest)).map(Lexeme::Str),
            Some('t') | Some('f') | Some('n') => {
                self.lexed(lex::literal(self.rest)).map(|lit| match lit {
                    Lit::True => Lexeme::Bool(true),
                    Lit::False => Lexeme::Bool(false),
                    Lit::Null => Lexeme::Null,
                })
            }
            Some(c) if c == '-' || c.is_ascii_digit() => {
                self.lexed(lex::number(self.rest)).map(Lexeme::Num)
            }
            Some(c) => Err(self.syntax(self.rest, format!("unexpected character '{}'", c))),
            None => Err(self.syntax(self.rest, "unexpected end of input")),
        }
    }

    /// Advance past a successful lex, or convert the nom error.
    fn lexed<T>(&mut self, res: lex::Res<'a, T>) -> Result<T, Error> {
        match res {
            Ok((rest, out)) => {
                self.rest = rest;
                Ok(out)
            }
            Err(e) => {
                let (at, msg) = lex::describe(e, self.rest);
                Err(self.syntax(at, msg))
            }
        }
    }

    /// Enter an array or object scope, refusing to nest deeper than [`MAX_DEPTH`].
    fn open(&mut self, scope: Scope) -> Result<(), Error> {
        // the document scope sits at the bottom of the stack
        if self.stack.len() > MAX_DEPTH {
            let (line, col) = position(self.src, self.start);
            return Err(Error::Syntax {
                line,
                col,
                msg: format!("nesting too deep, the limit is {}", MAX_DEPTH),
            });
        }
        self.stack.push(scope);
        Ok(())
    }

    /// Consume the peeked lexeme if it is `expected`.
    fn take(&mut self, expected: Token) -> Result<Lexeme<'a>, Error> {
        let found = self.fill()?.token();
        if found == expected {
            self.next_lexeme()
        } else {
            Err(self.unexpected(expected, found))
        }
    }

    fn next_lexeme(&mut self) -> Result<Lexeme<'a>, Error> {
        self.fill()?;
        self.peeked
            .take()
            .ok_or_else(|| Error::State("no token available".into()))
    }
}

impl<'a> JsonRead for TextReader<'a> {
    fn peek(&mut self) -> Result<Token, Error> {
        self.fill().map(Lexeme::token)
    }

    fn begin_array(&mut self) -> Result<(), Error> {
        self.take(Token::BeginArray)?;
        self.open(Scope::EmptyArray)
    }

    fn end_array(&mut self) -> Result<(), Error> {
        self.take(Token::EndArray)?;
        self.stack.pop();
        Ok(())
    }

    fn begin_object(&mut self) -> Result<(), Error> {
        self.take(Token::BeginObject)?;
        self.open(Scope::EmptyObject)
    }

    fn end_object(&mut self) -> Result<(), Error> {
        self.take(Token::EndObject)?;
        self.stack.pop();
        Ok(())
    }

    fn next_name(&mut self) -> Result<String, Error> {
        match self.take(Token::Name)? {
            Lexeme::Name(name) => Ok(name),
            _ => Err(Error::State("name token without a name".into())),
        }
    }

    fn next_null(&mut self) -> Result<(), Error> {
        self.take(Token::Null).map(|_| ())
    }

    fn next_bool(&mut self) -> Result<bool, Error> {
        let found = match self.fill()? {
            Lexeme::Bool(b) => Some(*b),
            Lexeme::Str(s) | Lexeme::Promoted(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        };

        match found {
            Some(b) => {
                self.next_lexeme()?;
                Ok(b)
            }
            None => {
                let token = self.fill()?.token();
                Err(self.unexpected(Token::Bool, token))
            }
        }
    }

    fn next_number(&mut self) -> Result<Number, Error> {
        let found = match self.fill()? {
            Lexeme::Num(text) => text.parse::<Number>().ok(),
            Lexeme::Str(s) | Lexeme::Promoted(s) => s.parse::<Number>().ok(),
            _ => None,
        };

        match found {
            Some(n) => {
                self.next_lexeme()?;
                Ok(n)
            }
            None => {
                let token = self.fill()?.token();
                Err(self.unexpected(Token::Num, token))
            }
        }
    }

    fn next_str(&mut self) -> Result<String, Error> {
        let token = self.fill()?.token();
        match self.next_lexeme()? {
            Lexeme::Str(s) | Lexeme::Promoted(s) => Ok(s),
            Lexeme::Num(text) => Ok(text.to_string()),
            other => {
                self.peeked = Some(other);
                Err(self.unexpected(Token::Str, token))
            }
        }
    }

    fn promote_name_to_value(&mut self) -> Result<(), Error> {
        match self.take(Token::Name)? {
            Lexeme::Name(name) => {
                self.peeked = Some(Lexeme::Promoted(name));
                Ok(())
            }
            _ => Err(Error::State("name token without a name".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax_msg(r: Result<Token, Error>) -> String {
        match r {
            Err(Error::Syntax { msg, .. }) => msg,
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn nested_structure() {
        let mut r = TextReader::new(r#" { "a" : [ 1 , -2.5 , "x" ] , "b" : { } } "#);
        r.begin_object().unwrap();
        assert_eq!(r.next_name(), Ok("a".to_string()));
        r.begin_array().unwrap();
        assert_eq!(r.next_number(), Ok(Number::from(1)));
        assert_eq!(r.next_number(), Ok(Number::from(-2.5)));
        assert_eq!(r.next_str(), Ok("x".to_string()));
        assert_eq!(r.has_next(), Ok(false));
        r.end_array().unwrap();
        assert_eq!(r.next_name(), Ok("b".to_string()));
        r.begin_object().unwrap();
        assert_eq!(r.has_next(), Ok(false));
        r.end_object().unwrap();
        r.end_object().unwrap();
        assert_eq!(r.peek(), Ok(Token::End));
    }

    #[test]
    fn empty_containers() {
        let mut r = TextReader::new("[[],{}]");
        r.begin_array().unwrap();
        r.begin_array().unwrap();
        r.end_array().unwrap();
        r.begin_object().unwrap();
        r.end_object().unwrap();
        r.end_array().unwrap();
        assert_eq!(r.peek(), Ok(Token::End));
    }

    #[test]
    fn promoted_names_read_as_scalars() {
        let mut r = TextReader::new(r#"{"12": 0, "true": 0, "k": 0}"#);
        r.begin_object().unwrap();

        r.promote_name_to_value().unwrap();
        assert_eq!(r.peek(), Ok(Token::Str));
        assert_eq!(r.next_number(), Ok(Number::from(12)));
        r.next_number().unwrap();

        r.promote_name_to_value().unwrap();
        assert_eq!(r.next_bool(), Ok(true));
        r.next_number().unwrap();

        r.promote_name_to_value().unwrap();
        assert!(matches!(
            r.next_number(),
            Err(Error::Unexpected {
                expected: Token::Num,
                found: Token::Str,
                ..
            })
        ));
        assert_eq!(r.next_str(), Ok("k".to_string()));
        r.next_number().unwrap();
        r.end_object().unwrap();
    }

    #[test]
    fn lenient_typed_reads() {
        let mut r = TextReader::new(r#"["42", 7, "false"]"#);
        r.begin_array().unwrap();
        assert_eq!(r.next_number(), Ok(Number::from(42)));
        assert_eq!(r.next_str(), Ok("7".to_string()));
        assert_eq!(r.next_bool(), Ok(false));
        r.end_array().unwrap();
    }

    #[test]
    fn wrong_token_is_not_consumed() {
        let mut r = TextReader::new(r#"["s"]"#);
        r.begin_array().unwrap();
        assert!(matches!(
            r.begin_array(),
            Err(Error::Unexpected {
                expected: Token::BeginArray,
                found: Token::Str,
                line: 1,
                col: 2,
            })
        ));
        assert!(r.next_null().is_err());
        assert_eq!(r.next_str(), Ok("s".to_string()));
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(
            syntax_msg(TextReader::new("").peek()),
            "unexpected end of input"
        );
        assert_eq!(
            syntax_msg(TextReader::new("nope").peek()),
            "invalid literal"
        );

        let mut r = TextReader::new("[1 2]");
        r.begin_array().unwrap();
        r.next_number().unwrap();
        assert_eq!(syntax_msg(r.peek()), "expected ',' or ']', found '2'");

        let mut r = TextReader::new(r#"{"a" 1}"#);
        r.begin_object().unwrap();
        r.next_name().unwrap();
        assert_eq!(syntax_msg(r.peek()), "expected ':', found '1'");

        let mut r = TextReader::new("{a: 1}");
        r.begin_object().unwrap();
        assert_eq!(syntax_msg(r.peek()), "expected a quoted member name");

        let mut r = TextReader::new("1 2");
        r.next_number().unwrap();
        assert_eq!(
            syntax_msg(r.peek()),
            "trailing characters after the top-level value"
        );
    }

    #[test]
    fn nesting_is_limited() {
        let deep = |n: usize| "[".repeat(n) + &"]".repeat(n);

        let text = deep(MAX_DEPTH);
        let mut r = TextReader::new(&text);
        for _ in 0..MAX_DEPTH {
            r.begin_array().unwrap();
        }
        for _ in 0..MAX_DEPTH {
            r.end_array().unwrap();
        }
        assert_eq!(r.peek(), Ok(Token::End));

        let text = deep(100_000);
        let mut r = TextReader::new(&text);
        for _ in 0..MAX_DEPTH {
            r.begin_array().unwrap();
        }
        match r.begin_array() {
            Err(Error::Syntax { line, col, msg }) => {
                assert_eq!((line, col), (1, MAX_DEPTH + 1));
                assert_eq!(msg, "nesting too deep, the limit is 255");
            }
            other => panic!("unexpected {:?}", other),
        }

        let text = "{\"a\":".repeat(MAX_DEPTH + 1);
        let mut r = TextReader::new(&text);
        for _ in 0..MAX_DEPTH {
            r.begin_object().unwrap();
            r.next_name().unwrap();
        }
        assert!(matches!(r.begin_object(), Err(Error::Syntax { .. })));
    }

    #[test]
    fn error_positions() {
        let mut r = TextReader::new("{\n  \"a\": tru\n}");
        r.begin_object().unwrap();
        r.next_name().unwrap();
        match r.peek() {
            Err(Error::Syntax { line, col, .. }) => assert_eq!((line, col), (2, 8)),
            other => panic!("unexpected {:?}", other),
        }
    }
}
