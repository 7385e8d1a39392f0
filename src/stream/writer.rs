use super::*;
use std::fmt::Write as _;

#[derive(Debug, Copy, Clone, PartialEq)]
enum Scope {
    EmptyDocument,
    NonEmptyDocument,
    EmptyArray,
    NonEmptyArray,
    EmptyObject,
    DanglingName,
    NonEmptyObject,
}

/// Renders tokens as JSON text.
///
/// The writer validates the token order: a value inside an object needs a name first, a name
/// outside an object is an error, and a second top-level value is rejected. Numbers that are not
/// finite have no JSON form and fail with [`Error::NonFinite`].
///
/// # Example
/// ```rust
/// use imjson::stream::*;
///
/// let mut w = TextWriter::pretty();
/// w.begin_object().unwrap();
/// w.name("a").unwrap();
/// w.begin_array().unwrap();
/// w.bool(true).unwrap();
/// w.null().unwrap();
/// w.end_array().unwrap();
/// w.end_object().unwrap();
/// assert_eq!(w.finish().unwrap(), "{\n  \"a\": [\n    true,\n    null\n  ]\n}");
///
/// let mut w = TextWriter::new();
/// w.begin_object().unwrap();
/// assert!(w.bool(true).is_err()); // no name
/// ```
#[derive(Debug)]
pub struct TextWriter {
    out: String,
    stack: Vec<Scope>,
    indent: Option<&'static str>,
}

impl Default for TextWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextWriter {
    /// A writer producing compact JSON, no whitespace between tokens.
    pub fn new() -> Self {
        Self {
            out: String::new(),
            stack: vec![Scope::EmptyDocument],
            indent: None,
        }
    }

    /// A writer producing indented JSON, two spaces per level.
    pub fn pretty() -> Self {
        Self {
            indent: Some("  "),
            ..Self::new()
        }
    }

    /// The JSON text. Fails if the document is incomplete.
    pub fn finish(self) -> Result<String, Error> {
        match self.stack.as_slice() {
            [Scope::NonEmptyDocument] => Ok(self.out),
            [Scope::EmptyDocument] => Err(Error::State("document is empty".into())),
            _ => Err(Error::State("document has unclosed arrays or objects".into())),
        }
    }

    fn top(&self) -> Result<Scope, Error> {
        self.stack
            .last()
            .copied()
            .ok_or_else(|| Error::State("writer has no open scope".into()))
    }

    fn set_top(&mut self, scope: Scope) {
        if let Some(top) = self.stack.last_mut() {
            *top = scope;
        }
    }

    fn newline(&mut self) {
        if let Some(indent) = self.indent {
            self.out.push('\n');
            // the document scope sits at the bottom of the stack
            for _ in 1..self.stack.len() {
                self.out.push_str(indent);
            }
        }
    }

    /// Write the separator that precedes a value, moving the enclosing scope along.
    fn before_value(&mut self) -> Result<(), Error> {
        match self.top()? {
            Scope::EmptyDocument => self.set_top(Scope::NonEmptyDocument),
            Scope::NonEmptyDocument => {
                return Err(Error::State("document already has a top-level value".into()))
            }
            Scope::EmptyArray => {
                self.set_top(Scope::NonEmptyArray);
                self.newline();
            }
            Scope::NonEmptyArray => {
                self.out.push(',');
                self.newline();
            }
            Scope::DanglingName => {
                self.out.push(':');
                if self.indent.is_some() {
                    self.out.push(' ');
                }
                self.set_top(Scope::NonEmptyObject);
            }
            Scope::EmptyObject | Scope::NonEmptyObject => {
                return Err(Error::State("object value written without a name".into()))
            }
        }
        Ok(())
    }

    fn open(&mut self, scope: Scope, bracket: char) -> Result<(), Error> {
        self.before_value()?;
        self.stack.push(scope);
        self.out.push(bracket);
        Ok(())
    }

    fn close(&mut self, empty: Scope, nonempty: Scope, bracket: char) -> Result<(), Error> {
        let top = self.top()?;
        if top == Scope::DanglingName {
            return Err(Error::State("name written without a value".into()));
        }
        if top != empty && top != nonempty {
            return Err(Error::State(format!("unbalanced '{}'", bracket)));
        }
        self.stack.pop();
        if top == nonempty {
            self.newline();
        }
        self.out.push(bracket);
        Ok(())
    }

    fn escaped(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                '\u{8}' => self.out.push_str("\\b"),
                '\u{c}' => self.out.push_str("\\f"),
                c if (c as u32) < 0x20 => {
                    let _ = write!(self.out, "\\u{:04x}", c as u32);
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }
}

impl JsonWrite for TextWriter {
    fn begin_array(&mut self) -> Result<(), Error> {
        self.open(Scope::EmptyArray, '[')
    }

    fn end_array(&mut self) -> Result<(), Error> {
        self.close(Scope::EmptyArray, Scope::NonEmptyArray, ']')
    }

    fn begin_object(&mut self) -> Result<(), Error> {
        self.open(Scope::EmptyObject, '{')
    }

    fn end_object(&mut self) -> Result<(), Error> {
        self.close(Scope::EmptyObject, Scope::NonEmptyObject, '}')
    }

    fn name(&mut self, name: &str) -> Result<(), Error> {
        match self.top()? {
            Scope::EmptyObject => {}
            Scope::NonEmptyObject => self.out.push(','),
            Scope::DanglingName => {
                return Err(Error::State(format!(
                    "name '{}' written where a value was expected",
                    name
                )))
            }
            _ => {
                return Err(Error::State(format!(
                    "name '{}' written outside an object",
                    name
                )))
            }
        }
        self.set_top(Scope::DanglingName);
        self.newline();
        self.escaped(name);
        Ok(())
    }

    fn null(&mut self) -> Result<(), Error> {
        self.before_value()?;
        self.out.push_str("null");
        Ok(())
    }

    fn bool(&mut self, value: bool) -> Result<(), Error> {
        self.before_value()?;
        self.out.push_str(if value { "true" } else { "false" });
        Ok(())
    }

    fn number(&mut self, value: Number) -> Result<(), Error> {
        if !value.is_finite() {
            return Err(Error::NonFinite(value.as_f64()));
        }
        self.before_value()?;
        let _ = write!(self.out, "{}", value);
        Ok(())
    }

    fn string(&mut self, value: &str) -> Result<(), Error> {
        self.before_value()?;
        self.escaped(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_nesting() {
        let mut w = TextWriter::new();
        w.begin_object().unwrap();
        w.name("k").unwrap();
        w.begin_array().unwrap();
        w.begin_array().unwrap();
        w.end_array().unwrap();
        w.begin_object().unwrap();
        w.end_object().unwrap();
        w.number(Number::from(-1.5)).unwrap();
        w.end_array().unwrap();
        w.name("z").unwrap();
        w.null().unwrap();
        w.end_object().unwrap();
        assert_eq!(w.finish().unwrap(), r#"{"k":[[],{},-1.5],"z":null}"#);
    }

    #[test]
    fn pretty_empty_collections_stay_inline() {
        let mut w = TextWriter::pretty();
        w.begin_array().unwrap();
        w.begin_array().unwrap();
        w.end_array().unwrap();
        w.begin_object().unwrap();
        w.end_object().unwrap();
        w.end_array().unwrap();
        assert_eq!(w.finish().unwrap(), "[\n  [],\n  {}\n]");
    }

    #[test]
    fn escapes() {
        let mut w = TextWriter::new();
        w.string("a\"b\\c\nd\u{1}é").unwrap();
        assert_eq!(w.finish().unwrap(), r#""a\"b\\c\nd\u0001é""#);
    }

    #[test]
    fn numbers() {
        let mut w = TextWriter::new();
        w.begin_array().unwrap();
        w.number(Number::from(1u8)).unwrap();
        w.number(Number::from(-7i64)).unwrap();
        w.number(Number::from(1.0)).unwrap();
        assert!(matches!(
            w.number(Number::from(f64::NAN)),
            Err(Error::NonFinite(_))
        ));
        assert_eq!(
            w.number(Number::from(f64::INFINITY)),
            Err(Error::NonFinite(f64::INFINITY))
        );
        w.end_array().unwrap();
        assert_eq!(w.finish().unwrap(), "[1,-7,1.0]");
    }

    #[test]
    fn invalid_sequences() {
        let mut w = TextWriter::new();
        assert!(w.name("a").is_err());
        assert!(w.end_array().is_err());
        w.bool(true).unwrap();
        assert!(w.bool(false).is_err());

        let mut w = TextWriter::new();
        w.begin_object().unwrap();
        w.name("a").unwrap();
        assert!(w.name("b").is_err());
        assert!(w.end_object().is_err());

        let mut w = TextWriter::new();
        w.begin_array().unwrap();
        assert!(w.end_object().is_err());
        assert!(w.finish().is_err());

        assert!(TextWriter::new().finish().is_err());
    }
}
