use super::*;

/// An in-memory JSON document.
///
/// Object members keep their written order and are not deduplicated.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Json {
    Null,
    Bool(bool),
    Num(Number),
    Str(String),
    Array(Vec<Json>),
    Object(Vec<(String, Json)>),
}

impl Json {
    /// Is this an array or an object.
    pub fn is_complex(&self) -> bool {
        matches!(self, Json::Array(_) | Json::Object(_))
    }

    /// The string, if a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Json::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Compact JSON text.
impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = TextWriter::new();
        write_tree(self, &mut w).map_err(|_| fmt::Error)?;
        f.write_str(&w.finish().map_err(|_| fmt::Error)?)
    }
}

/// Replay a tree into a writer.
pub fn write_tree(json: &Json, w: &mut dyn JsonWrite) -> Result<(), Error> {
    match json {
        Json::Null => w.null(),
        Json::Bool(b) => w.bool(*b),
        Json::Num(n) => w.number(*n),
        Json::Str(s) => w.string(s),
        Json::Array(items) => {
            w.begin_array()?;
            for item in items {
                write_tree(item, w)?;
            }
            w.end_array()
        }
        Json::Object(members) => {
            w.begin_object()?;
            for (name, value) in members {
                w.name(name)?;
                write_tree(value, w)?;
            }
            w.end_object()
        }
    }
}

enum Frame {
    Array(Vec<Json>),
    Object(Vec<(String, Json)>, Option<String>),
}

/// Captures tokens as a [`Json`] tree.
///
/// # Example
/// ```rust
/// use imjson::stream::*;
///
/// let mut w = TreeWriter::new();
/// w.begin_array().unwrap();
/// w.number(1u8.into()).unwrap();
/// w.string("x").unwrap();
/// w.end_array().unwrap();
///
/// let tree = w.finish().unwrap();
/// assert!(tree.is_complex());
/// assert_eq!(tree.to_string(), r#"[1,"x"]"#);
/// ```
#[derive(Default)]
pub struct TreeWriter {
    frames: Vec<Frame>,
    root: Option<Json>,
}

impl TreeWriter {
    /// An empty tree writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The captured document. Fails if nothing, or only part of a value, was written.
    pub fn finish(self) -> Result<Json, Error> {
        if !self.frames.is_empty() {
            return Err(Error::State(
                "document has unclosed arrays or objects".into(),
            ));
        }
        self.root
            .ok_or_else(|| Error::State("document is empty".into()))
    }

    fn push(&mut self, json: Json) -> Result<(), Error> {
        match self.frames.last_mut() {
            Some(Frame::Array(items)) => items.push(json),
            Some(Frame::Object(members, pending)) => match pending.take() {
                Some(name) => members.push((name, json)),
                None => return Err(Error::State("object value written without a name".into())),
            },
            None if self.root.is_none() => self.root = Some(json),
            None => return Err(Error::State("document already has a top-level value".into())),
        }
        Ok(())
    }

    fn check_open(&self) -> Result<(), Error> {
        match self.frames.last() {
            Some(Frame::Object(_, None)) => {
                Err(Error::State("object value written without a name".into()))
            }
            None if self.root.is_some() => Err(Error::State(
                "document already has a top-level value".into(),
            )),
            _ => Ok(()),
        }
    }
}

impl JsonWrite for TreeWriter {
    fn begin_array(&mut self) -> Result<(), Error> {
        self.check_open()?;
        self.frames.push(Frame::Array(Vec::new()));
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), Error> {
        match self.frames.pop() {
            Some(Frame::Array(items)) => self.push(Json::Array(items)),
            Some(frame) => {
                self.frames.push(frame);
                Err(Error::State("unbalanced ']'".into()))
            }
            None => Err(Error::State("unbalanced ']'".into())),
        }
    }

    fn begin_object(&mut self) -> Result<(), Error> {
        self.check_open()?;
        self.frames.push(Frame::Object(Vec::new(), None));
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), Error> {
        match self.frames.pop() {
            Some(Frame::Object(members, None)) => self.push(Json::Object(members)),
            Some(frame) => {
                self.frames.push(frame);
                Err(Error::State("unbalanced '}'".into()))
            }
            None => Err(Error::State("unbalanced '}'".into())),
        }
    }

    fn name(&mut self, name: &str) -> Result<(), Error> {
        match self.frames.last_mut() {
            Some(Frame::Object(_, pending @ None)) => {
                *pending = Some(name.to_string());
                Ok(())
            }
            _ => Err(Error::State(format!("name '{}' written out of place", name))),
        }
    }

    fn null(&mut self) -> Result<(), Error> {
        self.push(Json::Null)
    }

    fn bool(&mut self, value: bool) -> Result<(), Error> {
        self.push(Json::Bool(value))
    }

    fn number(&mut self, value: Number) -> Result<(), Error> {
        if !value.is_finite() {
            return Err(Error::NonFinite(value.as_f64()));
        }
        self.push(Json::Num(value))
    }

    fn string(&mut self, value: &str) -> Result<(), Error> {
        self.push(Json::Str(value.to_string()))
    }
}
