use super::*;
use crate::stream::Token;
use crate::{List, Set, Shape};

/// Accumulates decoded elements for one sequence.
///
/// Bags and lists keep every element in order. Sets drop an element equal to one already added,
/// keeping the first.
///
/// ```rust
/// # use imjson::*;
/// use imjson::codec::SeqBuilder;
///
/// let mut b = SeqBuilder::new(Shape::Set);
/// for x in [1, 2, 2, 3] {
///     b.add(Value::new_num(x));
/// }
/// assert_eq!(b.build().to_string(), "{1, 2, 3}");
/// ```
#[derive(Debug)]
pub enum SeqBuilder {
    /// Bag or list elements.
    Seq(List),
    /// Set elements.
    Set(Set),
}

impl SeqBuilder {
    /// An empty builder for `shape`. A map shape builds a list.
    pub fn new(shape: Shape) -> Self {
        match shape {
            Shape::Set => SeqBuilder::Set(Set::new()),
            Shape::Bag | Shape::List | Shape::Map => SeqBuilder::Seq(List::new()),
        }
    }

    /// Add an element.
    pub fn add(&mut self, item: Value) {
        match self {
            SeqBuilder::Seq(items) => items.push_back(item),
            SeqBuilder::Set(items) => {
                if !items.contains(&item) {
                    items.insert(item);
                }
            }
        }
    }

    /// The finished collection.
    pub fn build(self) -> Value {
        match self {
            SeqBuilder::Seq(items) => Value::List(items),
            SeqBuilder::Set(items) => Value::Set(items),
        }
    }
}

/// Codec of bags, lists and sets: a JSON array of elements.
#[derive(Debug)]
pub struct SeqCodec {
    shape: Shape,
    elem: Arc<dyn Codec>,
}

impl SeqCodec {
    /// A codec for a sequence of `shape` whose elements use `elem`.
    pub fn new(shape: Shape, elem: Arc<dyn Codec>) -> Self {
        Self { shape, elem }
    }

    /// The collection shape decoded to.
    pub fn shape(&self) -> Shape {
        self.shape
    }
}

impl Codec for SeqCodec {
    fn encode(&self, value: &Value, w: &mut dyn JsonWrite) -> Result<(), Error> {
        match value {
            Value::Null => w.null()?,
            Value::List(items) => {
                w.begin_array()?;
                for item in items {
                    self.elem.encode(item, w)?;
                }
                w.end_array()?;
            }
            Value::Set(items) => {
                w.begin_array()?;
                for item in items {
                    self.elem.encode(item, w)?;
                }
                w.end_array()?;
            }
            x => return Err(Error::mismatch("a list or set", x.kind())),
        }
        Ok(())
    }

    fn decode(&self, r: &mut dyn JsonRead) -> Result<Value, Error> {
        if r.peek()? == Token::Null {
            r.next_null()?;
            return Ok(Value::Null);
        }

        let mut builder = SeqBuilder::new(self.shape);
        r.begin_array()?;
        while r.has_next()? {
            builder.add(self.elem.decode(r)?);
        }
        r.end_array()?;

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{TextReader, TextWriter};

    fn ints(shape: Shape) -> SeqCodec {
        SeqCodec::new(shape, Arc::new(IntCodec))
    }

    fn decode(codec: &SeqCodec, text: &str) -> Result<Value, Error> {
        codec.decode(&mut TextReader::new(text))
    }

    fn encode(codec: &SeqCodec, value: &Value) -> Result<String, Error> {
        let mut w = TextWriter::new();
        codec.encode(value, &mut w)?;
        Ok(w.finish()?)
    }

    #[test]
    fn list_keeps_order_and_duplicates() {
        let v = decode(&ints(Shape::List), "[3, 1, 3]").unwrap();
        assert_eq!(v.to_string(), "[3, 1, 3]");
        assert_eq!(encode(&ints(Shape::List), &v).unwrap(), "[3,1,3]");
    }

    #[test]
    fn bag_decodes_to_list() {
        let v = decode(&ints(Shape::Bag), "[2, 2]").unwrap();
        assert!(v.list().is_some());
    }

    #[test]
    fn set_drops_duplicates() {
        let v = decode(&ints(Shape::Set), "[1, 2, 2, 3]").unwrap();
        assert_eq!(v.set().map(|s| s.len()), Some(3));
        assert_eq!(encode(&ints(Shape::Set), &v).unwrap(), "[1,2,3]");
    }

    #[test]
    fn null_both_ways() {
        assert_eq!(decode(&ints(Shape::List), "null"), Ok(Value::Null));
        assert_eq!(encode(&ints(Shape::Set), &Value::Null).unwrap(), "null");
    }

    #[test]
    fn element_failures_propagate() {
        assert!(matches!(
            decode(&ints(Shape::List), "[1, true]"),
            Err(Error::Stream(_))
        ));
        assert!(matches!(
            decode(&ints(Shape::List), "[1, 2"),
            Err(Error::Stream(stream::Error::Syntax { .. }))
        ));
        assert!(matches!(
            encode(&ints(Shape::List), &Value::Bool(true)),
            Err(Error::Mismatch { .. })
        ));
    }
}
