use super::*;
use crate::stream::{write_tree, Json, Token, TreeWriter};
use crate::Map;
use std::collections::HashSet;
use tracing::debug;

/// Accumulates decoded entries for one map, rejecting repeated keys.
#[derive(Debug, Default)]
pub struct MapBuilder {
    map: Map,
}

impl MapBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Fails with [`Error::DuplicateKey`] if `key` was already added.
    pub fn put(&mut self, key: Value, value: Value) -> Result<(), Error> {
        if self.map.contains_key(&key) {
            return Err(Error::DuplicateKey(key.to_string()));
        }
        self.map.insert(key, value);
        Ok(())
    }

    /// The finished map.
    pub fn build(self) -> Value {
        Value::Map(self.map)
    }
}

/// Codec of maps.
///
/// A map is written as a JSON object, each key encoded by the key codec and then turned into a
/// member name: strings verbatim, numbers and booleans as their text, `null` as `"null"`.
/// Keys that encode to arrays or objects have no name form. With complex keys enabled such a map
/// is written as an array of `[key, value]` pairs instead; otherwise encoding fails with
/// [`Error::ComplexKey`]. Two keys that map to the same name fail with [`Error::DuplicateKey`],
/// since the object could not be decoded again.
///
/// Decoding accepts both forms. Member names are handed to the key codec as string tokens, which
/// the number and boolean codecs read leniently, so `{"1": ..}` decodes with an `Int` key codec.
///
/// # Example
/// ```rust
/// # use imjson::*;
/// use imjson::codec::*;
/// use std::sync::Arc;
///
/// let list_key = MapCodec::new(
///     Arc::new(SeqCodec::new(Shape::List, Arc::new(IntCodec))),
///     Arc::new(StrCodec),
///     true,
/// );
/// let value = Value::new_map(vec![(
///     Value::new_list(vec![Value::new_num(1), Value::new_num(2)]),
///     Value::new_str("x"),
/// )]);
///
/// let mut w = imjson::stream::TextWriter::new();
/// list_key.encode(&value, &mut w).unwrap();
/// assert_eq!(w.finish().unwrap(), r#"[[[1,2],"x"]]"#);
/// ```
#[derive(Debug)]
pub struct MapCodec {
    key: Arc<dyn Codec>,
    value: Arc<dyn Codec>,
    complex_keys: bool,
}

impl MapCodec {
    /// A map codec. `complex_keys` enables the array of pairs form.
    pub fn new(key: Arc<dyn Codec>, value: Arc<dyn Codec>, complex_keys: bool) -> Self {
        Self {
            key,
            value,
            complex_keys,
        }
    }

    fn decode_pairs(&self, r: &mut dyn JsonRead) -> Result<Value, Error> {
        let mut builder = MapBuilder::new();
        r.begin_array()?;
        while r.has_next()? {
            r.begin_array()?;
            let key = self.key.decode(r)?;
            let value = self.value.decode(r)?;
            r.end_array()?;
            builder.put(key, value)?;
        }
        r.end_array()?;
        Ok(builder.build())
    }

    fn decode_object(&self, r: &mut dyn JsonRead) -> Result<Value, Error> {
        let mut builder = MapBuilder::new();
        r.begin_object()?;
        while r.has_next()? {
            r.promote_name_to_value()?;
            let key = self.key.decode(r)?;
            let value = self.value.decode(r)?;
            builder.put(key, value)?;
        }
        r.end_object()?;
        Ok(builder.build())
    }
}

/// The member name of a scalar key tree.
fn key_to_name(key: &Json) -> Result<String, Error> {
    match key {
        Json::Null => Ok("null".to_string()),
        Json::Bool(b) => Ok(b.to_string()),
        Json::Num(n) => Ok(n.to_string()),
        Json::Str(s) => Ok(s.clone()),
        Json::Array(_) | Json::Object(_) => Err(Error::ComplexKey(key.to_string())),
    }
}

impl Codec for MapCodec {
    fn encode(&self, value: &Value, w: &mut dyn JsonWrite) -> Result<(), Error> {
        let map = match value {
            Value::Null => return Ok(w.null()?),
            Value::Map(map) => map,
            x => return Err(Error::mismatch("a map", x.kind())),
        };

        let mut entries = Vec::with_capacity(map.len());
        let mut complex = false;
        for (key, value) in map {
            let mut staged = TreeWriter::new();
            self.key.encode(key, &mut staged)?;
            let key = staged.finish()?;
            complex |= key.is_complex();
            entries.push((key, value));
        }

        if self.complex_keys && complex {
            debug!(
                entries = entries.len(),
                "writing map with complex keys as an array of pairs"
            );
            w.begin_array()?;
            for (key, value) in &entries {
                w.begin_array()?;
                write_tree(key, w)?;
                self.value.encode(value, w)?;
                w.end_array()?;
            }
            w.end_array()?;
        } else {
            let mut seen = HashSet::with_capacity(entries.len());
            let mut members = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                let name = key_to_name(&key)?;
                // distinct keys such as `1` and `"1"` can share a name
                if !seen.insert(name.clone()) {
                    return Err(Error::DuplicateKey(name));
                }
                members.push((name, value));
            }

            w.begin_object()?;
            for (name, value) in members {
                w.name(&name)?;
                self.value.encode(value, w)?;
            }
            w.end_object()?;
        }

        Ok(())
    }

    fn decode(&self, r: &mut dyn JsonRead) -> Result<Value, Error> {
        match r.peek()? {
            Token::Null => {
                r.next_null()?;
                Ok(Value::Null)
            }
            Token::BeginArray => self.decode_pairs(r),
            _ => self.decode_object(r),
        }
    }
}
