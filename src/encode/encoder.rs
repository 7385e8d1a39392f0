use super::*;
use crate::{List, Map};
use serde::{ser, Serialize};
use std::{error, fmt};

type Res = Result<Value, Error>;

/// Encoder to pass to [`Serialize::serialize`] to encode a type into a [`Value`].
///
/// There is no data associated with the `Encoder`, it only implements `serde`'s `Serializer`
/// trait. The mapping is:
///
/// | Rust                      | `Value`                              |
/// | ------------------------- | ------------------------------------ |
/// | `bool`                    | `Bool`                               |
/// | integers and floats       | `Num`                                |
/// | `char`, `&str`, `String`  | `Str`                                |
/// | bytes                     | `List` of numbers                    |
/// | `None`, `()`, unit struct | `Null`                               |
/// | `Some(x)`, newtype struct | `x`                                  |
/// | sequences and tuples      | `List`                               |
/// | maps and structs          | `Map`, struct fields as string keys  |
/// | unit variant              | `Str` of the variant name            |
/// | other variants            | `Map` of the variant name to content |
///
/// ```rust
/// # use imjson::*;
/// use imjson::encode::{Encoder, Serialize};
///
/// let data = ("Hello!", 3.14, Some(1u8));
/// let expected = Value::new_list(vec![
///     Value::new_str("Hello!"),
///     Value::new_num(3.14),
///     Value::new_num(1u8),
/// ]);
///
/// assert_eq!(data.serialize(Encoder), Ok(expected.clone()));
/// assert_eq!(Value::enc(&data), Ok(expected));
/// ```
///
/// [`Serialize::serialize`]: crate::encode::Serialize::serialize
pub struct Encoder;

impl ser::Serializer for Encoder {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = SeqLike;
    type SerializeTuple = SeqLike;
    type SerializeTupleStruct = SeqLike;
    type SerializeTupleVariant = VariantLike<SeqLike>;
    type SerializeMap = MapLike;
    type SerializeStruct = MapLike;
    type SerializeStructVariant = VariantLike<MapLike>;

    fn serialize_bool(self, v: bool) -> Res {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_i16(self, v: i16) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_i32(self, v: i32) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_i64(self, v: i64) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_i128(self, v: i128) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_u8(self, v: u8) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_u16(self, v: u16) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_u32(self, v: u32) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_u64(self, v: u64) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_u128(self, v: u128) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_f32(self, v: f32) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_f64(self, v: f64) -> Res {
        Ok(Value::new_num(v))
    }

    fn serialize_char(self, v: char) -> Res {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Res {
        Ok(Value::new_str(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Res {
        Ok(Value::new_list(v.iter().map(|b| Value::new_num(*b))))
    }

    fn serialize_none(self) -> Res {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, v: &T) -> Res {
        v.serialize(self)
    }

    fn serialize_unit(self) -> Res {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _: &'static str) -> Res {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, variant: &'static str) -> Res {
        Ok(Value::new_str(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _: &'static str, value: &T) -> Res {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        value: &T,
    ) -> Res {
        Ok(tagged(variant, value.serialize(self)?))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SeqLike, Error> {
        Ok(SeqLike(List::new()))
    }

    fn serialize_tuple(self, _len: usize) -> Result<SeqLike, Error> {
        Ok(SeqLike(List::new()))
    }

    fn serialize_tuple_struct(self, _: &'static str, _len: usize) -> Result<SeqLike, Error> {
        Ok(SeqLike(List::new()))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<VariantLike<SeqLike>, Error> {
        Ok(VariantLike {
            variant,
            inner: SeqLike(List::new()),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapLike, Error> {
        Ok(MapLike::default())
    }

    fn serialize_struct(self, _: &'static str, _len: usize) -> Result<MapLike, Error> {
        Ok(MapLike::default())
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        _: usize,
    ) -> Result<VariantLike<MapLike>, Error> {
        Ok(VariantLike {
            variant,
            inner: MapLike::default(),
        })
    }

    fn collect_str<T: ?Sized>(self, value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: std::fmt::Display,
    {
        self.serialize_str(&value.to_string())
    }
}

/// `{variant: content}`
fn tagged(variant: &'static str, content: Value) -> Value {
    Value::new_map(Some((Value::new_str(variant), content)))
}

/// Serialization error.
#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// A `Serialize` implementor called `serialize_value` before `serialize_key` while
    /// serializing a map.
    NoKeyAvailable,
    /// Some `Serialize` implementor error occurred.
    Message(String),
}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoKeyAvailable => {
                write!(f, "no key was available when trying to serialize map value")
            }
            Error::Message(s) => write!(f, "custom error: {}", s),
        }
    }
}

/// Collects sequence and tuple elements into a `List`.
pub struct SeqLike(List);

impl ser::SerializeSeq for SeqLike {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        self.0.push_back(value.serialize(Encoder)?);
        Ok(())
    }

    fn end(self) -> Res {
        Ok(Value::List(self.0))
    }
}

impl ser::SerializeTuple for SeqLike {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Res {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqLike {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Res {
        ser::SerializeSeq::end(self)
    }
}

/// Collects map entries and struct fields into a `Map`.
#[derive(Default)]
pub struct MapLike {
    key: Option<Value>,
    map: Map,
}

impl ser::SerializeMap for MapLike {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Error> {
        self.key = Some(key.serialize(Encoder)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        let key = self.key.take().ok_or(Error::NoKeyAvailable)?;
        self.map.insert(key, value.serialize(Encoder)?);
        Ok(())
    }

    fn serialize_entry<K, V>(&mut self, key: &K, value: &V) -> Result<(), Error>
    where
        K: ?Sized + Serialize,
        V: ?Sized + Serialize,
    {
        self.map
            .insert(key.serialize(Encoder)?, value.serialize(Encoder)?);
        Ok(())
    }

    fn end(self) -> Res {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStruct for MapLike {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        self.map
            .insert(Value::new_str(key), value.serialize(Encoder)?);
        Ok(())
    }

    fn end(self) -> Res {
        Ok(Value::Map(self.map))
    }
}

/// The content of a tuple or struct variant, wrapped as `{variant: content}` on `end`.
pub struct VariantLike<T> {
    variant: &'static str,
    inner: T,
}

impl ser::SerializeTupleVariant for VariantLike<SeqLike> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        ser::SerializeSeq::serialize_element(&mut self.inner, value)
    }

    fn end(self) -> Res {
        Ok(tagged(self.variant, ser::SerializeSeq::end(self.inner)?))
    }
}

impl ser::SerializeStructVariant for VariantLike<MapLike> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Res {
        Ok(tagged(self.variant, ser::SerializeStruct::end(self.inner)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn primitives() {
        assert_eq!(Value::enc(&true), Ok(Value::Bool(true)));
        assert_eq!(Value::enc(&-3i8), Ok(Value::new_num(-3)));
        assert_eq!(Value::enc(&u128::MAX), Ok(Value::new_num(u128::MAX)));
        assert_eq!(Value::enc(&'c'), Ok(Value::new_str("c")));
        assert_eq!(Value::enc(&()), Ok(Value::Null));
        assert_eq!(Value::enc(&None::<u8>), Ok(Value::Null));
        assert_eq!(Value::enc(&Some("x")), Ok(Value::new_str("x")));
    }

    #[test]
    fn collections() {
        let mut map = BTreeMap::new();
        map.insert(2u8, vec![true]);
        map.insert(1u8, vec![]);

        let expected = Value::new_map(vec![
            (Value::new_num(1), Value::new_list(None)),
            (Value::new_num(2), Value::new_list(vec![Value::Bool(true)])),
        ]);
        assert_eq!(Value::enc(&map), Ok(expected));
    }

    #[test]
    fn no_key() {
        use ser::{SerializeMap, Serializer};
        let mut map = Encoder.serialize_map(None).unwrap();
        assert_eq!(map.serialize_value(&1), Err(Error::NoKeyAvailable));
    }
}
