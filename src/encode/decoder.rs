use super::*;
use crate::Number;
use serde::de::{
    self,
    value::{MapDeserializer, SeqDeserializer},
    Unexpected, Visitor,
};
use std::convert::TryInto;
use std::{error, fmt};

type Res<T> = Result<T, Error>;

/// Decoder to pass to [`Deserialize::deserialize`] to decode a [`Value`] into a type.
///
/// The decoder borrows the value, so strings can be decoded into `&str` without copying. It reads
/// the layout produced by [`Encoder`](crate::encode::Encoder): `Null` decodes as `None` or unit,
/// any other value as `Some`, and enum variants are either a string (unit variants) or a map with
/// a single entry from the variant name to its content.
///
/// Numbers convert between representations where the value fits, so a float with no fractional
/// part decodes into an integer type. A string holding number text also decodes into an integer
/// type, which is how map keys read back from JSON member names.
///
/// # Examples
/// ```rust
/// # use imjson::*;
/// use imjson::encode::{Decoder, Deserialize};
///
/// let value = Value::new_list(vec![
///     Value::new_num(100),
///     Value::new_str("Hello, world!"),
///     Value::new_num(3.0),
/// ]);
///
/// let r = <(u32, &str, u8)>::deserialize(Decoder(&value));
/// assert_eq!(r, Ok((100, "Hello, world!", 3)));
///
/// assert_eq!(value.decode::<(u8, String, f32)>(), Ok((100, "Hello, world!".to_string(), 3.0)));
/// ```
///
/// [`Deserialize::deserialize`]: crate::encode::Deserialize::deserialize
pub struct Decoder<'de>(pub &'de Value);

macro_rules! deserialize_integer {
    ($($method:ident)*) => {
        $(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Res<V::Value> {
            match self.0 {
                Value::Num(n) => visit_number(integral(*n), visitor),
                Value::Str(s) => match s.parse::<Number>() {
                    Ok(n) => visit_number(integral(n), visitor),
                    Err(_) => visitor.visit_borrowed_str(s),
                },
                _ => de::Deserializer::deserialize_any(self, visitor),
            }
        }
        )*
    };
}

/// Whole floats become integers, anything else is left alone.
fn integral(n: Number) -> Number {
    match (n.as_u128(), n.as_i128()) {
        (Ok(x), _) => Number::Uint(x),
        (_, Ok(x)) => Number::Int(x),
        _ => n,
    }
}

fn visit_number<'de, V: Visitor<'de>>(n: Number, visitor: V) -> Res<V::Value> {
    // serde casts integers down from a 64 bit basis, but a 128 bit integer is never cast down,
    // so only visit 128 bits when the value does not fit in 64
    match n {
        Number::Uint(v) => match v.try_into() {
            Ok(v) => visitor.visit_u64(v),
            Err(_) => visitor.visit_u128(v),
        },
        Number::Int(v) => match v.try_into() {
            Ok(v) => visitor.visit_i64(v),
            Err(_) => visitor.visit_i128(v),
        },
        Number::Float(v) => visitor.visit_f64(v),
    }
}

impl<'de> de::Deserializer<'de> for Decoder<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Res<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.0 {
            Value::Null => visitor.visit_unit(),
            Value::Bool(v) => visitor.visit_bool(*v),
            Value::Num(n) => visit_number(*n, visitor),
            Value::Str(s) => visitor.visit_borrowed_str(s),
            Value::List(items) => visitor.visit_seq(SeqDeserializer::new(items.iter())),
            Value::Set(items) => visitor.visit_seq(SeqDeserializer::new(items.iter())),
            Value::Map(map) => visitor.visit_map(MapDeserializer::new(map.iter())),
        }
    }

    deserialize_integer! {
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128
    }

    serde::forward_to_deserialize_any! {
        bool f32 f64 str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Res<V::Value> {
        match self.0 {
            Value::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(de::Error::invalid_type(Unexpected::Str(s), &"char")),
                }
            }
            x => Err(de::Error::invalid_type(unexp_err(x), &"char")),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Res<V::Value> {
        match self.0 {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Res<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Res<V::Value> {
        match self.0 {
            Value::Str(variant) => visitor.visit_enum(Variant {
                variant,
                content: None,
            }),
            Value::Map(map) if map.len() == 1 => match map.iter().next() {
                Some((Value::Str(variant), content)) => visitor.visit_enum(Variant {
                    variant,
                    content: Some(content),
                }),
                _ => Err(de::Error::invalid_type(Unexpected::Map, &"enum variant")),
            },
            x => Err(de::Error::invalid_type(unexp_err(x), &"enum variant")),
        }
    }
}

impl<'de> de::IntoDeserializer<'de, Error> for &'de Value {
    type Deserializer = Decoder<'de>;
    fn into_deserializer(self) -> Decoder<'de> {
        Decoder(self)
    }
}

struct Variant<'de> {
    variant: &'de str,
    content: Option<&'de Value>,
}

impl<'de> de::EnumAccess<'de> for Variant<'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Error>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant: de::value::BorrowedStrDeserializer<'de, Error> =
            de::value::BorrowedStrDeserializer::new(self.variant);
        seed.deserialize(variant).map(|v| (v, self))
    }
}

impl<'de> de::VariantAccess<'de> for Variant<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Error> {
        match self.content {
            None | Some(Value::Null) => Ok(()),
            Some(x) => Err(de::Error::invalid_type(unexp_err(x), &"unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.content {
            Some(content) => seed.deserialize(Decoder(content)),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"newtype variant",
            )),
        }
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        match self.content {
            Some(Value::List(items)) if items.len() == len => {
                visitor.visit_seq(SeqDeserializer::new(items.iter()))
            }
            Some(Value::List(items)) => {
                let msg = format!("a list with {} element(s) was expected", len);
                Err(de::Error::invalid_length(items.len(), &msg.as_str()))
            }
            Some(x) => Err(de::Error::invalid_type(unexp_err(x), &"tuple variant")),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"tuple variant",
            )),
        }
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        match self.content {
            Some(Value::Map(map)) => visitor.visit_map(MapDeserializer::new(map.iter())),
            Some(x) => Err(de::Error::invalid_type(unexp_err(x), &"struct variant")),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"struct variant",
            )),
        }
    }
}

fn unexp_err(val: &Value) -> Unexpected<'_> {
    match val {
        Value::Null => Unexpected::Unit,
        Value::Bool(v) => Unexpected::Bool(*v),
        Value::Num(n) => match n {
            Number::Uint(n) => Unexpected::Unsigned((*n).try_into().unwrap_or(u64::MAX)),
            Number::Int(n) => Unexpected::Signed((*n).try_into().unwrap_or(i64::MIN)),
            Number::Float(n) => Unexpected::Float(*n),
        },
        Value::Str(v) => Unexpected::Str(v),
        Value::List(_) | Value::Set(_) => Unexpected::Seq,
        Value::Map(_) => Unexpected::Map,
    }
}

/// Deserialization error.
#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// Some `Deserialize` implementor error occurred, including type mismatches.
    Message(String),
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Message(s) => write!(f, "custom error: {}", s),
        }
    }
}
