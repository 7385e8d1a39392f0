//! Scalar codecs and the factory that resolves them.
use super::*;
use crate::stream::Token;
use crate::{Number, Raw, Shape};
use tracing::trace;

/// Codec of any JSON value, driven by the runtime value on encode and the next token on
/// decode.
///
/// Arrays decode to lists and objects to maps with string keys. Collections are encoded through
/// [`SeqCodec`] and [`MapCodec`] with `AnyCodec` elements, so maps follow the usual key rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnyCodec;

impl AnyCodec {
    fn seq(shape: Shape) -> SeqCodec {
        SeqCodec::new(shape, Arc::new(AnyCodec))
    }

    fn map() -> MapCodec {
        MapCodec::new(Arc::new(AnyCodec), Arc::new(AnyCodec), false)
    }
}

impl Codec for AnyCodec {
    fn encode(&self, value: &Value, w: &mut dyn JsonWrite) -> Result<(), Error> {
        match value {
            Value::Null => w.null()?,
            Value::Bool(b) => w.bool(*b)?,
            Value::Num(n) => w.number(*n)?,
            Value::Str(s) => w.string(s)?,
            Value::List(_) => Self::seq(Shape::List).encode(value, w)?,
            Value::Set(_) => Self::seq(Shape::Set).encode(value, w)?,
            Value::Map(_) => Self::map().encode(value, w)?,
        }
        Ok(())
    }

    fn decode(&self, r: &mut dyn JsonRead) -> Result<Value, Error> {
        let value = match r.peek()? {
            Token::Null => r.next_null().map(|_| Value::Null),
            Token::Bool => r.next_bool().map(Value::Bool),
            Token::Num => r.next_number().map(Value::Num),
            Token::Str => r.next_str().map(Value::Str),
            Token::BeginArray => return Self::seq(Shape::List).decode(r),
            Token::BeginObject => return Self::map().decode(r),
            t => return Err(Error::mismatch("a value", t.to_string())),
        };
        Ok(value?)
    }
}

/// Codec of `true` and `false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoolCodec;

impl Codec for BoolCodec {
    fn encode(&self, value: &Value, w: &mut dyn JsonWrite) -> Result<(), Error> {
        match value {
            Value::Null => Ok(w.null()?),
            Value::Bool(b) => Ok(w.bool(*b)?),
            x => Err(Error::mismatch("a boolean", x.kind())),
        }
    }

    fn decode(&self, r: &mut dyn JsonRead) -> Result<Value, Error> {
        if r.peek()? == Token::Null {
            r.next_null()?;
            return Ok(Value::Null);
        }
        Ok(Value::Bool(r.next_bool()?))
    }
}

/// Codec of integers. A float with no fractional part is accepted and written as an integer.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntCodec;

fn integral(n: Number) -> Result<Number, Error> {
    match (n.as_u128(), n.as_i128()) {
        (Ok(x), _) => Ok(Number::Uint(x)),
        (_, Ok(x)) => Ok(Number::Int(x)),
        _ => Err(Error::mismatch("an integer", n.to_string())),
    }
}

impl Codec for IntCodec {
    fn encode(&self, value: &Value, w: &mut dyn JsonWrite) -> Result<(), Error> {
        match value {
            Value::Null => Ok(w.null()?),
            Value::Num(n) => Ok(w.number(integral(*n)?)?),
            x => Err(Error::mismatch("an integer", x.kind())),
        }
    }

    fn decode(&self, r: &mut dyn JsonRead) -> Result<Value, Error> {
        if r.peek()? == Token::Null {
            r.next_null()?;
            return Ok(Value::Null);
        }
        integral(r.next_number()?).map(Value::Num)
    }
}

/// Codec of floating point numbers. Integers widen to `f64`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FloatCodec;

impl Codec for FloatCodec {
    fn encode(&self, value: &Value, w: &mut dyn JsonWrite) -> Result<(), Error> {
        match value {
            Value::Null => Ok(w.null()?),
            Value::Num(n) => Ok(w.number(Number::Float(n.as_f64()))?),
            x => Err(Error::mismatch("a float", x.kind())),
        }
    }

    fn decode(&self, r: &mut dyn JsonRead) -> Result<Value, Error> {
        if r.peek()? == Token::Null {
            r.next_null()?;
            return Ok(Value::Null);
        }
        Ok(Value::Num(Number::Float(r.next_number()?.as_f64())))
    }
}

/// Codec of strings. Number tokens are read as their text.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrCodec;

impl Codec for StrCodec {
    fn encode(&self, value: &Value, w: &mut dyn JsonWrite) -> Result<(), Error> {
        match value {
            Value::Null => Ok(w.null()?),
            Value::Str(s) => Ok(w.string(s)?),
            x => Err(Error::mismatch("a string", x.kind())),
        }
    }

    fn decode(&self, r: &mut dyn JsonRead) -> Result<Value, Error> {
        if r.peek()? == Token::Null {
            r.next_null()?;
            return Ok(Value::Null);
        }
        Ok(Value::Str(r.next_str()?))
    }
}

/// Codec of single characters, held as one-character strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharCodec;

fn single_char(s: &str) -> Result<(), Error> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(_), None) => Ok(()),
        _ => Err(Error::mismatch("a single character", format!("{:?}", s))),
    }
}

impl Codec for CharCodec {
    fn encode(&self, value: &Value, w: &mut dyn JsonWrite) -> Result<(), Error> {
        match value {
            Value::Null => Ok(w.null()?),
            Value::Str(s) => {
                single_char(s)?;
                Ok(w.string(s)?)
            }
            x => Err(Error::mismatch("a character", x.kind())),
        }
    }

    fn decode(&self, r: &mut dyn JsonRead) -> Result<Value, Error> {
        if r.peek()? == Token::Null {
            r.next_null()?;
            return Ok(Value::Null);
        }
        let s = r.next_str()?;
        single_char(&s)?;
        Ok(Value::Str(s))
    }
}

/// Resolves the scalar tags: `Any`, `Bool`, `Int`, `Float`, `Str` and `Char`.
///
/// Every [`Registry`] consults this factory after its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarFactory;

impl CodecFactory for ScalarFactory {
    fn create(&self, _: &Registry, ty: &TypeDesc) -> Result<Option<Arc<dyn Codec>>, Error> {
        let codec: Arc<dyn Codec> = match ty.raw {
            Raw::Any => Arc::new(AnyCodec),
            Raw::Bool => Arc::new(BoolCodec),
            Raw::Int => Arc::new(IntCodec),
            Raw::Float => Arc::new(FloatCodec),
            Raw::Str => Arc::new(StrCodec),
            Raw::Char => Arc::new(CharCodec),
            _ => {
                trace!(ty = %ty, "not a scalar type");
                return Ok(None);
            }
        };
        Ok(Some(codec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{TextReader, TextWriter};

    fn decode(codec: &dyn Codec, text: &str) -> Result<Value, Error> {
        codec.decode(&mut TextReader::new(text))
    }

    fn encode(codec: &dyn Codec, value: &Value) -> Result<String, Error> {
        let mut w = TextWriter::new();
        codec.encode(value, &mut w)?;
        Ok(w.finish()?)
    }

    #[test]
    fn any_follows_the_tokens() {
        let v = decode(&AnyCodec, r#"{"a": [1, "b", null], "c": {"d": true}}"#).unwrap();
        assert_eq!(v.to_string(), r#"{"a": [1, "b", null], "c": {"d": true}}"#);
        assert_eq!(
            encode(&AnyCodec, &v).unwrap(),
            r#"{"a":[1,"b",null],"c":{"d":true}}"#
        );
    }

    #[test]
    fn any_encodes_sets_as_arrays() {
        let v = Value::new_set(vec![Value::new_str("b"), Value::new_str("a")]);
        assert_eq!(encode(&AnyCodec, &v).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn ints() {
        assert_eq!(decode(&IntCodec, "-4"), Ok(Value::new_num(-4)));
        assert_eq!(decode(&IntCodec, "4.0"), Ok(Value::new_num(4)));
        assert_eq!(decode(&IntCodec, r#""12""#), Ok(Value::new_num(12)));
        assert!(matches!(
            decode(&IntCodec, "4.5"),
            Err(Error::Mismatch { .. })
        ));
        assert_eq!(encode(&IntCodec, &Value::new_num(2.0)).unwrap(), "2");
    }

    #[test]
    fn ints_out_of_range() {
        for text in &["1e40", "-1e40", "3.5e38"] {
            assert!(matches!(
                decode(&IntCodec, text),
                Err(Error::Mismatch { .. })
            ));
        }
        assert!(encode(&IntCodec, &Value::new_num(-1e40)).is_err());
    }

    #[test]
    fn floats() {
        assert_eq!(encode(&FloatCodec, &Value::new_num(2)).unwrap(), "2.0");
        assert_eq!(decode(&FloatCodec, "1e2"), Ok(Value::new_num(100.0)));
        assert!(matches!(
            encode(&FloatCodec, &Value::new_num(f64::INFINITY)),
            Err(Error::Stream(stream::Error::NonFinite(_)))
        ));
    }

    #[test]
    fn strings_and_chars() {
        assert_eq!(decode(&StrCodec, "15"), Ok(Value::new_str("15")));
        assert_eq!(decode(&CharCodec, r#""é""#), Ok(Value::new_str("é")));
        assert!(decode(&CharCodec, r#""ab""#).is_err());
        assert!(decode(&CharCodec, r#""""#).is_err());
        assert!(encode(&CharCodec, &Value::new_str("ab")).is_err());
    }

    #[test]
    fn scalars_are_null_safe() {
        let codecs: [&dyn Codec; 6] = [
            &AnyCodec,
            &BoolCodec,
            &IntCodec,
            &FloatCodec,
            &StrCodec,
            &CharCodec,
        ];
        for codec in codecs {
            assert_eq!(decode(codec, "null"), Ok(Value::Null));
            assert_eq!(encode(codec, &Value::Null).unwrap(), "null");
        }
    }

    #[test]
    fn mismatched_values() {
        assert_eq!(
            encode(&BoolCodec, &Value::new_str("true")),
            Err(Error::mismatch("a boolean", "string"))
        );
        assert!(encode(&StrCodec, &Value::new_num(1)).is_err());
    }

    #[test]
    fn scalar_factory() {
        let registry = Registry::builder().build();
        let f = ScalarFactory;
        assert!(f.create(&registry, &TypeDesc::int()).unwrap().is_some());
        assert!(f
            .create(&registry, &TypeDesc::named("Point"))
            .unwrap()
            .is_none());
        assert!(f
            .create(&registry, &TypeDesc::list(TypeDesc::int()))
            .unwrap()
            .is_none());
    }
}
