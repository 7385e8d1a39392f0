//! Type-directed codecs for [`Value`]s.
//!
//! A [`Codec`] encodes values of one declared type to a [`JsonWrite`] and decodes them from a
//! [`JsonRead`]. Codecs are obtained from a [`Registry`], which asks its [`CodecFactory`]s in
//! turn whether they handle a [`TypeDesc`]. The [`CollectionFactory`] handles the immutable and
//! persistent collection types, resolving the codecs of their elements, keys and values from the
//! same registry.
//!
//! # Example
//! ```rust
//! # use imjson::*;
//! let registry = Registry::new();
//! let ty = TypeDesc::map(TypeDesc::int(), TypeDesc::list(TypeDesc::str()));
//!
//! let value = registry.from_json(&ty, r#"{"1": ["a", "b"], "2": []}"#).unwrap();
//! let key = Value::new_num(1);
//! assert_eq!(
//!     value.map().and_then(|m| m.get(&key)).map(|v| v.to_string()),
//!     Some(r#"["a", "b"]"#.to_string())
//! );
//!
//! assert_eq!(registry.to_json(&ty, &value).unwrap(), r#"{"1":["a","b"],"2":[]}"#);
//! ```
use crate::stream::{self, JsonRead, JsonWrite};
use crate::{TypeDesc, Value};
use std::sync::Arc;
use std::{error, fmt};

mod factory;
mod map;
mod prims;
mod registry;
mod seq;

pub use factory::CollectionFactory;
pub use map::{MapBuilder, MapCodec};
pub use prims::{AnyCodec, BoolCodec, CharCodec, FloatCodec, IntCodec, ScalarFactory, StrCodec};
pub use registry::{Registry, RegistryBuilder};
pub use seq::{SeqBuilder, SeqCodec};

/// Encodes and decodes values of one declared type.
///
/// Codecs are immutable once built and shared between threads behind an `Arc`. Every codec
/// writes `null` for [`Value::Null`] and reads `null` back as [`Value::Null`].
pub trait Codec: Send + Sync + fmt::Debug {
    /// Write `value` as JSON tokens.
    fn encode(&self, value: &Value, w: &mut dyn JsonWrite) -> Result<(), Error>;

    /// Read one value from the token stream.
    fn decode(&self, r: &mut dyn JsonRead) -> Result<Value, Error>;
}

/// Builds codecs for the type descriptors it recognises.
pub trait CodecFactory: Send + Sync + fmt::Debug {
    /// A codec for `ty`, or `Ok(None)` if this factory does not handle it.
    ///
    /// Codecs of nested types should be looked up through `registry`.
    fn create(&self, registry: &Registry, ty: &TypeDesc) -> Result<Option<Arc<dyn Codec>>, Error>;
}

/// Codec error.
#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// Reading or writing the token stream failed.
    Stream(stream::Error),
    /// A decoded map held the same key twice, or two keys of an encoded map share a member name.
    /// Carries the key text.
    DuplicateKey(String),
    /// A map key encoded to an array or object while complex keys are off. Carries the key text.
    ComplexKey(String),
    /// A value or token does not fit the codec's type.
    Mismatch {
        /// What the codec handles.
        expected: String,
        /// What it was given.
        found: String,
    },
    /// No registered codec or factory handles the type.
    NoCodec(TypeDesc),
}

impl Error {
    pub(crate) fn mismatch<E: Into<String>, F: Into<String>>(expected: E, found: F) -> Self {
        Error::Mismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl From<stream::Error> for Error {
    fn from(e: stream::Error) -> Self {
        Error::Stream(e)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Stream(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Stream(e) => write!(f, "{}", e),
            Error::DuplicateKey(key) => write!(f, "duplicate key: {}", key),
            Error::ComplexKey(key) => {
                write!(f, "cannot represent key as a JSON object name: {}", key)
            }
            Error::Mismatch { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            Error::NoCodec(ty) => write!(f, "no codec for type {}", ty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            Error::DuplicateKey("1".into()).to_string(),
            "duplicate key: 1"
        );
        assert_eq!(
            Error::ComplexKey("[1,2]".into()).to_string(),
            "cannot represent key as a JSON object name: [1,2]"
        );
        assert_eq!(
            Error::mismatch("a boolean", "string").to_string(),
            "expected a boolean, found string"
        );
        assert_eq!(
            Error::NoCodec(TypeDesc::named("Point")).to_string(),
            "no codec for type Point"
        );
        assert_eq!(
            Error::from(stream::Error::State("x".into())).to_string(),
            "invalid write: x"
        );
    }
}
