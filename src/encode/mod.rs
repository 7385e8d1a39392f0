//! [`Encoder`] and [`Decoder`] for converting between Rust data structures and [`Value`].
//!
//! Requires the _encode_ feature.
//!
//! The codecs work on [`Value`]s. This module leverages [`serde`] so that any type implementing
//! [`Serialize`] can be _encoded_ to a `Value` and pushed through a codec, and any type
//! implementing [`Deserialize`] can be _decoded_ from a `Value` a codec produced.
//!
//! # Examples
//! Encoding can be done for any type that implements [`Serialize`].
//!
//! ```rust
//! # use imjson::*;
//! let data = (100, "Hello, world!", 3.14);
//!
//! let expected = Value::new_list(vec![
//!     Value::new_num(100),
//!     Value::new_str("Hello, world!"),
//!     Value::new_num(3.14),
//! ]);
//!
//! assert_eq!(Value::enc(&data), Ok(expected));
//! ```
//!
//! A round trip through JSON text, with the codec deciding the wire format.
//! ```rust
//! # use imjson::*;
//! use std::collections::BTreeMap;
//!
//! let mut data = BTreeMap::new();
//! data.insert(1u32, vec!["a".to_string()]);
//! data.insert(2u32, vec![]);
//!
//! let registry = Registry::new();
//! let ty = TypeDesc::map(TypeDesc::int(), TypeDesc::list(TypeDesc::str()));
//!
//! let json = registry.to_json(&ty, &Value::enc(&data).unwrap()).unwrap();
//! assert_eq!(json, r#"{"1":["a"],"2":[]}"#);
//!
//! let back = registry.from_json(&ty, &json).unwrap();
//! assert_eq!(back.decode::<BTreeMap<u32, Vec<String>>>(), Ok(data));
//! ```
//!
//! [`Decoder`]: crate::encode::Decoder
//! [`Deserialize`]: crate::encode::Deserialize
//! [`Encoder`]: crate::encode::Encoder
//! [`serde`]: serde
//! [`Serialize`]: crate::encode::Serialize
use crate::*;

/// Reading a [`Value`] into any `Deserialize` type.
pub mod decoder;
/// Writing any `Serialize` type as a [`Value`].
pub mod encoder;

pub use self::decoder::Decoder;
pub use self::encoder::Encoder;
pub use serde::{Deserialize, Serialize};

impl Value {
    /// Encode `T` into a `Value`.
    ///
    /// Requires the _encode_ feature.
    ///
    /// Convenience function for `data.serialize(Encoder)`.
    ///
    /// See [`Encoder`](encode::Encoder) for usage.
    pub fn enc<T: ?Sized + Serialize>(data: &T) -> Result<Self, encoder::Error> {
        data.serialize(Encoder)
    }

    /// Attempt to decode a `Value` into type `T`.
    ///
    /// Requires the _encode_ feature.
    ///
    /// Convenience function for `<T as Deserialize>::deserialize(Decoder(self))`.
    ///
    /// See [`Decoder`](encode::Decoder) for usage.
    pub fn decode<'a, T: Deserialize<'a>>(&'a self) -> Result<T, decoder::Error> {
        <T as Deserialize>::deserialize(Decoder(self))
    }
}
