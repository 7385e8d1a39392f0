//! JSON codecs for immutable and persistent collections.
//!
//! `imjson` teaches a type-directed JSON engine to read and write bags, lists, sets and maps.
//! Types are described at runtime by a [`TypeDesc`], a raw tag plus type arguments, and a
//! [`Registry`] resolves each descriptor to a [`Codec`](codec::Codec). The
//! [`CollectionFactory`] recognises the collection tags, both the _immutable_ and the
//! _persistent_ flavours, and builds codecs for them out of the codecs of their elements, keys
//! and values.
//!
//! Decoded collections are [`Value`]s backed by the persistent data structures of the
//! [`im`](https://docs.rs/im) crate.
//!
//! # Wire format
//! - Bags, lists and sets are JSON arrays. A set drops repeated elements when decoded.
//! - Maps are JSON objects. Keys are encoded with the key codec and turned into member names,
//!   so numeric and boolean keys round trip: `{"1": true}` decodes under `ImmutableMap<Int, Bool>`.
//! - With [`CollectionFactory::with_complex_map_keys`], a map with a key that encodes to an
//!   array or object is written as an array of `[key, value]` pairs.
//! - An absent collection is `null`.
//!
//! Decoding a map that repeats a key fails.
//!
//! # Example
//! ```rust
//! use imjson::*;
//!
//! let registry = Registry::new();
//! let ty = TypeDesc::set(TypeDesc::int());
//!
//! let set = registry.from_json(&ty, "[1, 2, 2, 3]").unwrap();
//! assert_eq!(set.set().map(|s| s.len()), Some(3));
//! assert_eq!(registry.to_json(&ty, &set).unwrap(), "[1,2,3]");
//!
//! let ty = TypeDesc::map(TypeDesc::int(), TypeDesc::int());
//! let err = registry.from_json(&ty, r#"{"1": 1, "1": 2}"#).unwrap_err();
//! assert_eq!(err.to_string(), "duplicate key: 1");
//! ```
//!
//! Complex keys are opt-in.
//! ```rust
//! use imjson::*;
//!
//! let ty = TypeDesc::map(TypeDesc::list(TypeDesc::int()), TypeDesc::str());
//! let value = Value::new_map(vec![(
//!     Value::new_list(vec![Value::new_num(1), Value::new_num(2)]),
//!     Value::new_str("x"),
//! )]);
//!
//! let err = Registry::new().to_json(&ty, &value).unwrap_err();
//! assert_eq!(err.to_string(), "cannot represent key as a JSON object name: [1,2]");
//!
//! let registry = Registry::builder()
//!     .factory(CollectionFactory::with_complex_map_keys(true))
//!     .build();
//! let json = registry.to_json(&ty, &value).unwrap();
//! assert_eq!(json, r#"[[[1,2],"x"]]"#);
//! assert_eq!(registry.from_json(&ty, &json), Ok(value));
//! ```
//!
//! # Features
//! - _encode_ (default): the [`encode`] module, converting any `serde` type to and from a
//!   [`Value`].
#![warn(missing_docs)]

pub mod codec;
pub mod ds;
#[cfg(feature = "encode")]
pub mod encode;
pub mod stream;

pub use codec::{CollectionFactory, Registry};
pub use ds::{List, Map, Number, NumberType, Raw, Set, Shape, TypeDesc, Value};
