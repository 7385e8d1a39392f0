use super::*;
use crate::stream::{TextReader, TextWriter, Token};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Resolves [`TypeDesc`]s to codecs.
///
/// Lookup order is: codecs registered for an exact descriptor, then the factories in the order
/// they were added, then the built-in [`ScalarFactory`]. A resolved codec is cached per
/// descriptor, so each type is built once. The cache lock is not held while a factory runs,
/// which lets factories resolve nested types through the same registry.
///
/// # Example
/// ```rust
/// # use imjson::*;
/// let registry = Registry::builder()
///     .factory(CollectionFactory::with_complex_map_keys(true))
///     .build();
///
/// let ty = TypeDesc::map(TypeDesc::list(TypeDesc::int()), TypeDesc::str());
/// let value = registry.from_json(&ty, r#"[[[1, 2], "x"]]"#).unwrap();
/// assert_eq!(value.to_string(), r#"{[1, 2]: "x"}"#);
/// assert_eq!(registry.to_json(&ty, &value).unwrap(), r#"[[[1,2],"x"]]"#);
///
/// let err = registry.codec(&TypeDesc::named("Point")).unwrap_err();
/// assert_eq!(err.to_string(), "no codec for type Point");
/// ```
#[derive(Debug)]
pub struct Registry {
    codecs: HashMap<TypeDesc, Arc<dyn Codec>>,
    factories: Vec<Box<dyn CodecFactory>>,
    cache: RwLock<HashMap<TypeDesc, Arc<dyn Codec>>>,
}

/// Collects codecs and factories for a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    codecs: HashMap<TypeDesc, Arc<dyn Codec>>,
    factories: Vec<Box<dyn CodecFactory>>,
}

impl RegistryBuilder {
    /// Use `codec` for exactly `ty`. A later registration for the same descriptor replaces an
    /// earlier one.
    pub fn codec<C: Codec + 'static>(mut self, ty: TypeDesc, codec: C) -> Self {
        self.codecs.insert(ty, Arc::new(codec));
        self
    }

    /// Append a factory. Factories are asked in the order they are added.
    pub fn factory<F: CodecFactory + 'static>(mut self, factory: F) -> Self {
        self.factories.push(Box::new(factory));
        self
    }

    /// Finish the registry.
    pub fn build(self) -> Registry {
        let mut factories = self.factories;
        factories.push(Box::new(ScalarFactory));

        Registry {
            codecs: self.codecs,
            factories,
            cache: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// A registry resolving the scalar and collection types, complex map keys off.
    pub fn new() -> Self {
        Self::builder().factory(CollectionFactory::new()).build()
    }

    /// An empty builder. Only the scalar types resolve unless factories are added.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The codec for `ty`.
    pub fn codec(&self, ty: &TypeDesc) -> Result<Arc<dyn Codec>, Error> {
        if let Some(codec) = self.codecs.get(ty) {
            return Ok(Arc::clone(codec));
        }

        if let Some(codec) = self.cache.read().get(ty) {
            trace!(ty = %ty, "codec cache hit");
            return Ok(Arc::clone(codec));
        }

        for factory in &self.factories {
            match factory.create(self, ty)? {
                Some(codec) => {
                    debug!(ty = %ty, ?factory, "created codec");
                    let mut cache = self.cache.write();
                    // a nested lookup may have resolved the same type meanwhile
                    let codec = cache.entry(ty.clone()).or_insert(codec);
                    return Ok(Arc::clone(codec));
                }
                None => trace!(ty = %ty, ?factory, "factory does not handle type"),
            }
        }

        Err(Error::NoCodec(ty.clone()))
    }

    /// Encode `value` as `ty` into `w`.
    pub fn encode(&self, ty: &TypeDesc, value: &Value, w: &mut dyn JsonWrite) -> Result<(), Error> {
        self.codec(ty)?.encode(value, w)
    }

    /// Decode a value of `ty` from `r`.
    pub fn decode(&self, ty: &TypeDesc, r: &mut dyn JsonRead) -> Result<Value, Error> {
        self.codec(ty)?.decode(r)
    }

    /// Encode `value` as `ty` to compact JSON text.
    pub fn to_json(&self, ty: &TypeDesc, value: &Value) -> Result<String, Error> {
        let mut w = TextWriter::new();
        self.encode(ty, value, &mut w)?;
        Ok(w.finish()?)
    }

    /// Encode `value` as `ty` to indented JSON text.
    pub fn to_json_pretty(&self, ty: &TypeDesc, value: &Value) -> Result<String, Error> {
        let mut w = TextWriter::pretty();
        self.encode(ty, value, &mut w)?;
        Ok(w.finish()?)
    }

    /// Decode a value of `ty` from JSON text. The text must hold exactly one value.
    pub fn from_json(&self, ty: &TypeDesc, text: &str) -> Result<Value, Error> {
        let mut r = TextReader::new(text);
        let value = self.decode(ty, &mut r)?;
        match r.peek()? {
            Token::End => Ok(value),
            t => Err(Error::mismatch(Token::End.to_string(), t.to_string())),
        }
    }
}
