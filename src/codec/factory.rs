use super::*;
use crate::Shape;
use tracing::trace;

/// Builds codecs for the immutable and persistent collection types.
///
/// The persistent aliases are handled exactly like their immutable counterparts. Element, key
/// and value codecs are looked up in the registry from the descriptor's type arguments; a
/// missing argument is treated as [`Raw::Any`](crate::Raw::Any).
///
/// ```rust
/// # use imjson::*;
/// use imjson::codec::CodecFactory;
///
/// let registry = Registry::new();
/// let factory = CollectionFactory::new();
///
/// assert!(factory.create(&registry, &TypeDesc::new(Raw::PersistentSet)).unwrap().is_some());
/// assert!(factory.create(&registry, &TypeDesc::str()).unwrap().is_none());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollectionFactory {
    complex_map_keys: bool,
}

impl CollectionFactory {
    /// A factory writing maps as JSON objects only.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory that writes maps with array or object keys as arrays of `[key, value]` pairs
    /// when `complex_map_keys` is set.
    pub fn with_complex_map_keys(complex_map_keys: bool) -> Self {
        Self { complex_map_keys }
    }

    /// Whether complex map keys are enabled.
    pub fn complex_map_keys(&self) -> bool {
        self.complex_map_keys
    }
}

impl CodecFactory for CollectionFactory {
    fn create(&self, registry: &Registry, ty: &TypeDesc) -> Result<Option<Arc<dyn Codec>>, Error> {
        let shape = match ty.raw.shape() {
            Some(shape) => shape,
            None => {
                trace!(ty = %ty, "not a collection type");
                return Ok(None);
            }
        };

        let codec: Arc<dyn Codec> = match shape {
            Shape::Map => {
                let key = registry.codec(&ty.arg_or_any(0))?;
                let value = registry.codec(&ty.arg_or_any(1))?;
                Arc::new(MapCodec::new(key, value, self.complex_map_keys))
            }
            shape => Arc::new(SeqCodec::new(shape, registry.codec(&ty.arg_or_any(0))?)),
        };

        Ok(Some(codec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Raw;

    #[test]
    fn classifies_every_alias() {
        let r = Registry::new();
        let f = CollectionFactory::new();
        for raw in [
            Raw::ImmutableCollection,
            Raw::ImmutableList,
            Raw::ImmutableSet,
            Raw::ImmutableMap,
            Raw::PersistentCollection,
            Raw::PersistentList,
            Raw::PersistentSet,
            Raw::PersistentMap,
        ] {
            assert!(f.create(&r, &TypeDesc::new(raw)).unwrap().is_some());
        }
        for raw in [Raw::Any, Raw::Int, Raw::Named("Point".into())] {
            assert!(f.create(&r, &TypeDesc::new(raw)).unwrap().is_none());
        }
    }

    #[test]
    fn unparameterized_falls_back_to_any() {
        let r = Registry::new();
        let v = r
            .from_json(&TypeDesc::new(Raw::ImmutableList), r#"[1, "a", [true]]"#)
            .unwrap();
        assert_eq!(v.to_string(), r#"[1, "a", [true]]"#);

        let v = r
            .from_json(&TypeDesc::new(Raw::PersistentMap), r#"{"k": {"n": null}}"#)
            .unwrap();
        assert_eq!(v.to_string(), r#"{"k": {"n": null}}"#);
    }

    #[test]
    fn nested_codec_failures_propagate() {
        let r = Registry::builder().factory(CollectionFactory::new()).build();
        let ty = TypeDesc::list(TypeDesc::named("Point"));
        assert_eq!(
            r.codec(&ty).unwrap_err(),
            Error::NoCodec(TypeDesc::named("Point"))
        );
    }

    #[test]
    fn flag() {
        assert!(!CollectionFactory::new().complex_map_keys());
        assert!(CollectionFactory::with_complex_map_keys(true).complex_map_keys());
    }
}
