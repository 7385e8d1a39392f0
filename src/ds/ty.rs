use std::borrow::Cow;
use std::fmt;

/// The unparameterized part of a type descriptor.
///
/// Collection tags come in two flavours, _immutable_ and _persistent_. They share a runtime
/// representation and a codec; the flavour only records what the caller declared.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Raw {
    /// Any JSON value, decided by the runtime value or the next token.
    Any,
    /// `true` or `false`.
    Bool,
    /// A number without a fractional part.
    Int,
    /// A floating point number.
    Float,
    /// A string.
    Str,
    /// A string holding exactly one character.
    Char,
    /// An iterable of elements with no uniqueness guarantee.
    ImmutableCollection,
    /// An ordered sequence.
    ImmutableList,
    /// A collection of unique elements.
    ImmutableSet,
    /// Unique keys mapped to values.
    ImmutableMap,
    /// Persistent alias of [`Raw::ImmutableCollection`].
    PersistentCollection,
    /// Persistent alias of [`Raw::ImmutableList`].
    PersistentList,
    /// Persistent alias of [`Raw::ImmutableSet`].
    PersistentSet,
    /// Persistent alias of [`Raw::ImmutableMap`].
    PersistentMap,
    /// A user type, resolved by a codec registered under the same name.
    Named(Cow<'static, str>),
}

/// The four collection shapes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Unordered multiset-like iterable.
    Bag,
    /// Ordered sequence.
    List,
    /// Unique elements.
    Set,
    /// Key to value mapping.
    Map,
}

impl Raw {
    /// The collection shape of this tag, if it is a collection.
    ///
    /// Immutable and persistent aliases classify identically.
    ///
    /// ```rust
    /// # use imjson::*;
    /// assert_eq!(Raw::ImmutableList.shape(), Some(Shape::List));
    /// assert_eq!(Raw::PersistentList.shape(), Some(Shape::List));
    /// assert_eq!(Raw::Str.shape(), None);
    /// ```
    pub fn shape(&self) -> Option<Shape> {
        use Raw::*;
        match self {
            ImmutableCollection | PersistentCollection => Some(Shape::Bag),
            ImmutableList | PersistentList => Some(Shape::List),
            ImmutableSet | PersistentSet => Some(Shape::Set),
            ImmutableMap | PersistentMap => Some(Shape::Map),
            _ => None,
        }
    }

    /// Is this a persistent collection alias.
    pub fn is_persistent(&self) -> bool {
        use Raw::*;
        matches!(
            self,
            PersistentCollection | PersistentList | PersistentSet | PersistentMap
        )
    }

    fn name(&self) -> &str {
        use Raw::*;
        match self {
            Any => "Any",
            Bool => "Bool",
            Int => "Int",
            Float => "Float",
            Str => "Str",
            Char => "Char",
            ImmutableCollection => "ImmutableCollection",
            ImmutableList => "ImmutableList",
            ImmutableSet => "ImmutableSet",
            ImmutableMap => "ImmutableMap",
            PersistentCollection => "PersistentCollection",
            PersistentList => "PersistentList",
            PersistentSet => "PersistentSet",
            PersistentMap => "PersistentMap",
            Named(name) => name,
        }
    }
}

/// A type descriptor: a [`Raw`] tag plus its type arguments.
///
/// This is the data that codec factories pattern match on. A descriptor with no arguments is
/// _unparameterized_; collection factories then treat every parameter as [`Raw::Any`].
///
/// # Example
/// ```rust
/// # use imjson::*;
/// let ty = TypeDesc::map(TypeDesc::str(), TypeDesc::list(TypeDesc::int()));
/// assert_eq!(ty.to_string(), "ImmutableMap<Str, ImmutableList<Int>>");
/// assert_eq!(ty.arg(1), Some(&TypeDesc::list(TypeDesc::int())));
///
/// let raw = TypeDesc::new(Raw::PersistentSet);
/// assert_eq!(raw.to_string(), "PersistentSet");
/// assert_eq!(raw.arg(0), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeDesc {
    /// The unparameterized type.
    pub raw: Raw,
    /// Type arguments, in declaration order.
    pub args: Vec<TypeDesc>,
}

impl TypeDesc {
    /// An unparameterized descriptor.
    pub fn new(raw: Raw) -> Self {
        Self {
            raw,
            args: Vec::new(),
        }
    }

    /// A parameterized descriptor.
    pub fn with_args<I: IntoIterator<Item = TypeDesc>>(raw: Raw, args: I) -> Self {
        Self {
            raw,
            args: args.into_iter().collect(),
        }
    }

    /// A user type resolved by name.
    pub fn named<S: Into<Cow<'static, str>>>(name: S) -> Self {
        Self::new(Raw::Named(name.into()))
    }

    /// [`Raw::Any`].
    pub fn any() -> Self {
        Self::new(Raw::Any)
    }

    /// [`Raw::Bool`].
    pub fn bool() -> Self {
        Self::new(Raw::Bool)
    }

    /// [`Raw::Int`].
    pub fn int() -> Self {
        Self::new(Raw::Int)
    }

    /// [`Raw::Float`].
    pub fn float() -> Self {
        Self::new(Raw::Float)
    }

    /// [`Raw::Str`].
    pub fn str() -> Self {
        Self::new(Raw::Str)
    }

    /// [`Raw::Char`].
    pub fn char() -> Self {
        Self::new(Raw::Char)
    }

    /// `ImmutableCollection<elem>`.
    pub fn bag(elem: TypeDesc) -> Self {
        Self::with_args(Raw::ImmutableCollection, Some(elem))
    }

    /// `ImmutableList<elem>`.
    pub fn list(elem: TypeDesc) -> Self {
        Self::with_args(Raw::ImmutableList, Some(elem))
    }

    /// `ImmutableSet<elem>`.
    pub fn set(elem: TypeDesc) -> Self {
        Self::with_args(Raw::ImmutableSet, Some(elem))
    }

    /// `ImmutableMap<key, value>`.
    pub fn map(key: TypeDesc, value: TypeDesc) -> Self {
        Self::with_args(Raw::ImmutableMap, vec![key, value])
    }

    /// The type argument at `idx`, if parameterized.
    pub fn arg(&self, idx: usize) -> Option<&TypeDesc> {
        self.args.get(idx)
    }

    /// The type argument at `idx`, or [`Raw::Any`] when the descriptor is unparameterized.
    pub fn arg_or_any(&self, idx: usize) -> TypeDesc {
        self.arg(idx).cloned().unwrap_or_else(TypeDesc::any)
    }
}

impl From<Raw> for TypeDesc {
    fn from(raw: Raw) -> Self {
        TypeDesc::new(raw)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw.name())?;
        if let Some((first, rest)) = self.args.split_first() {
            write!(f, "<{}", first)?;
            for arg in rest {
                write!(f, ", {}", arg)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistent_aliases_share_shapes() {
        let pairs = [
            (Raw::ImmutableCollection, Raw::PersistentCollection),
            (Raw::ImmutableList, Raw::PersistentList),
            (Raw::ImmutableSet, Raw::PersistentSet),
            (Raw::ImmutableMap, Raw::PersistentMap),
        ];

        for (im, pe) in pairs.iter() {
            assert!(im.shape().is_some());
            assert_eq!(im.shape(), pe.shape());
            assert!(!im.is_persistent());
            assert!(pe.is_persistent());
        }
    }

    #[test]
    fn non_collections_have_no_shape() {
        for raw in [Raw::Any, Raw::Bool, Raw::Int, Raw::Float, Raw::Str, Raw::Char] {
            assert_eq!(raw.shape(), None);
        }
        assert_eq!(TypeDesc::named("Point").raw.shape(), None);
    }

    #[test]
    fn unparameterized_args_fall_back_to_any() {
        let ty = TypeDesc::new(Raw::ImmutableMap);
        assert_eq!(ty.arg_or_any(0), TypeDesc::any());
        assert_eq!(ty.arg_or_any(1), TypeDesc::any());

        let ty = TypeDesc::list(TypeDesc::int());
        assert_eq!(ty.arg_or_any(0), TypeDesc::int());
    }

    #[test]
    fn display_nested() {
        let ty = TypeDesc::with_args(
            Raw::PersistentList,
            Some(TypeDesc::set(TypeDesc::named("Point"))),
        );
        assert_eq!(ty.to_string(), "PersistentList<ImmutableSet<Point>>");
    }
}
