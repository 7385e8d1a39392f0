use super::*;
use std::fmt;

/// A persistent ordered sequence. Runtime form of lists and bags.
pub type List = im::Vector<Value>;
/// A persistent set of unique values, iterated in sorted order.
pub type Set = im::OrdSet<Value>;
/// A persistent map with unique keys, iterated in key order.
pub type Map = im::OrdMap<Value, Value>;

/// A runtime value flowing through the codecs.
///
/// Scalars are leaves; `List`, `Set` and `Map` are backed by the persistent collections of the
/// [`im`] crate, so cloning a value is cheap and a decoded value is never mutated in place.
/// Immutable and persistent collection types declared through [`TypeDesc`] share these
/// representations, and a bag decodes to a `List`.
///
/// `Value` implements `Ord` so any value can be a set element or a map key, including nested
/// collections (the _complex keys_ of the map codec).
///
/// # Examples
/// ```rust
/// # use imjson::*;
/// let v = Value::new_list(vec![Value::new_num(1), Value::new_num(2)]);
/// assert_eq!(v.list().map(|l| l.len()), Some(2));
/// assert_eq!(v.to_string(), "[1, 2]");
///
/// let set = Value::new_set(vec![Value::new_num(2), Value::new_num(1), Value::new_num(2)]);
/// assert_eq!(set.to_string(), "{1, 2}");
///
/// let map = Value::new_map(vec![(Value::new_str("a"), Value::Bool(true))]);
/// assert_eq!(map.to_string(), "{\"a\": true}");
/// ```
///
/// [`im`]: https://docs.rs/im
/// [`TypeDesc`]: crate::TypeDesc
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Value {
    /// The absent value, JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number. See [`Number`].
    Num(Number),
    /// A string.
    Str(String),
    /// An ordered sequence.
    List(List),
    /// A set of unique values.
    Set(Set),
    /// A mapping of unique keys to values.
    Map(Map),
}

impl Value {
    /// A new number value from any Rust number.
    pub fn new_num<T: NumberType>(value: T) -> Self {
        Value::Num(value.into())
    }

    /// A new string value.
    pub fn new_str<S: Into<String>>(value: S) -> Self {
        Value::Str(value.into())
    }

    /// A new list, keeping the iteration order.
    pub fn new_list<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// A new set. Duplicate items are dropped.
    pub fn new_set<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Set(items.into_iter().collect())
    }

    /// A new map. Later entries replace earlier ones with an equal key.
    pub fn new_map<I: IntoIterator<Item = (Value, Value)>>(entries: I) -> Self {
        Value::Map(entries.into_iter().collect())
    }

    /// Is the value `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The boolean, if a boolean.
    pub fn bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The number, if a number.
    pub fn num(&self) -> Option<Number> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// The string, if a string.
    pub fn str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The list, if a list.
    pub fn list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// The set, if a set.
    pub fn set(&self) -> Option<&Set> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }

    /// The map, if a map.
    pub fn map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// A short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Num(_) => "number",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Num(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// A compact rendering for messages. Strings are quoted, sets render with braces, maps as
/// `{key: value}`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn seq<'a, I: Iterator<Item = &'a Value>>(
            f: &mut fmt::Formatter<'_>,
            open: char,
            close: char,
            items: I,
        ) -> fmt::Result {
            write!(f, "{}", open)?;
            for (idx, item) in items.enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", item)?;
            }
            write!(f, "{}", close)
        }

        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Num(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(l) => seq(f, '[', ']', l.iter()),
            Value::Set(s) => seq(f, '{', '}', s.iter()),
            Value::Map(m) => {
                f.write_str("{")?;
                for (idx, (k, v)) in m.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_equality_is_canonical() {
        let a = Value::new_set(vec![Value::new_num(1u8), Value::new_num(2.0)]);
        let b = Value::new_set(vec![Value::new_num(2i64), Value::new_num(1.0)]);
        assert_eq!(a, b);
        assert_eq!(a.set().map(|s| s.len()), Some(2));
    }

    #[test]
    fn complex_values_as_keys() {
        let key = Value::new_list(vec![Value::new_num(1), Value::new_num(2)]);
        let map = Value::new_map(vec![(key.clone(), Value::new_str("x"))]);
        assert_eq!(
            map.map().and_then(|m| m.get(&key)),
            Some(&Value::new_str("x"))
        );
        assert_eq!(map.to_string(), "{[1, 2]: \"x\"}");
    }

    #[test]
    fn accessors() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Bool(true).bool(), Some(true));
        assert_eq!(Value::new_str("hi").str(), Some("hi"));
        assert_eq!(Value::new_str("hi").num(), None);
        assert_eq!(Value::new_num(3).num(), Some(Number::from(3)));
        assert_eq!(Value::new_list(None).list().map(|l| l.is_empty()), Some(true));
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::new_map(None).kind(), "map");
    }

    #[test]
    fn ordering_is_total_across_variants() {
        let mut v = vec![
            Value::new_str("a"),
            Value::new_num(1),
            Value::Null,
            Value::Bool(false),
        ];
        v.sort();
        assert_eq!(
            v,
            vec![
                Value::Null,
                Value::Bool(false),
                Value::new_num(1),
                Value::new_str("a")
            ]
        );
    }
}
