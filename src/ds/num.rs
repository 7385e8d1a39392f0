use std::cmp::{Eq, Ord, Ordering, PartialEq, PartialOrd};
use std::convert::TryInto;
use std::str::FromStr;
use std::{error, fmt};
use Number::*;

/// A JSON number.
///
/// `Number` keeps whatever precision the source text or Rust value had: _unsigned integers_,
/// _signed integers_ (both held as 128 bit), and _floating point_ (held as `f64`). The variants
/// are canonicalized so that `Eq` and `Ord` hold across them, which lets numbers act as set
/// elements and map keys: `1`, `1u8` and `1.0` are the same key.
///
/// The number line extends from negative infinity, through zero, to positive infinity. NaN is
/// above positive infinity. All zeroes compare equal (`-0 == +0`), as do all NaNs.
///
/// `[ -∞, .., 0, .., +∞, NaN ]`
///
/// # Examples
/// ```rust
/// # use imjson::*;
/// let n = Number::from(100u8);
/// assert_eq!(n, Number::from(100.0f32));
/// assert_eq!(n, Number::from(100i32));
/// assert_ne!(n, Number::from(99.99f64));
/// assert!(n > Number::from(-100));
/// ```
///
/// `Display` writes JSON number text. Floats always keep a fractional part so they read back
/// as floats.
/// ```rust
/// # use imjson::*;
/// assert_eq!(Number::from(3u8).to_string(), "3");
/// assert_eq!(Number::from(-3i64).to_string(), "-3");
/// assert_eq!(Number::from(3.0).to_string(), "3.0");
/// assert_eq!(Number::from(3.25).to_string(), "3.25");
/// ```
#[derive(Copy, Clone, Debug)]
#[allow(missing_docs)]
pub enum Number {
    Uint(u128),
    Int(i128),
    Float(f64),
}

/// Converting into a signed or unsigned integer fails when the number is outside the
/// integer's valid range or has a fractional part.
#[derive(Debug, PartialEq)]
pub struct IntoIntError;

/// The text is not a JSON number.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseNumberError(pub String);

impl error::Error for ParseNumberError {}

impl fmt::Display for ParseNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a JSON number", self.0)
    }
}

const TWO_POW_127: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
const TWO_POW_128: f64 = 340_282_366_920_938_463_463_374_607_431_768_211_456.0;

impl Number {
    /// Represent `Number` as an unsigned integer.
    ///
    /// ```rust
    /// # use imjson::*;
    /// use imjson::ds::IntoIntError;
    ///
    /// assert_eq!(Number::from(100i32).as_u128(), Ok(100));
    /// assert_eq!(Number::from(100.0).as_u128(), Ok(100));
    /// assert_eq!(Number::from(-100i32).as_u128(), Err(IntoIntError));
    /// assert_eq!(Number::from(0.5).as_u128(), Err(IntoIntError));
    /// assert_eq!(Number::from(1e40).as_u128(), Err(IntoIntError));
    /// ```
    pub fn as_u128(&self) -> Result<u128, IntoIntError> {
        match self {
            Uint(x) => Ok(*x),
            Int(x) => (*x).try_into().map_err(|_| IntoIntError),
            Float(x) => {
                // `as` saturates, so out of range floats must be caught first
                if x.fract() == 0.0 && *x >= 0.0 && *x < TWO_POW_128 {
                    Ok(*x as u128)
                } else {
                    Err(IntoIntError)
                }
            }
        }
    }

    /// Represent `Number` as a signed integer.
    ///
    /// ```rust
    /// # use imjson::*;
    /// use imjson::ds::IntoIntError;
    ///
    /// assert_eq!(Number::from(100u32).as_i128(), Ok(100));
    /// assert_eq!(Number::from(-100.0).as_i128(), Ok(-100));
    /// assert_eq!(Number::from(0.5).as_i128(), Err(IntoIntError));
    /// assert_eq!(Number::from(f64::NAN).as_i128(), Err(IntoIntError));
    /// assert_eq!(Number::from(-1e40).as_i128(), Err(IntoIntError));
    /// ```
    pub fn as_i128(&self) -> Result<i128, IntoIntError> {
        match self {
            Uint(x) => (*x).try_into().map_err(|_| IntoIntError),
            Int(x) => Ok(*x),
            Float(x) => {
                if x.fract() == 0.0 && *x >= -TWO_POW_127 && *x < TWO_POW_127 {
                    Ok(*x as i128)
                } else {
                    Err(IntoIntError)
                }
            }
        }
    }

    /// Represent `Number` as a floating point decimal.
    /// Does not fail, but is lossy for large integers.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Uint(x) => x as f64,
            Int(x) => x as f64,
            Float(x) => x,
        }
    }

    /// NaN and the infinities have no JSON representation.
    pub fn is_finite(&self) -> bool {
        match self {
            Float(x) => x.is_finite(),
            _ => true,
        }
    }
}

/// Parses JSON number text.
///
/// Text with a fraction or exponent becomes a `Float`, otherwise the narrowest integer variant
/// that holds it. Integers too large for 128 bits fall back to `Float`.
///
/// ```rust
/// # use imjson::*;
/// use std::str::FromStr;
///
/// assert!(matches!(Number::from_str("42"), Ok(Number::Uint(42))));
/// assert!(matches!(Number::from_str("-42"), Ok(Number::Int(-42))));
/// assert!(matches!(Number::from_str("4.2e1"), Ok(Number::Float(_))));
/// assert!(Number::from_str("inf").is_err());
/// assert!(Number::from_str("").is_err());
/// ```
impl FromStr for Number {
    type Err = ParseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseNumberError(s.to_string());

        let digits = s.strip_prefix('-').unwrap_or(s);
        if !digits.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(err());
        }

        let float = || {
            fast_float::parse::<f64, _>(s)
                .map(Float)
                .map_err(|_| err())
        };

        if s.bytes().any(|b| matches!(b, b'.' | b'e' | b'E')) {
            float()
        } else if s.starts_with('-') {
            lexical_core::parse::<i128>(s.as_bytes())
                .map(Int)
                .or_else(|_| float())
        } else {
            lexical_core::parse::<u128>(s.as_bytes())
                .map(Uint)
                .or_else(|_| float())
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; lexical_core::BUFFER_SIZE];
        let bytes: &[u8] = match *self {
            Uint(x) => lexical_core::write(x, &mut buf),
            Int(x) => lexical_core::write(x, &mut buf),
            Float(x) => lexical_core::write(x, &mut buf),
        };
        f.write_str(std::str::from_utf8(bytes).map_err(|_| fmt::Error)?)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Number) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

macro_rules! partial_eq_impl {
    ( $( $t:ty ),* ) => {
	$(
	impl PartialEq<$t> for Number {
	    fn eq(&self, rhs: &$t) -> bool {
		self.eq(&Number::from(*rhs))
	    }
	}
	)*
    };
}

partial_eq_impl!(usize, u8, u16, u32, u64, u128, isize, i8, i16, i32, i64, i128, f32, f64);

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Number) -> Ordering {
        match (*self, *other) {
            (Uint(lhs), Uint(rhs)) => lhs.cmp(&rhs),
            (Int(lhs), Int(rhs)) => lhs.cmp(&rhs),
            (Float(lhs), Float(rhs)) => cmp_float_to_float(lhs, rhs),

            (Uint(lhs), Int(rhs)) => cmp_uint_to_int(lhs, rhs),
            (Int(lhs), Uint(rhs)) => cmp_uint_to_int(rhs, lhs).reverse(),

            (Float(lhs), Uint(rhs)) => cmp_float_to_int(lhs, Int128::U(rhs)),
            (Uint(lhs), Float(rhs)) => cmp_float_to_int(rhs, Int128::U(lhs)).reverse(),
            (Float(lhs), Int(rhs)) => cmp_float_to_int(lhs, Int128::I(rhs)),
            (Int(lhs), Float(rhs)) => cmp_float_to_int(rhs, Int128::I(lhs)).reverse(),
        }
    }
}

/// `[ -INF | ... | 0 | ... | +INF | NaN ]`
fn cmp_float_to_float(lhs: f64, rhs: f64) -> Ordering {
    match lhs.partial_cmp(&rhs) {
        Some(ordering) => ordering,
        None => match (lhs.is_nan(), rhs.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            _ => Ordering::Less,
        },
    }
}

fn cmp_uint_to_int(lhs: u128, rhs: i128) -> Ordering {
    match TryInto::<u128>::try_into(rhs) {
        Ok(rhs) => lhs.cmp(&rhs),
        Err(_) => Ordering::Greater,
    }
}

#[derive(Copy, Clone)]
enum Int128 {
    U(u128),
    I(i128),
}

fn cmp_float_to_int(lhs: f64, rhs: Int128) -> Ordering {
    use Ordering::*;

    if lhs.is_nan() {
        return Greater;
    }
    if lhs.is_infinite() {
        return if lhs.is_sign_negative() { Less } else { Greater };
    }

    // compare against the integer part first; the fraction only breaks ties
    let floor = lhs.floor();
    let has_fract = lhs != floor;
    let by_floor = match rhs {
        Int128::U(_) if floor < 0.0 => return Less,
        Int128::U(_) if floor >= u128::MAX as f64 => return Greater,
        Int128::U(rhs) => (floor as u128).cmp(&rhs),
        Int128::I(_) if floor >= i128::MAX as f64 => return Greater,
        Int128::I(_) if floor < i128::MIN as f64 => return Less,
        Int128::I(rhs) => (floor as i128).cmp(&rhs),
    };

    match by_floor {
        Equal if has_fract => Greater,
        ord => ord,
    }
}

/// Rust numbers that convert into a [`Number`].
pub trait NumberType: Into<Number> {}

macro_rules! fr_uint {
	( $( $t:ty ),* ) => {
		$(
			impl From<$t> for Number {
				fn from(x: $t) -> Self {
					Number::Uint(x as u128)
				}
			}
			impl NumberType for $t {}
		)*
	};
}

macro_rules! fr_int {
	( $( $t:ty ),* ) => {
		$(
			impl From<$t> for Number {
				fn from(x: $t) -> Self {
					Number::Int(x as i128)
				}
			}
			impl NumberType for $t {}
		)*
	};
}

fr_uint!(usize, u8, u16, u32, u64, u128);
fr_int!(isize, i8, i16, i32, i64, i128);

impl From<f32> for Number {
    fn from(x: f32) -> Self {
        // go through the shortest decimal so 0.1f32 becomes 0.1, not 0.10000000149011612
        Number::Float(x.to_string().parse::<f64>().unwrap_or(x as f64))
    }
}

impl NumberType for f32 {}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Float(x)
    }
}

impl NumberType for f64 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_cmp() {
        use std::f64::{INFINITY, NAN, NEG_INFINITY};
        use Ordering::*;

        assert_eq!(cmp_float_to_float(0.0, 0.0), Equal);
        assert_eq!(cmp_float_to_float(0.0, -0.0), Equal);
        assert_eq!(cmp_float_to_float(0.1, 0.0), Greater);
        assert_eq!(cmp_float_to_float(-3.14, 3.14), Less);

        assert_eq!(cmp_float_to_float(NAN, INFINITY), Greater);
        assert_eq!(cmp_float_to_float(NEG_INFINITY, NAN), Less);
        assert_eq!(cmp_float_to_float(NAN, NAN), Equal);
        assert_eq!(cmp_float_to_float(INFINITY, NEG_INFINITY), Greater);
    }

    #[test]
    fn canonicalized_ordering() {
        use std::f64::{INFINITY, NAN, NEG_INFINITY};

        let mut set = std::collections::BTreeSet::new();

        set.insert(Number::from(0));
        set.insert((-0.0).into());
        set.insert((-1.0).into());
        set.insert(0.5.into());
        set.insert(INFINITY.into());
        set.insert((-100).into());
        set.insert(NAN.into());
        set.insert(NAN.into());
        set.insert(NEG_INFINITY.into());
        set.insert(100u8.into());

        let expected: Vec<Number> =
            vec![NEG_INFINITY, -100.0, -1.0, 0.0, 0.5, 100.0, INFINITY, NAN]
                .into_iter()
                .map(Number::from)
                .collect();

        assert_eq!(set.into_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn float_to_int_ordering() {
        assert!(Number::from(128u128) > Number::from(-3.14));
        assert!(Number::from(f64::INFINITY) > Number::from(u128::MAX));
        assert!(Number::from(f64::NAN) > Number::from(u128::MAX));
        assert!(Number::from(128u128) == Number::from(128.0));
        assert!(Number::from(128u128) < Number::from(128.1));

        assert!(Number::from(-128i128) < Number::from(-127.5));
        assert!(Number::from(-128i128) > Number::from(-128.5));
        assert!(Number::from(-128i128) == Number::from(-128.0));
        assert!(Number::from(f64::NEG_INFINITY) < Number::from(i128::MIN));
    }

    #[test]
    fn out_of_range_floats_are_not_integers() {
        assert_eq!(Number::from(1e40).as_u128(), Err(IntoIntError));
        assert_eq!(Number::from(1e40).as_i128(), Err(IntoIntError));
        assert_eq!(Number::from(-1e40).as_i128(), Err(IntoIntError));
        assert_eq!(Number::from(TWO_POW_128).as_u128(), Err(IntoIntError));
        assert_eq!(Number::from(TWO_POW_127).as_i128(), Err(IntoIntError));
        assert_eq!(Number::from(-TWO_POW_127).as_i128(), Ok(i128::MIN));
        assert_eq!(Number::from(2f64.powi(127)).as_u128(), Ok(1u128 << 127));
        assert_eq!(Number::from(f64::INFINITY).as_u128(), Err(IntoIntError));
    }

    #[test]
    fn eq_int_uint() {
        assert_ne!(Number::from(-123), Number::from(123usize));
        assert_eq!(Number::from(123isize), Number::from(123usize));
        assert_eq!(Number::from(0u8), 0.0f64);
        assert!(Number::from(128u128) > Number::from(-128i128));
    }

    #[test]
    fn parse_json_text() {
        assert_eq!("0".parse::<Number>(), Ok(Number::Uint(0)));
        assert_eq!("-0".parse::<Number>(), Ok(Number::Int(0)));
        assert_eq!("1.5".parse::<Number>(), Ok(Number::Float(1.5)));
        assert_eq!("-2E3".parse::<Number>(), Ok(Number::Float(-2000.0)));
        assert!(matches!(
            "340282366920938463463374607431768211456".parse::<Number>(),
            Ok(Number::Float(_))
        ));
        assert!("NaN".parse::<Number>().is_err());
        assert!("-".parse::<Number>().is_err());
        assert!("true".parse::<Number>().is_err());
    }

    #[test]
    fn display_keeps_float_fraction() {
        assert_eq!(Number::from(1.0).to_string(), "1.0");
        assert_eq!(Number::from(0.1f32).to_string(), "0.1");
        assert_eq!(Number::from(u128::MAX).to_string(), u128::MAX.to_string());
        assert_eq!(Number::from(i128::MIN).to_string(), i128::MIN.to_string());
    }
}
