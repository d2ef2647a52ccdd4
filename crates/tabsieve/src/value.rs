//! Resolved field values and the numeric and time types they carry.
//!
//! A [`Value`] is what a field resolves to once a [`Shape`](crate::Shape) has
//! located it inside a row or record. Values borrow from the source data, so
//! resolving a field never copies the underlying text.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Resolved field value, borrowed from the source row or record.
///
/// # Example
///
/// ```
/// use tabsieve::{Number, Value};
///
/// struct Trade {
///     symbol: String,
///     price: f64,
/// }
///
/// fn price(trade: &Trade) -> Value<'_> {
///     Value::Number(Number::F64(trade.price))
/// }
///
/// let trade = Trade { symbol: "ACME".into(), price: 12.5 };
/// assert_eq!(price(&trade).as_number(), Some(Number::F64(12.5)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Text borrowed from the row or record.
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Point in time.
    Timestamp(Timestamp),
    /// Enum discriminant.
    Enum(u32),
    /// Boolean value.
    Bool(bool),
    /// Array, vector, set or map. Only its length takes part in comparisons.
    Collection(usize),
    /// Field absent or null.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns `true` if this is a `String` value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if this is a `Number` value.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Textual rendering used by regex matching.
    ///
    /// Strings are returned as-is; numbers and booleans are formatted.
    /// Other variants have no textual form.
    pub fn as_text(&self) -> Option<Cow<'a, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }

    /// Name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Timestamp(_) => "timestamp",
            Value::Enum(_) => "enum",
            Value::Bool(_) => "bool",
            Value::Collection(_) => "collection",
            Value::None => "null",
        }
    }
}

/// A number in one of three representations.
///
/// Integers keep their exact value; see [`Number::compare`] for how
/// different variants are ordered against each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Widens to `f64`. Large integers may lose precision.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Orders two numbers. Signed and unsigned integers compare exactly;
    /// anything involving a float goes through `f64`.
    ///
    /// Returns `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            (Number::I64(a), Number::U64(b)) => Some(compare_signed_unsigned(a, b)),
            (Number::U64(a), Number::I64(b)) => Some(compare_signed_unsigned(b, a).reverse()),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

fn compare_signed_unsigned(a: i64, b: u64) -> Ordering {
    if a < 0 {
        Ordering::Less
    } else {
        (a as u64).cmp(&b)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )+
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }
}

/// Conversion from a record field to a [`Value`].
///
/// `#[derive(Record)]` calls this for every exposed field, so a field type
/// must implement it to be filterable. Implement it for your own enums and
/// datetime types:
///
/// ```
/// use tabsieve::{ToValue, Value};
///
/// enum Side {
///     Buy,
///     Sell,
/// }
///
/// impl ToValue for Side {
///     fn to_value(&self) -> Value<'_> {
///         match self {
///             Side::Buy => Value::Enum(0),
///             Side::Sell => Value::Enum(1),
///         }
///     }
/// }
/// ```
pub trait ToValue {
    /// Borrows this field as a comparable value.
    fn to_value(&self) -> Value<'_>;
}

impl ToValue for str {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl ToValue for Cow<'_, str> {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl ToValue for Timestamp {
    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

macro_rules! number_to_value {
    ($($ty:ty),+) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )+
    };
}

number_to_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::None,
        }
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T> ToValue for [T] {
    fn to_value(&self) -> Value<'_> {
        Value::Collection(self.len())
    }
}

impl<T> ToValue for Vec<T> {
    fn to_value(&self) -> Value<'_> {
        Value::Collection(self.len())
    }
}

impl<K, V, S> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value<'_> {
        Value::Collection(self.len())
    }
}

impl<K, V> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value<'_> {
        Value::Collection(self.len())
    }
}

impl<T, S> ToValue for HashSet<T, S> {
    fn to_value(&self) -> Value<'_> {
        Value::Collection(self.len())
    }
}

impl<T> ToValue for BTreeSet<T> {
    fn to_value(&self) -> Value<'_> {
        Value::Collection(self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_only_their_variant() {
        let price = Value::Number(Number::F64(1088.7));
        assert!(price.is_number());
        assert_eq!(price.as_number(), Some(Number::F64(1088.7)));
        assert_eq!(price.as_str(), None);

        let symbol = Value::String("ACME");
        assert!(symbol.is_string());
        assert_eq!(symbol.as_str(), Some("ACME"));
        assert_eq!(symbol.as_bool(), None);

        let at = Value::Timestamp(Timestamp::from_millis(5));
        assert_eq!(at.as_timestamp(), Some(Timestamp(5)));
        assert_eq!(Value::Bool(false).as_bool(), Some(false));
        assert!(Value::None.is_none());
        assert_eq!(Value::Collection(2).type_name(), "collection");
    }

    #[test]
    fn text_rendering() {
        assert_eq!(Value::String("abc").as_text().as_deref(), Some("abc"));
        assert_eq!(
            Value::Number(Number::F64(1088.7)).as_text().as_deref(),
            Some("1088.7")
        );
        assert_eq!(Value::Bool(false).as_text().as_deref(), Some("false"));
        assert_eq!(Value::Collection(3).as_text(), None);
        assert_eq!(Value::None.as_text(), None);
    }

    #[test]
    fn numbers_order_within_a_variant() {
        assert_eq!(Number::I64(-3).compare(Number::I64(2)), Some(Ordering::Less));
        assert_eq!(Number::U64(9).compare(Number::U64(9)), Some(Ordering::Equal));
        assert_eq!(
            Number::F64(0.5).compare(Number::F64(0.25)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn numbers_order_across_variants() {
        assert_eq!(Number::I64(7).compare(Number::U64(8)), Some(Ordering::Less));
        assert_eq!(
            Number::I64(i64::MIN).compare(Number::U64(0)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::U64(u64::MAX).compare(Number::I64(i64::MAX)),
            Some(Ordering::Greater)
        );
        assert_eq!(Number::U64(3).compare(Number::F64(3.0)), Some(Ordering::Equal));
        assert!(Number::I64(1) < Number::F64(1.5));
    }

    #[test]
    fn nan_has_no_order() {
        let nan = Number::F64(f64::NAN);
        assert_eq!(nan.compare(Number::I64(0)), None);
        assert_eq!(Number::U64(0).compare(nan), None);
    }

    #[test]
    fn primitive_numbers_pick_a_variant() {
        assert_eq!(Number::from(-1i8), Number::I64(-1));
        assert_eq!(Number::from(3usize), Number::U64(3));
        assert_eq!(Number::from(0.5f32), Number::F64(0.5));
    }

    #[test]
    fn to_value_impls() {
        assert_eq!("abc".to_value(), Value::String("abc"));
        assert_eq!(String::from("x").to_value(), Value::String("x"));
        assert_eq!(7u8.to_value(), Value::Number(Number::U64(7)));
        assert_eq!(Some(3i32).to_value(), Value::Number(Number::I64(3)));
        assert_eq!(None::<i32>.to_value(), Value::None);
        assert_eq!(Vec::<u8>::new().to_value(), Value::Collection(0));
        assert_eq!(vec![1, 2].to_value(), Value::Collection(2));

        let mut map = HashMap::new();
        map.insert("a", 1);
        assert_eq!(map.to_value(), Value::Collection(1));
    }

    #[test]
    fn timestamps_are_millisecond_counts() {
        let t = Timestamp::from_secs(90);
        assert_eq!(t.as_millis(), 90_000);
        assert_eq!(t, Timestamp::from_millis(90_000));
        assert!(Timestamp::from_secs(1) > Timestamp::from_millis(999));
    }

    #[test]
    fn seconds_saturate_at_the_millisecond_range() {
        assert_eq!(Timestamp::from_secs(i64::MAX).as_millis(), i64::MAX);
        assert_eq!(Timestamp::from_secs(i64::MIN).as_millis(), i64::MIN);
        assert!(Timestamp::from_secs(i64::MAX / 1000 + 1) > Timestamp::from_secs(i64::MAX / 1000));
    }
}
