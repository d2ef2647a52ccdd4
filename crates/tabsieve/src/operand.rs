//! Owned comparison operands.
//!
//! Unlike [`Value`], which borrows from the row or record being tested,
//! an [`Operand`] owns its data so it can be stored inside a predicate.

use std::fmt;

use crate::error::{Result, SieveError};
use crate::value::{Number, Timestamp, Value};

/// Owned value stored in a predicate leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// String value.
    String(String),
    /// Numeric value.
    Number(Number),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// Enum discriminant.
    Enum(u32),
    /// Boolean value.
    Bool(bool),
    /// Null. Accepted by conversions so `Option` inputs can be passed
    /// through, but rejected by every predicate constructor.
    Null,
}

impl Operand {
    /// Borrows this operand as a [`Value`].
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Operand::String(s) => Value::String(s),
            Operand::Number(n) => Value::Number(*n),
            Operand::Timestamp(t) => Value::Timestamp(*t),
            Operand::Enum(d) => Value::Enum(*d),
            Operand::Bool(b) => Value::Bool(*b),
            Operand::Null => Value::None,
        }
    }

    /// Returns `true` for [`Operand::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Operand::Null)
    }

    /// Fails with `InvalidArgument` if this operand is null.
    pub(crate) fn required(self, what: &str) -> Result<Self> {
        if self.is_null() {
            Err(SieveError::invalid_argument(format!("{} must not be null", what)))
        } else {
            Ok(self)
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::String(s) => write!(f, "{:?}", s),
            Operand::Number(n) => write!(f, "{}", n),
            Operand::Timestamp(t) => write!(f, "@{}", t.as_millis()),
            Operand::Enum(d) => write!(f, "#{}", d),
            Operand::Bool(b) => write!(f, "{}", b),
            Operand::Null => f.write_str("null"),
        }
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::String(s)
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::String(s.to_string())
    }
}

impl From<&String> for Operand {
    fn from(s: &String) -> Self {
        Operand::String(s.clone())
    }
}

impl From<Number> for Operand {
    fn from(n: Number) -> Self {
        Operand::Number(n)
    }
}

impl From<Timestamp> for Operand {
    fn from(t: Timestamp) -> Self {
        Operand::Timestamp(t)
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::Bool(b)
    }
}

impl<T: Into<Operand>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Operand::Null,
        }
    }
}

impl From<Value<'_>> for Operand {
    fn from(value: Value<'_>) -> Self {
        match value {
            Value::String(s) => Operand::String(s.to_string()),
            Value::Number(n) => Operand::Number(n),
            Value::Timestamp(t) => Operand::Timestamp(t),
            Value::Enum(d) => Operand::Enum(d),
            Value::Bool(b) => Operand::Bool(b),
            Value::Collection(_) | Value::None => Operand::Null,
        }
    }
}

macro_rules! number_operand {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Operand {
                fn from(n: $ty) -> Self {
                    Operand::Number(Number::from(n))
                }
            }
        )+
    };
}

number_operand!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(Operand::from("x"), Operand::String("x".into()));
        assert_eq!(Operand::from(10i64), Operand::Number(Number::I64(10)));
        assert_eq!(Operand::from(1088.7), Operand::Number(Number::F64(1088.7)));
        assert_eq!(Operand::from(true), Operand::Bool(true));
        assert_eq!(Operand::from(None::<&str>), Operand::Null);
        assert_eq!(Operand::from(Some("y")), Operand::String("y".into()));
        assert_eq!(Operand::from(Value::Collection(2)), Operand::Null);
    }

    #[test]
    fn as_value_borrows() {
        let op = Operand::from("abc");
        assert_eq!(op.as_value(), Value::String("abc"));
        assert_eq!(Operand::Null.as_value(), Value::None);
    }

    #[test]
    fn required_rejects_null() {
        assert!(Operand::from("a").required("operand").is_ok());
        let err = Operand::Null.required("low bound").unwrap_err();
        assert!(err.to_string().contains("low bound must not be null"));
    }

    #[test]
    fn display() {
        assert_eq!(Operand::from("a b").to_string(), "\"a b\"");
        assert_eq!(Operand::from(5u8).to_string(), "5");
        assert_eq!(Operand::Null.to_string(), "null");
    }
}
