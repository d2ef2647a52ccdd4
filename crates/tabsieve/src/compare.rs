//! Comparison primitives shared by every data shape.
//!
//! These functions operate on already-resolved [`Value`]s and know nothing
//! about rows or records. An absent value is incomparable: it is never equal
//! to anything, never ordered against anything and never matches a pattern.
//! Only [`is_null`] and [`is_empty`] observe absence directly.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{Result, SieveError};
use crate::op::Op;
use crate::value::Value;

type CompareFn = dyn for<'a, 'b> Fn(&Value<'a>, &Value<'b>) -> Option<Ordering> + Send + Sync;

/// Injectable ordering function over resolved values.
///
/// A comparator may decline to order a pair by returning `None`. Ordering
/// tests then fail with [`SieveError::Incomparable`] and equality tests
/// report "not equal". Cloning is cheap; the function is shared behind an
/// `Arc`.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use tabsieve::{Comparator, Value};
///
/// // Order strings by length.
/// let by_len = Comparator::new(|a, b| {
///     let a = a.as_str().map(str::len).unwrap_or(0);
///     let b = b.as_str().map(str::len).unwrap_or(0);
///     a.cmp(&b)
/// });
/// assert_eq!(
///     by_len.compare(&Value::String("zz"), &Value::String("aaa")),
///     Some(Ordering::Less)
/// );
///
/// // Only numbers are comparable.
/// let numeric = Comparator::partial(|a, b| a.as_number()?.compare(b.as_number()?));
/// assert_eq!(numeric.compare(&Value::String("1"), &Value::Bool(true)), None);
/// ```
#[derive(Clone)]
pub struct Comparator {
    name: &'static str,
    f: Arc<CompareFn>,
}

impl Comparator {
    /// Wraps a total ordering function.
    pub fn new<F>(f: F) -> Self
    where
        F: for<'a, 'b> Fn(&Value<'a>, &Value<'b>) -> Ordering + Send + Sync + 'static,
    {
        Comparator {
            name: "custom",
            f: Arc::new(move |a: &Value<'_>, b: &Value<'_>| Some(f(a, b))),
        }
    }

    /// Wraps an ordering function that returns `None` for pairs it cannot
    /// order.
    pub fn partial<F>(f: F) -> Self
    where
        F: for<'a, 'b> Fn(&Value<'a>, &Value<'b>) -> Option<Ordering> + Send + Sync + 'static,
    {
        Comparator {
            name: "custom",
            f: Arc::new(f),
        }
    }

    /// Natural order. Pairs without a natural order are incomparable.
    pub fn natural() -> Self {
        Comparator {
            name: "natural",
            f: Arc::new(|a: &Value<'_>, b: &Value<'_>| natural_order(a, b)),
        }
    }

    /// Natural order with strings compared case-insensitively.
    pub fn ignore_case() -> Self {
        Comparator {
            name: "ignore_case",
            f: Arc::new(|a: &Value<'_>, b: &Value<'_>| match (a, b) {
                (Value::String(a), Value::String(b)) => {
                    Some(a.to_lowercase().cmp(&b.to_lowercase()))
                }
                _ => natural_order(a, b),
            }),
        }
    }

    /// Applies the ordering function. `None` means the pair is
    /// incomparable.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
        (self.f)(a, b)
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Comparator").field(&self.name).finish()
    }
}

/// Natural order between two present values of the same kind.
///
/// Returns `None` for absent values, mismatched kinds, collections and NaN.
pub fn natural_order(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Returns `true` if the value is absent.
pub fn is_null(v: &Value<'_>) -> bool {
    v.is_none()
}

/// Returns `true` if the value is absent, a zero-length string, or an empty
/// collection.
pub fn is_empty(v: &Value<'_>) -> bool {
    match v {
        Value::None => true,
        Value::String(s) => s.is_empty(),
        Value::Collection(len) => *len == 0,
        _ => false,
    }
}

/// Equality test.
///
/// When `ignore_case` is set and both sides are strings they are compared
/// after lowercasing. Otherwise a supplied comparator decides equality by
/// returning `Some(Equal)`; without one, natural equality applies. An absent
/// value or an incomparable pair is never equal.
pub fn eq(
    v: &Value<'_>,
    criteria: &Value<'_>,
    ignore_case: bool,
    comparator: Option<&Comparator>,
) -> bool {
    if v.is_none() || criteria.is_none() {
        return false;
    }
    if let (Value::String(a), Value::String(b)) = (v, criteria) {
        if ignore_case {
            return a.to_lowercase() == b.to_lowercase();
        }
    }
    match comparator {
        Some(cmp) => cmp.compare(v, criteria) == Some(Ordering::Equal),
        None => natural_order(v, criteria) == Some(Ordering::Equal),
    }
}

/// Orders the value against the criteria.
///
/// Delegates to the comparator when one is supplied, natural order
/// otherwise. Fails with [`SieveError::Incomparable`] when either side is
/// absent or the pair has no order.
pub fn compare(
    v: &Value<'_>,
    criteria: &Value<'_>,
    comparator: Option<&Comparator>,
) -> Result<Ordering> {
    let incomparable = || SieveError::Incomparable {
        left: v.type_name(),
        right: criteria.type_name(),
    };
    if v.is_none() || criteria.is_none() {
        return Err(incomparable());
    }
    let ordering = match comparator {
        Some(cmp) => cmp.compare(v, criteria),
        None => natural_order(v, criteria),
    };
    ordering.ok_or_else(incomparable)
}

fn ordered(
    op: Op,
    v: &Value<'_>,
    criteria: &Value<'_>,
    comparator: Option<&Comparator>,
) -> Result<bool> {
    if v.is_none() || criteria.is_none() {
        return Ok(false);
    }
    Ok(op.eval_ordering(compare(v, criteria, comparator)?))
}

/// `v > criteria`; `false` if either side is absent.
pub fn gt(v: &Value<'_>, criteria: &Value<'_>, comparator: Option<&Comparator>) -> Result<bool> {
    ordered(Op::Gt, v, criteria, comparator)
}

/// `v >= criteria`; `false` if either side is absent.
pub fn ge(v: &Value<'_>, criteria: &Value<'_>, comparator: Option<&Comparator>) -> Result<bool> {
    ordered(Op::Ge, v, criteria, comparator)
}

/// `v < criteria`; `false` if either side is absent.
pub fn lt(v: &Value<'_>, criteria: &Value<'_>, comparator: Option<&Comparator>) -> Result<bool> {
    ordered(Op::Lt, v, criteria, comparator)
}

/// `v <= criteria`; `false` if either side is absent.
pub fn le(v: &Value<'_>, criteria: &Value<'_>, comparator: Option<&Comparator>) -> Result<bool> {
    ordered(Op::Le, v, criteria, comparator)
}

/// Inclusive range test: `ge(v, low) && le(v, high)`.
pub fn between(
    v: &Value<'_>,
    low: &Value<'_>,
    high: &Value<'_>,
    comparator: Option<&Comparator>,
) -> Result<bool> {
    Ok(ge(v, low, comparator)? && le(v, high, comparator)?)
}

/// Membership test: `true` if any candidate is [`eq`] to the value.
pub fn is_in<'c>(
    v: &Value<'_>,
    candidates: impl IntoIterator<Item = Value<'c>>,
    ignore_case: bool,
) -> bool {
    candidates
        .into_iter()
        .any(|candidate| eq(v, &candidate, ignore_case, None))
}

/// Negation of [`is_in`].
pub fn not_in<'c>(
    v: &Value<'_>,
    candidates: impl IntoIterator<Item = Value<'c>>,
    ignore_case: bool,
) -> bool {
    !is_in(v, candidates, ignore_case)
}

/// Full-string regular expression match.
///
/// The regex must already be anchored; predicate constructors take care of
/// that. An absent value never matches.
pub fn regex_match(v: &Value<'_>, regex: &Regex) -> bool {
    match v.as_text() {
        Some(text) => regex.is_match(&text),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    fn s(text: &str) -> Value<'_> {
        Value::String(text)
    }

    fn n(num: i64) -> Value<'static> {
        Value::Number(Number::I64(num))
    }

    #[test]
    fn null_and_empty() {
        assert!(is_null(&Value::None));
        assert!(!is_null(&s("")));

        assert!(is_empty(&Value::None));
        assert!(is_empty(&s("")));
        assert!(is_empty(&Value::Collection(0)));
        assert!(!is_empty(&Value::Collection(1)));
        assert!(!is_empty(&s("a")));
        assert!(!is_empty(&n(0)));
    }

    #[test]
    fn equality() {
        assert!(eq(&s("abc"), &s("abc"), false, None));
        assert!(!eq(&s("abc"), &s("ABC"), false, None));
        assert!(eq(&s("abc"), &s("ABC"), true, None));
        assert!(eq(&n(10), &Value::Number(Number::F64(10.0)), false, None));
        assert!(!eq(&n(10), &s("10"), false, None));
        assert!(!eq(&Value::None, &s("x"), false, None));
    }

    #[test]
    fn equality_with_comparator() {
        let modulo = Comparator::new(|a, b| {
            let a = a.as_number().map(|n| n.to_f64() as i64 % 10);
            let b = b.as_number().map(|n| n.to_f64() as i64 % 10);
            a.cmp(&b)
        });
        assert!(eq(&n(13), &n(3), false, Some(&modulo)));
        assert!(!eq(&n(13), &n(4), false, Some(&modulo)));
        // Strings with ignore_case never consult the comparator
        assert!(eq(&s("A"), &s("a"), true, Some(&modulo)));
    }

    #[test]
    fn ordering_requires_present_values() {
        assert_eq!(compare(&n(1), &n(2), None).unwrap(), Ordering::Less);
        assert!(matches!(
            compare(&Value::None, &n(2), None),
            Err(SieveError::Incomparable { left: "null", .. })
        ));
        assert!(matches!(
            compare(&s("a"), &n(2), None),
            Err(SieveError::Incomparable {
                left: "string",
                right: "number"
            })
        ));
    }

    #[test]
    fn ordering_wrappers() {
        assert!(gt(&n(5), &n(3), None).unwrap());
        assert!(!gt(&n(3), &n(3), None).unwrap());
        assert!(ge(&n(3), &n(3), None).unwrap());
        assert!(lt(&s("050"), &s("100"), None).unwrap());
        assert!(le(&s("100"), &s("100"), None).unwrap());

        // Absent values are false, not errors
        assert!(!gt(&Value::None, &n(3), None).unwrap());
        assert!(!le(&Value::None, &n(3), None).unwrap());
    }

    #[test]
    fn range() {
        assert!(between(&s("100"), &s("050"), &s("100"), None).unwrap());
        assert!(!between(&s("101"), &s("050"), &s("100"), None).unwrap());
        assert!(!between(&Value::None, &s("050"), &s("100"), None).unwrap());
    }

    #[test]
    fn membership() {
        let candidates = || vec![s("a"), s("b")];
        assert!(is_in(&s("a"), candidates(), false));
        assert!(!is_in(&s("A"), candidates(), false));
        assert!(is_in(&s("A"), candidates(), true));
        assert!(not_in(&s("c"), candidates(), false));
        assert!(not_in(&Value::None, candidates(), false));
    }

    #[test]
    fn regex_full_match() {
        let re = Regex::new("^(?:x\\d+)$").unwrap();
        assert!(regex_match(&s("x001"), &re));
        assert!(!regex_match(&s("ax001"), &re));
        assert!(!regex_match(&Value::None, &re));

        let digits = Regex::new("^(?:\\d+)$").unwrap();
        assert!(regex_match(&n(42), &digits));
    }

    #[test]
    fn comparators_can_decline() {
        let natural = Comparator::natural();
        assert!(!eq(&n(12), &s("banana"), false, Some(&natural)));
        assert!(matches!(
            compare(&Value::Collection(2), &n(99), Some(&natural)),
            Err(SieveError::Incomparable {
                left: "collection",
                right: "number"
            })
        ));
        assert!(ge(&Value::Collection(2), &n(99), Some(&natural)).is_err());

        let numeric = Comparator::partial(|a, b| a.as_number()?.compare(b.as_number()?));
        assert_eq!(compare(&n(1), &n(2), Some(&numeric)).unwrap(), Ordering::Less);
        assert!(compare(&s("1"), &s("2"), Some(&numeric)).is_err());
        assert!(!eq(&s("1"), &s("1"), false, Some(&numeric)));
    }

    #[test]
    fn builtin_comparators() {
        let ci = Comparator::ignore_case();
        assert_eq!(ci.compare(&s("abc"), &s("ABD")), Some(Ordering::Less));
        assert_eq!(ci.compare(&s("abc"), &s("ABC")), Some(Ordering::Equal));
        assert_eq!(ci.compare(&s("abc"), &n(1)), None);

        let natural = Comparator::natural();
        assert_eq!(natural.compare(&n(2), &n(1)), Some(Ordering::Greater));
        assert_eq!(natural.compare(&n(2), &s("2")), None);
        assert_eq!(natural.compare(&Value::Collection(2), &n(99)), None);
        assert_eq!(format!("{:?}", natural), "Comparator(\"natural\")");
    }
}
