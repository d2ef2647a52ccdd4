//! Multi-key ordering.
//!
//! Provides [`Dir`] for sort direction and [`OrderBy`] for a single sort
//! criterion. A list of criteria is applied left to right: the first one
//! that does not tie decides.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use crate::compare::{self, Comparator};
use crate::error::Result;
use crate::shape::{IntoKey, Shape};
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ordering criterion: field, direction and optional comparator.
pub struct OrderBy<S: Shape> {
    field: S::Key,
    dir: Dir,
    comparator: Option<Comparator>,
}

impl<S: Shape> OrderBy<S> {
    /// Ascending ordering on a field.
    pub fn asc(field: impl IntoKey<S::Key>) -> Self {
        Self::new(field, Dir::Asc)
    }

    /// Descending ordering on a field.
    pub fn desc(field: impl IntoKey<S::Key>) -> Self {
        Self::new(field, Dir::Desc)
    }

    /// Ordering on a field in the given direction.
    pub fn new(field: impl IntoKey<S::Key>, dir: Dir) -> Self {
        OrderBy {
            field: field.into_key(),
            dir,
            comparator: None,
        }
    }

    /// Compares strings case-insensitively.
    pub fn ignore_case(self) -> Self {
        self.with_comparator(Comparator::ignore_case())
    }

    /// Replaces natural order with `comparator`.
    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = Some(comparator);
        self
    }

    /// The field this criterion sorts by.
    pub fn field(&self) -> &S::Key {
        &self.field
    }

    /// The sort direction.
    pub fn dir(&self) -> Dir {
        self.dir
    }

    /// The comparator, if one replaces natural order.
    pub fn comparator(&self) -> Option<&Comparator> {
        self.comparator.as_ref()
    }

    /// Compares two items on this criterion.
    pub fn compare(&self, a: &S::Item, b: &S::Item) -> Result<Ordering> {
        let left = S::resolve(a, &self.field)?;
        let right = S::resolve(b, &self.field)?;
        let ordering = compare_values(&left, &right, self.comparator.as_ref())?;
        Ok(self.dir.apply(ordering))
    }
}

impl<S: Shape> Clone for OrderBy<S> {
    fn clone(&self) -> Self {
        OrderBy {
            field: self.field.clone(),
            dir: self.dir,
            comparator: self.comparator.clone(),
        }
    }
}

impl<S: Shape> fmt::Debug for OrderBy<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBy")
            .field("field", &self.field)
            .field("dir", &self.dir)
            .field("comparator", &self.comparator)
            .finish()
    }
}

impl<S: Shape> fmt::Display for OrderBy<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.dir)
    }
}

/// Compares two resolved values for sorting.
///
/// Absent values sort after present ones and tie with each other. Present
/// values go through the comparator, or natural order without one; a type
/// mismatch fails with [`SieveError::Incomparable`](crate::SieveError::Incomparable).
pub fn compare_values(
    a: &Value<'_>,
    b: &Value<'_>,
    comparator: Option<&Comparator>,
) -> Result<Ordering> {
    match (a.is_none(), b.is_none()) {
        (true, true) => Ok(Ordering::Equal),
        (true, false) => Ok(Ordering::Greater),
        (false, true) => Ok(Ordering::Less),
        (false, false) => compare::compare(a, b, comparator),
    }
}

/// Compares two items using a list of criteria.
///
/// Uses the first criterion as the primary sort key, the second to break
/// ties, and so on. Returns `Equal` if every criterion ties.
pub fn compare_by<S: Shape>(a: &S::Item, b: &S::Item, criteria: &[OrderBy<S>]) -> Result<Ordering> {
    for order_by in criteria {
        let ordering = order_by.compare(a, b)?;
        if ordering != Ordering::Equal {
            return Ok(ordering);
        }
    }
    Ok(Ordering::Equal)
}

/// Sorts items in place by a list of criteria.
///
/// The sort is stable. If a comparison fails, the first error is returned
/// once sorting finishes and the order of `items` is unspecified.
pub fn sort_by_criteria<S, I>(items: &mut [I], criteria: &[OrderBy<S>]) -> Result<()>
where
    S: Shape,
    I: Borrow<S::Item>,
{
    sort_with(items, criteria, |item| item.borrow())
}

pub(crate) fn sort_with<S, I, F>(items: &mut [I], criteria: &[OrderBy<S>], get: F) -> Result<()>
where
    S: Shape,
    F: Fn(&I) -> &S::Item,
{
    if criteria.is_empty() {
        return Ok(());
    }
    let mut failure = None;
    items.sort_by(|a, b| {
        if failure.is_some() {
            return Ordering::Equal;
        }
        match compare_by(get(a), get(b), criteria) {
            Ok(ordering) => ordering,
            Err(err) => {
                failure = Some(err);
                Ordering::Equal
            }
        }
    });
    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SieveError;
    use crate::shape::{Dynamic, Positional};
    use crate::value::{Number, Timestamp};
    use serde_json::json;

    #[test]
    fn dir_apply() {
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Dir::Asc.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Desc.apply(Ordering::Greater), Ordering::Less);
    }

    #[test]
    fn dir_display() {
        assert_eq!(Dir::Asc.to_string(), "asc");
        assert_eq!(Dir::Desc.to_string(), "desc");
    }

    #[test]
    fn order_by_constructors() {
        let asc = OrderBy::<Positional>::asc(2);
        assert_eq!(*asc.field(), 2);
        assert_eq!(asc.dir(), Dir::Asc);
        assert!(asc.comparator().is_none());

        let desc = OrderBy::<Dynamic>::desc("price").ignore_case();
        assert_eq!(desc.field(), "price");
        assert!(desc.dir().is_desc());
        assert!(desc.comparator().is_some());
        assert_eq!(desc.to_string(), "price desc");
    }

    #[test]
    fn absent_values_sort_last() {
        let none = Value::None;
        let some = Value::String("test");
        assert_eq!(compare_values(&none, &some, None).unwrap(), Ordering::Greater);
        assert_eq!(compare_values(&some, &none, None).unwrap(), Ordering::Less);
        assert_eq!(compare_values(&none, &none, None).unwrap(), Ordering::Equal);
    }

    #[test]
    fn mismatched_types_are_incomparable() {
        let s = Value::String("test");
        let n = Value::Number(Number::I64(42));
        assert!(matches!(
            compare_values(&s, &n, None),
            Err(SieveError::Incomparable { .. })
        ));

        let a = Value::Timestamp(Timestamp(1000));
        let b = Value::Timestamp(Timestamp(2000));
        assert_eq!(compare_values(&a, &b, None).unwrap(), Ordering::Less);
    }

    #[test]
    fn ignore_case_does_not_hide_mismatches() {
        let mut docs = vec![json!({"v": 1}), json!({"v": "one"})];
        let criteria = [OrderBy::<Dynamic>::asc("v").ignore_case()];
        assert!(matches!(
            compare_by(&docs[0], &docs[1], &criteria),
            Err(SieveError::Incomparable {
                left: "number",
                right: "string"
            })
        ));
        assert!(sort_by_criteria(&mut docs, &criteria).is_err());

        let mut names = vec![json!({"v": "b"}), json!({"v": null}), json!({"v": "A"})];
        sort_by_criteria(&mut names, &criteria).unwrap();
        let firsts: Vec<_> = names.iter().map(|d| d["v"].as_str()).collect();
        assert_eq!(firsts, vec![Some("A"), Some("b"), None]);
    }

    #[test]
    fn multiple_criteria() {
        let docs = [
            json!({"name": "a", "priority": 1}),
            json!({"name": "b", "priority": 1}),
            json!({"name": "a", "priority": 2}),
        ];
        let criteria = [
            OrderBy::<Dynamic>::asc("priority"),
            OrderBy::<Dynamic>::asc("name"),
        ];

        assert_eq!(
            compare_by(&docs[0], &docs[1], &criteria).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            compare_by(&docs[0], &docs[2], &criteria).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            compare_by(&docs[1], &docs[1], &criteria).unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn sort_rows_descending_with_nulls_first() {
        let mut rows = vec![
            vec![Some("b".to_string())],
            vec![None],
            vec![Some("c".to_string())],
            vec![Some("a".to_string())],
        ];
        sort_by_criteria(&mut rows, &[OrderBy::<Positional>::desc(0)]).unwrap();
        let firsts: Vec<_> = rows.iter().map(|r| r[0].as_deref()).collect();
        assert_eq!(firsts, vec![None, Some("c"), Some("b"), Some("a")]);
    }

    #[test]
    fn sort_is_stable() {
        let mut rows = vec![
            vec![Some("1".to_string()), Some("first".to_string())],
            vec![Some("0".to_string()), Some("x".to_string())],
            vec![Some("1".to_string()), Some("second".to_string())],
        ];
        sort_by_criteria(&mut rows, &[OrderBy::<Positional>::asc(0)]).unwrap();
        assert_eq!(rows[1][1].as_deref(), Some("first"));
        assert_eq!(rows[2][1].as_deref(), Some("second"));
    }

    #[test]
    fn sort_reports_errors() {
        let mut docs = vec![json!({"v": 1}), json!({"v": "one"})];
        let result = sort_by_criteria(&mut docs, &[OrderBy::<Dynamic>::asc("v")]);
        assert!(matches!(result, Err(SieveError::Incomparable { .. })));

        let mut rows = vec![vec![Some("a".to_string())], vec![Some("b".to_string())]];
        let result = sort_by_criteria(&mut rows, &[OrderBy::<Positional>::asc(5)]);
        assert!(matches!(result, Err(SieveError::InvalidIndex { .. })));
    }
}
