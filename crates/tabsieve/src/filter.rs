//! Fluent predicate builder.
//!
//! The [`Filter`] struct wraps a combinator and appends one leaf per chained
//! call. It is sugar over [`Predicate`]: [`Filter::build`] returns exactly the
//! tree the same calls on `Predicate` would have produced.

use std::fmt;

use crate::compare::Comparator;
use crate::error::{Result, SieveError};
use crate::operand::Operand;
use crate::predicate::{Predicate, TypedShape};
use crate::schema::Record;
use crate::shape::{Dynamic, IntoKey, Named, Positional, Shape, Structured};

/// Builder over positional rows.
pub type RowFilter = Filter<Positional>;

/// Builder over rows addressed by column name.
pub type NamedRowFilter = Filter<Named>;

/// Builder over structured records.
pub type RecordFilter<T> = Filter<Structured<T>>;

/// Builder over JSON documents.
pub type JsonFilter = Filter<Dynamic>;

/// Fluent builder for `and`/`or` predicates.
///
/// # Example
///
/// ```
/// use tabsieve::RowFilter;
///
/// let filter = RowFilter::new()
///     .is_not_empty(0)
///     .regex(1, r"x\d+")?
///     .any_of(|f| f.eq(2, "a")?.eq(2, "b"))?;
///
/// let row = vec![Some("k".to_string()), Some("x001".to_string()), Some("b".to_string())];
/// assert!(filter.accept(&row)?);
/// assert_eq!(
///     filter.to_string(),
///     "(0 is_not_empty and 1 regex /x\\d+/ and (2 eq \"a\" or 2 eq \"b\"))"
/// );
/// # Ok::<(), tabsieve::SieveError>(())
/// ```
pub struct Filter<S: Shape> {
    root: Predicate<S>,
}

impl<S: Shape> Filter<S> {
    /// Starts an `and` builder.
    pub fn new() -> Self {
        Filter {
            root: Predicate::all([]),
        }
    }

    /// Starts an `or` builder.
    pub fn any() -> Self {
        Filter {
            root: Predicate::any([]),
        }
    }

    /// Continues building an existing combinator.
    ///
    /// Children already present are kept and new ones are appended after
    /// them. Fails with `InvalidArgument` if `root` is a leaf or `not`.
    pub fn wrap(root: Predicate<S>) -> Result<Self> {
        if !root.is_combinator() {
            return Err(SieveError::invalid_argument(format!(
                "a filter must wrap an 'and' or 'or' predicate, not '{}'",
                root.op()
            )));
        }
        Ok(Filter { root })
    }

    /// Appends a predicate.
    pub fn add(mut self, predicate: Predicate<S>) -> Self {
        if let Some(children) = self.root.children_mut() {
            children.push(predicate);
        }
        self
    }

    /// Appends the negation of a predicate.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self, predicate: Predicate<S>) -> Self {
        self.add(Predicate::not(predicate))
    }

    /// Appends a nested `and` group built by `f`.
    pub fn all_of<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(Filter<S>) -> Result<Filter<S>>,
    {
        let group = f(Filter::new())?;
        Ok(self.add(group.build()))
    }

    /// Appends a nested `or` group built by `f`.
    pub fn any_of<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(Filter<S>) -> Result<Filter<S>>,
    {
        let group = f(Filter::any())?;
        Ok(self.add(group.build()))
    }

    // ========================================================================
    // Leaves
    // ========================================================================

    /// Appends [`Predicate::is_null`].
    pub fn is_null(self, field: impl IntoKey<S::Key>) -> Self {
        self.add(Predicate::is_null(field))
    }

    /// Appends [`Predicate::is_not_null`].
    pub fn is_not_null(self, field: impl IntoKey<S::Key>) -> Self {
        self.add(Predicate::is_not_null(field))
    }

    /// Appends [`Predicate::is_empty`].
    pub fn is_empty(self, field: impl IntoKey<S::Key>) -> Self {
        self.add(Predicate::is_empty(field))
    }

    /// Appends [`Predicate::is_not_empty`].
    pub fn is_not_empty(self, field: impl IntoKey<S::Key>) -> Self {
        self.add(Predicate::is_not_empty(field))
    }

    /// Appends [`Predicate::eq`].
    pub fn eq(self, field: impl IntoKey<S::Key>, value: impl Into<Operand>) -> Result<Self> {
        Ok(self.add(Predicate::eq(field, value)?))
    }

    /// Appends [`Predicate::eq_ignore_case`].
    pub fn eq_ignore_case(
        self,
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
    ) -> Result<Self> {
        Ok(self.add(Predicate::eq_ignore_case(field, value)?))
    }

    /// Appends [`Predicate::ne`].
    pub fn ne(self, field: impl IntoKey<S::Key>, value: impl Into<Operand>) -> Result<Self> {
        Ok(self.add(Predicate::ne(field, value)?))
    }

    /// Appends [`Predicate::ne_ignore_case`].
    pub fn ne_ignore_case(
        self,
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
    ) -> Result<Self> {
        Ok(self.add(Predicate::ne_ignore_case(field, value)?))
    }

    /// Appends [`Predicate::is_in`].
    pub fn is_in<I, V>(self, field: impl IntoKey<S::Key>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        Ok(self.add(Predicate::is_in(field, values)?))
    }

    /// Appends [`Predicate::is_in_ignore_case`].
    pub fn is_in_ignore_case<I, V>(self, field: impl IntoKey<S::Key>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        Ok(self.add(Predicate::is_in_ignore_case(field, values)?))
    }

    /// Appends [`Predicate::not_in`].
    pub fn not_in<I, V>(self, field: impl IntoKey<S::Key>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        Ok(self.add(Predicate::not_in(field, values)?))
    }

    /// Appends [`Predicate::not_in_ignore_case`].
    pub fn not_in_ignore_case<I, V>(self, field: impl IntoKey<S::Key>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        Ok(self.add(Predicate::not_in_ignore_case(field, values)?))
    }

    /// Appends [`Predicate::regex`].
    pub fn regex(self, field: impl IntoKey<S::Key>, pattern: &str) -> Result<Self> {
        Ok(self.add(Predicate::regex(field, pattern)?))
    }

    /// Appends [`Predicate::regex_ignore_case`].
    pub fn regex_ignore_case(self, field: impl IntoKey<S::Key>, pattern: &str) -> Result<Self> {
        Ok(self.add(Predicate::regex_ignore_case(field, pattern)?))
    }

    /// Appends [`Predicate::gt`].
    pub fn gt(self, field: impl IntoKey<S::Key>, value: impl Into<Operand>) -> Result<Self> {
        Ok(self.add(Predicate::gt(field, value)?))
    }

    /// Appends [`Predicate::ge`].
    pub fn ge(self, field: impl IntoKey<S::Key>, value: impl Into<Operand>) -> Result<Self> {
        Ok(self.add(Predicate::ge(field, value)?))
    }

    /// Appends [`Predicate::lt`].
    pub fn lt(self, field: impl IntoKey<S::Key>, value: impl Into<Operand>) -> Result<Self> {
        Ok(self.add(Predicate::lt(field, value)?))
    }

    /// Appends [`Predicate::le`].
    pub fn le(self, field: impl IntoKey<S::Key>, value: impl Into<Operand>) -> Result<Self> {
        Ok(self.add(Predicate::le(field, value)?))
    }

    /// Appends [`Predicate::between`].
    pub fn between(
        self,
        field: impl IntoKey<S::Key>,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> Result<Self> {
        Ok(self.add(Predicate::between(field, low, high)?))
    }

    // ========================================================================
    // Finish
    // ========================================================================

    /// Returns the built predicate.
    pub fn build(self) -> Predicate<S> {
        self.root
    }

    /// Borrows the predicate built so far.
    pub fn predicate(&self) -> &Predicate<S> {
        &self.root
    }

    /// Tests an item against the predicate built so far.
    pub fn accept(&self, item: &S::Item) -> Result<bool> {
        self.root.accept(item)
    }
}

impl<S: TypedShape> Filter<S> {
    /// Appends [`Predicate::eq_by`].
    pub fn eq_by(
        self,
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
        comparator: Comparator,
    ) -> Result<Self> {
        Ok(self.add(Predicate::eq_by(field, value, comparator)?))
    }

    /// Appends [`Predicate::ne_by`].
    pub fn ne_by(
        self,
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
        comparator: Comparator,
    ) -> Result<Self> {
        Ok(self.add(Predicate::ne_by(field, value, comparator)?))
    }

    /// Appends [`Predicate::gt_by`].
    pub fn gt_by(
        self,
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
        comparator: Comparator,
    ) -> Result<Self> {
        Ok(self.add(Predicate::gt_by(field, value, comparator)?))
    }

    /// Appends [`Predicate::ge_by`].
    pub fn ge_by(
        self,
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
        comparator: Comparator,
    ) -> Result<Self> {
        Ok(self.add(Predicate::ge_by(field, value, comparator)?))
    }

    /// Appends [`Predicate::lt_by`].
    pub fn lt_by(
        self,
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
        comparator: Comparator,
    ) -> Result<Self> {
        Ok(self.add(Predicate::lt_by(field, value, comparator)?))
    }

    /// Appends [`Predicate::le_by`].
    pub fn le_by(
        self,
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
        comparator: Comparator,
    ) -> Result<Self> {
        Ok(self.add(Predicate::le_by(field, value, comparator)?))
    }

    /// Appends [`Predicate::between_by`].
    pub fn between_by(
        self,
        field: impl IntoKey<S::Key>,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
        comparator: Comparator,
    ) -> Result<Self> {
        Ok(self.add(Predicate::between_by(field, low, high, comparator)?))
    }
}

impl<T: Record> Filter<Structured<T>> {
    /// Appends an `eq` leaf for every field of `example` whose value is
    /// present, mirroring query-by-example.
    ///
    /// Fields resolving to collections are skipped.
    pub fn matching(mut self, example: &T) -> Result<Self> {
        for name in T::schema().field_names() {
            let operand = Operand::from(example.field_value(name)?);
            if !operand.is_null() {
                self = self.add(Predicate::eq(name, operand)?);
            }
        }
        Ok(self)
    }
}

impl<S: Shape> Default for Filter<S> {
    fn default() -> Self {
        Filter::new()
    }
}

impl<S: Shape> Clone for Filter<S> {
    fn clone(&self) -> Self {
        Filter {
            root: self.root.clone(),
        }
    }
}

impl<S: Shape> fmt::Debug for Filter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter").field("root", &self.root).finish()
    }
}

impl<S: Shape> fmt::Display for Filter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}

impl<S: Shape> From<Filter<S>> for Predicate<S> {
    fn from(filter: Filter<S>) -> Self {
        filter.build()
    }
}
