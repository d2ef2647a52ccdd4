//! The list pipeline: filter, sort, then page.
//!
//! A [`Listing`] bundles an optional predicate, ordering criteria and a
//! paging window. Sorting always runs over the complete accepted collection
//! before the window is cut, so a page never depends on how the input was
//! chunked.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Range;

use tracing::{debug, trace};

use crate::error::Result;
use crate::ordering::{sort_with, Dir, OrderBy};
use crate::predicate::Predicate;
use crate::shape::{Dynamic, IntoKey, Named, Positional, Shape, Structured};

/// Listing over positional rows.
pub type RowListing = Listing<Positional>;

/// Listing over rows addressed by column name.
pub type NamedRowListing = Listing<Named>;

/// Listing over structured records.
pub type RecordListing<T> = Listing<Structured<T>>;

/// Listing over JSON documents.
pub type JsonListing = Listing<Dynamic>;

/// Returns the `[offset, offset + limit)` window of `items`.
///
/// A negative offset is treated as zero and a non-positive limit means "no
/// limit". An offset at or beyond the end yields an empty slice.
///
/// ```
/// use tabsieve::page;
///
/// let items = [0, 1, 2, 3, 4];
/// assert_eq!(page(&items, 3, 0), &[3, 4]);
/// assert_eq!(page(&items, 1, 2), &[1, 2]);
/// assert!(page(&items, 10, 5).is_empty());
/// ```
pub fn page<T>(items: &[T], offset: isize, limit: isize) -> &[T] {
    &items[window(items.len(), offset, limit)]
}

fn window(len: usize, offset: isize, limit: isize) -> Range<usize> {
    let start = offset.max(0) as usize;
    if start >= len {
        return 0..0;
    }
    let end = if limit <= 0 {
        len
    } else {
        start.saturating_add(limit as usize).min(len)
    };
    start..end
}

/// Filter, ordering and paging applied together.
///
/// # Example
///
/// ```
/// use tabsieve::{RowFilter, RowListing};
///
/// let rows: Vec<Vec<Option<String>>> = ["c", "a", "", "b"]
///     .iter()
///     .map(|v| vec![Some(v.to_string())])
///     .collect();
///
/// let listing = RowListing::new()
///     .filter(RowFilter::new().is_not_empty(0))
///     .order_asc(0)
///     .limit(2);
///
/// let page = listing.process(&rows)?;
/// let values: Vec<_> = page.iter().map(|r| r[0].as_deref().unwrap()).collect();
/// assert_eq!(values, ["a", "b"]);
/// # Ok::<(), tabsieve::SieveError>(())
/// ```
pub struct Listing<S: Shape> {
    predicate: Option<Predicate<S>>,
    criteria: Vec<OrderBy<S>>,
    offset: isize,
    limit: isize,
}

impl<S: Shape> Listing<S> {
    /// Creates a listing that accepts everything, keeps input order and
    /// returns every item.
    pub fn new() -> Self {
        Listing {
            predicate: None,
            criteria: Vec::new(),
            offset: 0,
            limit: 0,
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Sets the predicate. Accepts a [`Predicate`] or a finished
    /// [`Filter`](crate::Filter).
    pub fn filter(mut self, predicate: impl Into<Predicate<S>>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    /// Appends an ordering criterion.
    pub fn order_by(mut self, criterion: OrderBy<S>) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// Appends an ascending criterion.
    pub fn order_asc(self, field: impl IntoKey<S::Key>) -> Self {
        self.order_by(OrderBy::new(field, Dir::Asc))
    }

    /// Appends a descending criterion.
    pub fn order_desc(self, field: impl IntoKey<S::Key>) -> Self {
        self.order_by(OrderBy::new(field, Dir::Desc))
    }

    /// Sets the number of items to skip. Negative values count as zero.
    pub fn offset(mut self, offset: isize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the maximum number of items to return. Zero or less means no
    /// limit.
    pub fn limit(mut self, limit: isize) -> Self {
        self.limit = limit;
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the predicate, if set.
    pub fn predicate(&self) -> Option<&Predicate<S>> {
        self.predicate.as_ref()
    }

    /// Returns the ordering criteria.
    pub fn criteria(&self) -> &[OrderBy<S>] {
        &self.criteria
    }

    /// Returns the offset.
    pub fn get_offset(&self) -> isize {
        self.offset
    }

    /// Returns the limit.
    pub fn get_limit(&self) -> isize {
        self.limit
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests a single item. Without a predicate every item is accepted.
    pub fn accept(&self, item: &S::Item) -> Result<bool> {
        match &self.predicate {
            Some(predicate) => predicate.accept(item),
            None => Ok(true),
        }
    }

    /// Filters, sorts and pages a slice, returning references into it.
    pub fn process<'a, I>(&self, items: &'a [I]) -> Result<Vec<&'a I>>
    where
        I: Borrow<S::Item>,
    {
        let mut accepted = Vec::with_capacity(items.len());
        for item in items {
            if self.accept(item.borrow())? {
                accepted.push(item);
            }
        }
        debug!(
            total = items.len(),
            accepted = accepted.len(),
            "filtered items"
        );
        sort_with(&mut accepted, &self.criteria, |item: &&I| (*item).borrow())?;
        Ok(self.cut(accepted))
    }

    /// Filters items as they arrive, then sorts and pages the accepted
    /// ones.
    ///
    /// The first error from the source, the predicate or the sort aborts the
    /// whole operation.
    pub fn collect<I, It>(&self, items: It) -> Result<Vec<I>>
    where
        I: Borrow<S::Item>,
        It: IntoIterator<Item = Result<I>>,
    {
        let mut accepted = Vec::new();
        let mut rejected = 0usize;
        for item in items {
            let item = item?;
            if self.accept(item.borrow())? {
                accepted.push(item);
            } else {
                rejected += 1;
            }
        }
        debug!(accepted = accepted.len(), rejected, "collected items");
        sort_with(&mut accepted, &self.criteria, |item: &I| item.borrow())?;
        Ok(self.cut(accepted))
    }

    fn cut<T>(&self, mut items: Vec<T>) -> Vec<T> {
        let range = window(items.len(), self.offset, self.limit);
        trace!(
            offset = self.offset,
            limit = self.limit,
            start = range.start,
            end = range.end,
            "paging window"
        );
        items.truncate(range.end);
        items.drain(..range.start);
        items
    }

    /// Counts the items the predicate accepts. Paging is ignored.
    pub fn count<I>(&self, items: &[I]) -> Result<usize>
    where
        I: Borrow<S::Item>,
    {
        let mut n = 0;
        for item in items {
            if self.accept(item.borrow())? {
                n += 1;
            }
        }
        Ok(n)
    }

    /// Returns the first accepted item in input order.
    pub fn find<'a, I>(&self, items: &'a [I]) -> Result<Option<&'a I>>
    where
        I: Borrow<S::Item>,
    {
        for item in items {
            if self.accept(item.borrow())? {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    /// Returns `true` if any item is accepted.
    pub fn any<I>(&self, items: &[I]) -> Result<bool>
    where
        I: Borrow<S::Item>,
    {
        Ok(self.find(items)?.is_some())
    }

    /// Returns `true` if every item is accepted.
    pub fn all<I>(&self, items: &[I]) -> Result<bool>
    where
        I: Borrow<S::Item>,
    {
        for item in items {
            if !self.accept(item.borrow())? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<S: Shape> Default for Listing<S> {
    fn default() -> Self {
        Listing::new()
    }
}

impl<S: Shape> Clone for Listing<S> {
    fn clone(&self) -> Self {
        Listing {
            predicate: self.predicate.clone(),
            criteria: self.criteria.clone(),
            offset: self.offset,
            limit: self.limit,
        }
    }
}

impl<S: Shape> fmt::Debug for Listing<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listing")
            .field("predicate", &self.predicate)
            .field("criteria", &self.criteria)
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .finish()
    }
}
