//! Predicate trees.
//!
//! A [`Predicate`] is either a leaf (a field key plus a test) or a combinator
//! (`and`, `or`, `not`) over child predicates. The same tree type serves every
//! data shape; the shape only decides how a field key becomes a [`Value`].
//!
//! Leaves validate their operands when they are built, so a malformed
//! predicate never reaches evaluation. Combinators may be built empty and
//! filled later with [`Predicate::push`]; evaluating one that is still empty
//! fails with [`SieveError::InvalidState`].

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::compare::{self, Comparator};
use crate::error::{Result, SieveError};
use crate::op::Op;
use crate::operand::Operand;
use crate::schema::Record;
use crate::shape::{Dynamic, IntoKey, Named, Positional, Shape, Structured};
use crate::value::Value;

/// Predicate over positional rows.
pub type RowPredicate = Predicate<Positional>;

/// Predicate over rows addressed by column name.
pub type NamedRowPredicate = Predicate<Named>;

/// Predicate over structured records.
pub type RecordPredicate<T> = Predicate<Structured<T>>;

/// Predicate over JSON documents.
pub type JsonPredicate = Predicate<Dynamic>;

/// Shapes whose values carry types beyond text, and therefore accept an
/// injectable [`Comparator`] on their leaves.
pub trait TypedShape: Shape {}

impl<T: Record> TypedShape for Structured<T> {}

impl TypedShape for Dynamic {}

/// A boolean test over one data shape.
///
/// # Example
///
/// ```
/// use tabsieve::RowPredicate;
///
/// let row = vec![None, Some("aaa".to_string()), Some("bbb".to_string())];
///
/// let p = RowPredicate::all([
///     RowPredicate::is_empty(0),
///     RowPredicate::eq(1, "aaa")?,
///     RowPredicate::not(RowPredicate::regex(2, "a+")?),
/// ]);
/// assert!(p.accept(&row)?);
/// # Ok::<(), tabsieve::SieveError>(())
/// ```
pub struct Predicate<S: Shape> {
    node: Node<S>,
}

enum Node<S: Shape> {
    Leaf { field: S::Key, test: Test },
    Not(Box<Predicate<S>>),
    All(Vec<Predicate<S>>),
    Any(Vec<Predicate<S>>),
}

#[derive(Debug, Clone)]
enum Test {
    IsNull,
    IsNotNull,
    IsEmpty,
    IsNotEmpty,
    Eq {
        operand: Operand,
        ignore_case: bool,
        comparator: Option<Comparator>,
    },
    Ne {
        operand: Operand,
        ignore_case: bool,
        comparator: Option<Comparator>,
    },
    In {
        candidates: Vec<Operand>,
        ignore_case: bool,
    },
    NotIn {
        candidates: Vec<Operand>,
        ignore_case: bool,
    },
    Regex {
        pattern: String,
        regex: Regex,
    },
    Ordered {
        op: Op,
        operand: Operand,
        comparator: Option<Comparator>,
    },
    Between {
        low: Operand,
        high: Operand,
        comparator: Option<Comparator>,
    },
}

impl Test {
    fn op(&self) -> Op {
        match self {
            Test::IsNull => Op::IsNull,
            Test::IsNotNull => Op::IsNotNull,
            Test::IsEmpty => Op::IsEmpty,
            Test::IsNotEmpty => Op::IsNotEmpty,
            Test::Eq { .. } => Op::Eq,
            Test::Ne { .. } => Op::Ne,
            Test::In { .. } => Op::In,
            Test::NotIn { .. } => Op::NotIn,
            Test::Regex { .. } => Op::Regex,
            Test::Ordered { op, .. } => *op,
            Test::Between { .. } => Op::Between,
        }
    }

    fn eval(&self, v: &Value<'_>) -> Result<bool> {
        let matched = match self {
            Test::IsNull => compare::is_null(v),
            Test::IsNotNull => !compare::is_null(v),
            Test::IsEmpty => compare::is_empty(v),
            Test::IsNotEmpty => !compare::is_empty(v),
            Test::Eq {
                operand,
                ignore_case,
                comparator,
            } => compare::eq(v, &operand.as_value(), *ignore_case, comparator.as_ref()),
            Test::Ne {
                operand,
                ignore_case,
                comparator,
            } => !compare::eq(v, &operand.as_value(), *ignore_case, comparator.as_ref()),
            Test::In {
                candidates,
                ignore_case,
            } => compare::is_in(v, candidates.iter().map(Operand::as_value), *ignore_case),
            Test::NotIn {
                candidates,
                ignore_case,
            } => compare::not_in(v, candidates.iter().map(Operand::as_value), *ignore_case),
            Test::Regex { regex, .. } => compare::regex_match(v, regex),
            Test::Ordered {
                op,
                operand,
                comparator,
            } => {
                let criteria = operand.as_value();
                match op {
                    Op::Gt => compare::gt(v, &criteria, comparator.as_ref())?,
                    Op::Ge => compare::ge(v, &criteria, comparator.as_ref())?,
                    Op::Lt => compare::lt(v, &criteria, comparator.as_ref())?,
                    _ => compare::le(v, &criteria, comparator.as_ref())?,
                }
            }
            Test::Between {
                low,
                high,
                comparator,
            } => compare::between(v, &low.as_value(), &high.as_value(), comparator.as_ref())?,
        };
        Ok(matched)
    }

    fn ignore_case(&self) -> bool {
        match self {
            Test::Eq { ignore_case, .. }
            | Test::Ne { ignore_case, .. }
            | Test::In { ignore_case, .. }
            | Test::NotIn { ignore_case, .. } => *ignore_case,
            Test::Regex { regex, .. } => regex.as_str().starts_with("(?i)"),
            _ => false,
        }
    }
}

fn candidates<I, V>(values: I) -> Result<Vec<Operand>>
where
    I: IntoIterator<Item = V>,
    V: Into<Operand>,
{
    values
        .into_iter()
        .map(|v| v.into().required("candidate"))
        .collect()
}

fn compile_regex(pattern: &str, ignore_case: bool) -> Result<Regex> {
    if pattern.is_empty() {
        return Err(SieveError::invalid_argument("regex pattern must not be empty"));
    }
    // Compiled on its own first so an unbalanced group cannot close the anchors.
    RegexBuilder::new(pattern).build()?;
    let anchored = if ignore_case {
        format!("(?i)^(?:{})$", pattern)
    } else {
        format!("^(?:{})$", pattern)
    };
    Ok(RegexBuilder::new(&anchored).build()?)
}

impl<S: Shape> Predicate<S> {
    fn leaf(field: impl IntoKey<S::Key>, test: Test) -> Self {
        Predicate {
            node: Node::Leaf {
                field: field.into_key(),
                test,
            },
        }
    }

    fn equality(
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
        ignore_case: bool,
        comparator: Option<Comparator>,
        negate: bool,
    ) -> Result<Self> {
        let operand = value.into().required("operand")?;
        let test = if negate {
            Test::Ne {
                operand,
                ignore_case,
                comparator,
            }
        } else {
            Test::Eq {
                operand,
                ignore_case,
                comparator,
            }
        };
        Ok(Self::leaf(field, test))
    }

    fn ordered(
        field: impl IntoKey<S::Key>,
        op: Op,
        value: impl Into<Operand>,
        comparator: Option<Comparator>,
    ) -> Result<Self> {
        let operand = value.into().required("operand")?;
        Ok(Self::leaf(
            field,
            Test::Ordered {
                op,
                operand,
                comparator,
            },
        ))
    }

    fn range(
        field: impl IntoKey<S::Key>,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
        comparator: Option<Comparator>,
    ) -> Result<Self> {
        let low = low.into().required("low bound")?;
        let high = high.into().required("high bound")?;
        Ok(Self::leaf(
            field,
            Test::Between {
                low,
                high,
                comparator,
            },
        ))
    }

    // ========================================================================
    // Null and emptiness
    // ========================================================================

    /// Accepts items whose field is absent.
    pub fn is_null(field: impl IntoKey<S::Key>) -> Self {
        Self::leaf(field, Test::IsNull)
    }

    /// Accepts items whose field is present.
    pub fn is_not_null(field: impl IntoKey<S::Key>) -> Self {
        Self::leaf(field, Test::IsNotNull)
    }

    /// Accepts items whose field is absent, an empty string or an empty
    /// collection.
    pub fn is_empty(field: impl IntoKey<S::Key>) -> Self {
        Self::leaf(field, Test::IsEmpty)
    }

    /// Negation of [`Predicate::is_empty`].
    pub fn is_not_empty(field: impl IntoKey<S::Key>) -> Self {
        Self::leaf(field, Test::IsNotEmpty)
    }

    // ========================================================================
    // Equality and membership
    // ========================================================================

    /// Field equals the value.
    pub fn eq(field: impl IntoKey<S::Key>, value: impl Into<Operand>) -> Result<Self> {
        Self::equality(field, value, false, None, false)
    }

    /// Field equals the value, comparing strings case-insensitively.
    pub fn eq_ignore_case(field: impl IntoKey<S::Key>, value: impl Into<Operand>) -> Result<Self> {
        Self::equality(field, value, true, None, false)
    }

    /// Field does not equal the value. An absent field is not equal.
    pub fn ne(field: impl IntoKey<S::Key>, value: impl Into<Operand>) -> Result<Self> {
        Self::equality(field, value, false, None, true)
    }

    /// Case-insensitive [`Predicate::ne`].
    pub fn ne_ignore_case(field: impl IntoKey<S::Key>, value: impl Into<Operand>) -> Result<Self> {
        Self::equality(field, value, true, None, true)
    }

    /// Field equals one of the candidates.
    pub fn is_in<I, V>(field: impl IntoKey<S::Key>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        let candidates = candidates(values)?;
        Ok(Self::leaf(
            field,
            Test::In {
                candidates,
                ignore_case: false,
            },
        ))
    }

    /// Case-insensitive [`Predicate::is_in`].
    pub fn is_in_ignore_case<I, V>(field: impl IntoKey<S::Key>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        let candidates = candidates(values)?;
        Ok(Self::leaf(
            field,
            Test::In {
                candidates,
                ignore_case: true,
            },
        ))
    }

    /// Field equals none of the candidates.
    pub fn not_in<I, V>(field: impl IntoKey<S::Key>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        let candidates = candidates(values)?;
        Ok(Self::leaf(
            field,
            Test::NotIn {
                candidates,
                ignore_case: false,
            },
        ))
    }

    /// Case-insensitive [`Predicate::not_in`].
    pub fn not_in_ignore_case<I, V>(field: impl IntoKey<S::Key>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        let candidates = candidates(values)?;
        Ok(Self::leaf(
            field,
            Test::NotIn {
                candidates,
                ignore_case: true,
            },
        ))
    }

    /// The whole field matches the pattern.
    pub fn regex(field: impl IntoKey<S::Key>, pattern: &str) -> Result<Self> {
        let regex = compile_regex(pattern, false)?;
        Ok(Self::leaf(
            field,
            Test::Regex {
                pattern: pattern.to_string(),
                regex,
            },
        ))
    }

    /// Case-insensitive [`Predicate::regex`].
    pub fn regex_ignore_case(field: impl IntoKey<S::Key>, pattern: &str) -> Result<Self> {
        let regex = compile_regex(pattern, true)?;
        Ok(Self::leaf(
            field,
            Test::Regex {
                pattern: pattern.to_string(),
                regex,
            },
        ))
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Field is greater than the value.
    pub fn gt(field: impl IntoKey<S::Key>, value: impl Into<Operand>) -> Result<Self> {
        Self::ordered(field, Op::Gt, value, None)
    }

    /// Field is greater than or equal to the value.
    pub fn ge(field: impl IntoKey<S::Key>, value: impl Into<Operand>) -> Result<Self> {
        Self::ordered(field, Op::Ge, value, None)
    }

    /// Field is less than the value.
    pub fn lt(field: impl IntoKey<S::Key>, value: impl Into<Operand>) -> Result<Self> {
        Self::ordered(field, Op::Lt, value, None)
    }

    /// Field is less than or equal to the value.
    pub fn le(field: impl IntoKey<S::Key>, value: impl Into<Operand>) -> Result<Self> {
        Self::ordered(field, Op::Le, value, None)
    }

    /// Field lies in `[low, high]`.
    pub fn between(
        field: impl IntoKey<S::Key>,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> Result<Self> {
        Self::range(field, low, high, None)
    }

    // ========================================================================
    // Combinators
    // ========================================================================

    /// Negates a predicate.
    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Predicate<S>) -> Self {
        Predicate {
            node: Node::Not(Box::new(child)),
        }
    }

    /// Accepts when every child accepts. Evaluation stops at the first
    /// rejecting child.
    pub fn all(children: impl IntoIterator<Item = Predicate<S>>) -> Self {
        Predicate {
            node: Node::All(children.into_iter().collect()),
        }
    }

    /// Accepts when at least one child accepts. Evaluation stops at the first
    /// accepting child.
    pub fn any(children: impl IntoIterator<Item = Predicate<S>>) -> Self {
        Predicate {
            node: Node::Any(children.into_iter().collect()),
        }
    }

    /// Appends a child to an `and` or `or` combinator.
    ///
    /// Fails with `InvalidArgument` on leaves and `not` nodes.
    pub fn push(&mut self, child: Predicate<S>) -> Result<()> {
        match self.children_mut() {
            Some(children) => {
                children.push(child);
                Ok(())
            }
            None => Err(SieveError::invalid_argument(format!(
                "cannot add a child to a '{}' predicate",
                self.op()
            ))),
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Predicate<S>>> {
        match &mut self.node {
            Node::All(children) | Node::Any(children) => Some(children),
            _ => None,
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the node tag.
    pub fn op(&self) -> Op {
        match &self.node {
            Node::Leaf { test, .. } => test.op(),
            Node::Not(_) => Op::Not,
            Node::All(_) => Op::And,
            Node::Any(_) => Op::Or,
        }
    }

    /// Returns the field key of a leaf.
    pub fn field(&self) -> Option<&S::Key> {
        match &self.node {
            Node::Leaf { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Returns the children of a combinator, in evaluation order.
    ///
    /// A `not` node has exactly one child; leaves have none.
    pub fn children(&self) -> &[Predicate<S>] {
        match &self.node {
            Node::Leaf { .. } => &[],
            Node::Not(child) => std::slice::from_ref(child.as_ref()),
            Node::All(children) | Node::Any(children) => children,
        }
    }

    /// Returns `true` for `and` and `or` nodes.
    pub fn is_combinator(&self) -> bool {
        matches!(self.node, Node::All(_) | Node::Any(_))
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Tests an item.
    ///
    /// Field resolution and comparison errors propagate; no partial result
    /// is ever returned.
    pub fn accept(&self, item: &S::Item) -> Result<bool> {
        match &self.node {
            Node::Leaf { field, test } => {
                let value = S::resolve(item, field)?;
                test.eval(&value)
            }
            Node::Not(child) => Ok(!child.accept(item)?),
            Node::All(children) => {
                if children.is_empty() {
                    return Err(SieveError::InvalidState("'and' predicate has no children"));
                }
                for child in children {
                    if !child.accept(item)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Node::Any(children) => {
                if children.is_empty() {
                    return Err(SieveError::InvalidState("'or' predicate has no children"));
                }
                for child in children {
                    if child.accept(item)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

impl<S: TypedShape> Predicate<S> {
    /// Field equals the value according to `comparator`.
    pub fn eq_by(
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
        comparator: Comparator,
    ) -> Result<Self> {
        Self::equality(field, value, false, Some(comparator), false)
    }

    /// Field differs from the value according to `comparator`.
    pub fn ne_by(
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
        comparator: Comparator,
    ) -> Result<Self> {
        Self::equality(field, value, false, Some(comparator), true)
    }

    /// [`Predicate::gt`] with an injected ordering.
    pub fn gt_by(
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
        comparator: Comparator,
    ) -> Result<Self> {
        Self::ordered(field, Op::Gt, value, Some(comparator))
    }

    /// [`Predicate::ge`] with an injected ordering.
    pub fn ge_by(
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
        comparator: Comparator,
    ) -> Result<Self> {
        Self::ordered(field, Op::Ge, value, Some(comparator))
    }

    /// [`Predicate::lt`] with an injected ordering.
    pub fn lt_by(
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
        comparator: Comparator,
    ) -> Result<Self> {
        Self::ordered(field, Op::Lt, value, Some(comparator))
    }

    /// [`Predicate::le`] with an injected ordering.
    pub fn le_by(
        field: impl IntoKey<S::Key>,
        value: impl Into<Operand>,
        comparator: Comparator,
    ) -> Result<Self> {
        Self::ordered(field, Op::Le, value, Some(comparator))
    }

    /// [`Predicate::between`] with an injected ordering.
    pub fn between_by(
        field: impl IntoKey<S::Key>,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
        comparator: Comparator,
    ) -> Result<Self> {
        Self::range(field, low, high, Some(comparator))
    }
}

impl<S: Shape> Clone for Predicate<S> {
    fn clone(&self) -> Self {
        let node = match &self.node {
            Node::Leaf { field, test } => Node::Leaf {
                field: field.clone(),
                test: test.clone(),
            },
            Node::Not(child) => Node::Not(child.clone()),
            Node::All(children) => Node::All(children.clone()),
            Node::Any(children) => Node::Any(children.clone()),
        };
        Predicate { node }
    }
}

impl<S: Shape> fmt::Debug for Predicate<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::Leaf { field, test } => f
                .debug_struct("Predicate")
                .field("op", &test.op())
                .field("field", field)
                .field("test", test)
                .finish(),
            _ => f
                .debug_struct("Predicate")
                .field("op", &self.op())
                .field("children", &self.children())
                .finish(),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, values: &[Operand]) -> fmt::Result {
    f.write_str("[")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", value)?;
    }
    f.write_str("]")
}

impl<S: Shape> fmt::Display for Predicate<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::Leaf { field, test } => {
                let suffix = if test.ignore_case() { "(i)" } else { "" };
                write!(f, "{} {}{}", field, test.op(), suffix)?;
                match test {
                    Test::IsNull | Test::IsNotNull | Test::IsEmpty | Test::IsNotEmpty => Ok(()),
                    Test::Eq { operand, .. }
                    | Test::Ne { operand, .. }
                    | Test::Ordered { operand, .. } => write!(f, " {}", operand),
                    Test::In { candidates, .. } | Test::NotIn { candidates, .. } => {
                        f.write_str(" ")?;
                        write_list(f, candidates)
                    }
                    Test::Regex { pattern, .. } => write!(f, " /{}/", pattern),
                    Test::Between { low, high, .. } => write!(f, " {} and {}", low, high),
                }
            }
            Node::Not(child) => write!(f, "not({})", child),
            Node::All(children) | Node::Any(children) => {
                let joiner = if matches!(self.node, Node::All(_)) {
                    " and "
                } else {
                    " or "
                };
                if children.is_empty() {
                    return write!(f, "({})", self.op());
                }
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(joiner)?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
        }
    }
}
