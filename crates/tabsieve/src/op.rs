//! Node tags for predicate trees.
//!
//! Every [`Predicate`](crate::Predicate) node carries an [`Op`] set at
//! construction. The tag drives `Display` output and lets callers inspect a
//! tree without matching on its private structure.

use std::cmp::Ordering;

/// Kind of a predicate node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    // Null and emptiness tests
    /// Value is absent.
    IsNull,
    /// Value is present.
    IsNotNull,
    /// Value is absent, an empty string, or an empty collection.
    IsEmpty,
    /// Negation of `IsEmpty`.
    IsNotEmpty,

    // Equality and membership
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Value equals one of a candidate list.
    In,
    /// Value equals none of a candidate list.
    NotIn,
    /// Whole value matches a regular expression.
    Regex,

    // Ordering
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Inclusive range.
    Between,

    // Combinators
    /// All children accept.
    And,
    /// At least one child accepts.
    Or,
    /// The single child rejects.
    Not,
}

impl Op {
    /// Returns `true` for `And`, `Or` and `Not`.
    pub fn is_combinator(self) -> bool {
        matches!(self, Op::And | Op::Or | Op::Not)
    }

    /// Returns `true` if this operator is decided by an ordering result.
    pub fn is_ordering_op(self) -> bool {
        matches!(self, Op::Gt | Op::Ge | Op::Lt | Op::Le)
    }

    /// Evaluates an ordering operator given the result of comparing the field
    /// value (left) with the operand (right).
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Gt => ordering == Ordering::Greater,
            Op::Ge => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Le => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::IsNull => "is_null",
            Op::IsNotNull => "is_not_null",
            Op::IsEmpty => "is_empty",
            Op::IsNotEmpty => "is_not_empty",
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::In => "in",
            Op::NotIn => "not_in",
            Op::Regex => "regex",
            Op::Gt => "gt",
            Op::Ge => "ge",
            Op::Lt => "lt",
            Op::Le => "le",
            Op::Between => "between",
            Op::And => "and",
            Op::Or => "or",
            Op::Not => "not",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
