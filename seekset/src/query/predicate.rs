//! Boolean predicate trees over sort-key comparisons.

use std::fmt;

use crate::value::{Value, ValueKind};

/// Reference to a sort field: an opaque expression the query executor
/// understands.
///
/// The library never inspects the text. Plain column names, qualified
/// names, and computed expressions are all legal - which is also how
/// nullable sort columns are handled: wrap the column in a NULL-coalescing
/// expression at declaration time. The seek predicate itself never
/// special-cases NULL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef(String);

impl FieldRef {
    /// Wrap a field expression.
    pub fn new(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    /// The underlying expression text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldRef {
    fn from(expr: &str) -> Self {
        Self::new(expr)
    }
}

impl From<String> for FieldRef {
    fn from(expr: String) -> Self {
        Self(expr)
    }
}

/// Comparison operators available to seek predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal: `=`
    Eq,
    /// Greater than: `>`
    Gt,
    /// Greater than or equal: `>=`
    Gte,
    /// Less than: `<`
    Lt,
    /// Less than or equal: `<=`
    Lte,
}

impl CompareOp {
    /// The non-strict version of a strict bound (`Gt` -> `Gte`,
    /// `Lt` -> `Lte`); other operators are returned unchanged.
    #[must_use]
    pub const fn non_strict(self) -> Self {
        match self {
            Self::Gt => Self::Gte,
            Self::Lt => Self::Lte,
            other => other,
        }
    }
}

/// A single field comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// The field being compared.
    pub field: FieldRef,
    /// The comparison operator.
    pub op: CompareOp,
    /// The cursor value on the right-hand side.
    pub value: Value,
    /// Cast hint for executors that cannot infer the column type from the
    /// raw decoded value (e.g. UUID-typed columns).
    pub cast: Option<ValueKind>,
}

/// A boolean expression over field comparisons.
///
/// Seek predicates are built from these three shapes only; an empty
/// `And` is vacuously true.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// A leaf comparison.
    Compare(Comparison),
    /// All sub-predicates must hold.
    And(Vec<Predicate>),
    /// At least one sub-predicate must hold.
    Or(Vec<Predicate>),
}

/// Helper function to create a leaf comparison predicate.
pub fn compare(field: impl Into<FieldRef>, op: CompareOp, value: impl Into<Value>) -> Predicate {
    Predicate::Compare(Comparison {
        field: field.into(),
        op,
        value: value.into(),
        cast: None,
    })
}

/// Helper function to create a leaf comparison with a cast hint.
pub fn compare_cast(
    field: impl Into<FieldRef>,
    op: CompareOp,
    value: impl Into<Value>,
    cast: ValueKind,
) -> Predicate {
    Predicate::Compare(Comparison {
        field: field.into(),
        op,
        value: value.into(),
        cast: Some(cast),
    })
}

/// Helper function to create an AND predicate.
#[must_use]
pub fn and(predicates: Vec<Predicate>) -> Predicate {
    Predicate::And(predicates)
}

/// Helper function to create an OR predicate.
#[must_use]
pub fn or(predicates: Vec<Predicate>) -> Predicate {
    Predicate::Or(predicates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_strict_bounds() {
        assert_eq!(CompareOp::Gt.non_strict(), CompareOp::Gte);
        assert_eq!(CompareOp::Lt.non_strict(), CompareOp::Lte);
        assert_eq!(CompareOp::Eq.non_strict(), CompareOp::Eq);
        assert_eq!(CompareOp::Gte.non_strict(), CompareOp::Gte);
        assert_eq!(CompareOp::Lte.non_strict(), CompareOp::Lte);
    }

    #[test]
    fn test_helper_constructors() {
        let p = compare("id", CompareOp::Gt, 100i64);
        match p {
            Predicate::Compare(c) => {
                assert_eq!(c.field.as_str(), "id");
                assert_eq!(c.op, CompareOp::Gt);
                assert_eq!(c.value, Value::Int(100));
                assert_eq!(c.cast, None);
            },
            other => panic!("expected leaf comparison, got {other:?}"),
        }

        let p = compare_cast("id", CompareOp::Eq, "a-uuid", ValueKind::Uuid);
        match p {
            Predicate::Compare(c) => assert_eq!(c.cast, Some(ValueKind::Uuid)),
            other => panic!("expected leaf comparison, got {other:?}"),
        }
    }

    #[test]
    fn test_tree_equality_is_structural() {
        let a = or(vec![
            compare("a", CompareOp::Gt, 1i64),
            and(vec![
                compare("a", CompareOp::Eq, 1i64),
                compare("b", CompareOp::Lt, 2i64),
            ]),
        ]);
        let b = or(vec![
            compare("a", CompareOp::Gt, 1i64),
            and(vec![
                compare("a", CompareOp::Eq, 1i64),
                compare("b", CompareOp::Lt, 2i64),
            ]),
        ]);
        assert_eq!(a, b);
    }
}
