//! The query collaborator interface.

use crate::strategy::Direction;
use crate::value::Value;

use super::predicate::{FieldRef, Predicate};

/// One ordering term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The field to order on.
    pub field: FieldRef,
    /// The direction to order in.
    pub direction: Direction,
}

impl OrderBy {
    /// Create a new ordering term.
    pub fn new(field: impl Into<FieldRef>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// A fetched row: the projected sort-key tuple plus the full record.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRow<R> {
    /// Sort-key values in strategy column order.
    pub key_values: Vec<Value>,
    /// The record exactly as the caller's query produces it.
    pub record: R,
}

impl<R> KeyedRow<R> {
    /// Pair a key tuple with its record.
    pub fn new(key_values: Vec<Value>, record: R) -> Self {
        Self { key_values, record }
    }
}

/// What pagination requires from its environment: a query value that can be
/// extended with ordering, filtering, projection, and a row limit, then
/// executed once.
///
/// Every extension step consumes the query and returns the extended query,
/// so implementations compose builder-style. How (and where) `execute`
/// runs is entirely the implementor's business - a blocking call against
/// an embedded store and a bridge into an async driver are both fine.
/// Hosts that must `await` can stop before `execute`: see
/// [`Paginator::prepare`](crate::Paginator::prepare).
pub trait QuerySource: Sized {
    /// Record type produced by execution.
    type Record;

    /// Execution error. Pagination never interprets it; it is passed
    /// through to the caller unchanged.
    type Error;

    /// Whether the query already carries an explicit ordering.
    ///
    /// Pagination imposes its own ordering; a pre-ordered query is a
    /// programming error and is rejected before execution.
    fn has_explicit_order(&self) -> bool;

    /// Append ordering terms.
    #[must_use]
    fn order_by(self, terms: &[OrderBy]) -> Self;

    /// AND an additional predicate into the query's filters.
    #[must_use]
    fn filter(self, predicate: &Predicate) -> Self;

    /// Project the given fields as each row's key tuple, alongside the
    /// full record. `execute` must yield key values in exactly this order.
    #[must_use]
    fn project(self, key_fields: &[FieldRef]) -> Self;

    /// Cap the number of fetched rows.
    #[must_use]
    fn limit(self, limit: usize) -> Self;

    /// Run the query.
    fn execute(self) -> Result<Vec<KeyedRow<Self::Record>>, Self::Error>;
}
