//! Seek-plan compilation.
//!
//! A strategy's declared column directions are resolved into an *effective*
//! direction per column for each of the four (disposition, traversal)
//! combinations, and each combination gets a precompiled [`SeekPlan`]:
//! the order-by list plus the beyond-cursor predicate constructor.

use crate::query::{CompareOp, Comparison, FieldRef, OrderBy, Predicate};
use crate::value::{Value, ValueKind};

use super::{Direction, SortColumn};

/// Traversal direction through the ordered set.
///
/// Forward follows the strategy's resolved order; Backward fetches from
/// the tail under fully reversed order, and the orchestrator re-reverses
/// the rows so pages always read in the resolved forward orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Toward the end of the ordered set (`first`/`after`).
    Forward,
    /// Toward the start of the ordered set (`last`/`before`).
    Backward,
}

/// Whether the strategy's declared directions apply as-is or flipped.
///
/// Inverting flips every column's configured direction, so a strategy
/// declared `(Asc a, Desc b)` paginated inverted reads exactly like a
/// strategy declared `(Desc a, Asc b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Declared directions as-is.
    Regular,
    /// Every declared direction flipped.
    Inverted,
}

/// One column with its direction resolved for a concrete traversal.
#[derive(Debug, Clone, PartialEq)]
struct PlannedColumn {
    field: FieldRef,
    /// Strict beyond-cursor operator: `Gt` when the effective direction is
    /// ascending, `Lt` when descending.
    strict: CompareOp,
    cast: Option<ValueKind>,
}

/// A compiled plan for one (disposition, traversal) combination.
#[derive(Debug, Clone, PartialEq)]
pub struct SeekPlan {
    order_by: Vec<OrderBy>,
    columns: Vec<PlannedColumn>,
}

impl SeekPlan {
    pub(crate) fn compile(
        columns: &[SortColumn],
        disposition: Disposition,
        traversal: Traversal,
    ) -> Self {
        let mut order_by = Vec::with_capacity(columns.len());
        let mut planned = Vec::with_capacity(columns.len());

        for column in columns {
            let mut direction = column.direction;
            if disposition == Disposition::Inverted {
                direction = direction.reversed();
            }
            if traversal == Traversal::Backward {
                direction = direction.reversed();
            }

            order_by.push(OrderBy::new(column.field.clone(), direction));
            planned.push(PlannedColumn {
                field: column.field.clone(),
                strict: match direction {
                    Direction::Asc => CompareOp::Gt,
                    Direction::Desc => CompareOp::Lt,
                },
                cast: column.value_type,
            });
        }

        Self {
            order_by,
            columns: planned,
        }
    }

    /// The ordering this plan imposes on the query.
    #[must_use]
    pub fn order_by(&self) -> &[OrderBy] {
        &self.order_by
    }

    /// Build the beyond-cursor predicate for one decoded cursor.
    ///
    /// The tree is the lexicographic "past the cursor tuple" expansion,
    /// built right to left. For columns `a, b, c` (all effective-ascending)
    /// and cursor values `1, 2, 3`:
    ///
    /// ```text
    /// a >= 1 AND (a > 1 OR (a = 1 AND (b > 2 OR (b = 2 AND c > 3))))
    /// ```
    ///
    /// Descending columns compare with `<`/`<=` instead. The leading
    /// non-strict bound repeats the first column so a composite index can
    /// satisfy it directly; the strict/equality tree behind it still
    /// excludes the cursor row itself.
    #[must_use]
    pub fn seek_predicate(&self, cursor_values: &[Value]) -> Predicate {
        debug_assert_eq!(
            cursor_values.len(),
            self.columns.len(),
            "cursor arity must match the plan's column count"
        );

        let mut tree: Option<Predicate> = None;
        for (column, value) in self.columns.iter().zip(cursor_values).rev() {
            let beyond = Predicate::Compare(Comparison {
                field: column.field.clone(),
                op: column.strict,
                value: value.clone(),
                cast: column.cast,
            });
            tree = Some(match tree.take() {
                None => beyond,
                Some(deeper) => {
                    let tie = Predicate::Compare(Comparison {
                        field: column.field.clone(),
                        op: CompareOp::Eq,
                        value: value.clone(),
                        cast: column.cast,
                    });
                    Predicate::Or(vec![beyond, Predicate::And(vec![tie, deeper])])
                },
            });
        }

        match (self.columns.first(), cursor_values.first(), tree) {
            (Some(first), Some(value), Some(tree)) => {
                let bound = Predicate::Compare(Comparison {
                    field: first.field.clone(),
                    op: first.strict.non_strict(),
                    value: value.clone(),
                    cast: first.cast,
                });
                Predicate::And(vec![bound, tree])
            },
            // Unreachable through a registered strategy (always >= 1
            // column); an empty plan seeks past nothing.
            _ => Predicate::And(Vec::new()),
        }
    }
}

/// The four precompiled plans of one strategy.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanSet {
    forward_regular: SeekPlan,
    backward_regular: SeekPlan,
    forward_inverted: SeekPlan,
    backward_inverted: SeekPlan,
}

impl PlanSet {
    pub(crate) fn compile(columns: &[SortColumn]) -> Self {
        Self {
            forward_regular: SeekPlan::compile(columns, Disposition::Regular, Traversal::Forward),
            backward_regular: SeekPlan::compile(columns, Disposition::Regular, Traversal::Backward),
            forward_inverted: SeekPlan::compile(columns, Disposition::Inverted, Traversal::Forward),
            backward_inverted: SeekPlan::compile(
                columns,
                Disposition::Inverted,
                Traversal::Backward,
            ),
        }
    }

    pub(crate) const fn get(&self, disposition: Disposition, traversal: Traversal) -> &SeekPlan {
        match (disposition, traversal) {
            (Disposition::Regular, Traversal::Forward) => &self.forward_regular,
            (Disposition::Regular, Traversal::Backward) => &self.backward_regular,
            (Disposition::Inverted, Traversal::Forward) => &self.forward_inverted,
            (Disposition::Inverted, Traversal::Backward) => &self.backward_inverted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{and, compare, compare_cast, or};

    fn column(field: &str, direction: Direction) -> SortColumn {
        SortColumn {
            field: field.into(),
            direction,
            value_type: None,
        }
    }

    #[test]
    fn test_single_column_asc_forward() {
        let plan = SeekPlan::compile(
            &[column("id", Direction::Asc)],
            Disposition::Regular,
            Traversal::Forward,
        );

        assert_eq!(plan.order_by(), &[OrderBy::new("id", Direction::Asc)]);
        assert_eq!(
            plan.seek_predicate(&[Value::Int(100)]),
            and(vec![
                compare("id", CompareOp::Gte, 100i64),
                compare("id", CompareOp::Gt, 100i64),
            ])
        );
    }

    #[test]
    fn test_single_column_desc_forward() {
        let plan = SeekPlan::compile(
            &[column("created_at", Direction::Desc)],
            Disposition::Regular,
            Traversal::Forward,
        );

        assert_eq!(
            plan.order_by(),
            &[OrderBy::new("created_at", Direction::Desc)]
        );
        assert_eq!(
            plan.seek_predicate(&[Value::String("2024-01-01".into())]),
            and(vec![
                compare("created_at", CompareOp::Lte, "2024-01-01"),
                compare("created_at", CompareOp::Lt, "2024-01-01"),
            ])
        );
    }

    #[test]
    fn test_single_column_asc_backward_flips_operator() {
        let plan = SeekPlan::compile(
            &[column("id", Direction::Asc)],
            Disposition::Regular,
            Traversal::Backward,
        );

        // Backward over an ascending column fetches in descending order
        // and seeks with <.
        assert_eq!(plan.order_by(), &[OrderBy::new("id", Direction::Desc)]);
        assert_eq!(
            plan.seek_predicate(&[Value::Int(100)]),
            and(vec![
                compare("id", CompareOp::Lte, 100i64),
                compare("id", CompareOp::Lt, 100i64),
            ])
        );
    }

    #[test]
    fn test_two_columns_mixed_directions() {
        // (last_name Asc, id Desc), forward: the tie-break on last_name
        // equality steps into id with the *descending* strict operator.
        let plan = SeekPlan::compile(
            &[
                column("last_name", Direction::Asc),
                column("id", Direction::Desc),
            ],
            Disposition::Regular,
            Traversal::Forward,
        );

        assert_eq!(
            plan.order_by(),
            &[
                OrderBy::new("last_name", Direction::Asc),
                OrderBy::new("id", Direction::Desc),
            ]
        );
        assert_eq!(
            plan.seek_predicate(&[Value::String("May".into()), Value::Int(7)]),
            and(vec![
                compare("last_name", CompareOp::Gte, "May"),
                or(vec![
                    compare("last_name", CompareOp::Gt, "May"),
                    and(vec![
                        compare("last_name", CompareOp::Eq, "May"),
                        compare("id", CompareOp::Lt, 7i64),
                    ]),
                ]),
            ])
        );
    }

    #[test]
    fn test_three_columns_nest_right_to_left() {
        let plan = SeekPlan::compile(
            &[
                column("a", Direction::Asc),
                column("b", Direction::Asc),
                column("c", Direction::Asc),
            ],
            Disposition::Regular,
            Traversal::Forward,
        );

        assert_eq!(
            plan.seek_predicate(&[Value::Int(1), Value::Int(2), Value::Int(3)]),
            and(vec![
                compare("a", CompareOp::Gte, 1i64),
                or(vec![
                    compare("a", CompareOp::Gt, 1i64),
                    and(vec![
                        compare("a", CompareOp::Eq, 1i64),
                        or(vec![
                            compare("b", CompareOp::Gt, 2i64),
                            and(vec![
                                compare("b", CompareOp::Eq, 2i64),
                                compare("c", CompareOp::Gt, 3i64),
                            ]),
                        ]),
                    ]),
                ]),
            ])
        );
    }

    #[test]
    fn test_four_columns_order_by_resolves_each_direction() {
        let plan = SeekPlan::compile(
            &[
                column("a", Direction::Asc),
                column("b", Direction::Desc),
                column("c", Direction::Asc),
                column("d", Direction::Desc),
            ],
            Disposition::Regular,
            Traversal::Backward,
        );

        assert_eq!(
            plan.order_by(),
            &[
                OrderBy::new("a", Direction::Desc),
                OrderBy::new("b", Direction::Asc),
                OrderBy::new("c", Direction::Desc),
                OrderBy::new("d", Direction::Asc),
            ]
        );
    }

    #[test]
    fn test_inverted_disposition_flips_every_column() {
        let columns = [
            column("a", Direction::Asc),
            column("b", Direction::Desc),
        ];
        let inverted =
            SeekPlan::compile(&columns, Disposition::Inverted, Traversal::Forward);
        let declared_inverted = SeekPlan::compile(
            &[column("a", Direction::Desc), column("b", Direction::Asc)],
            Disposition::Regular,
            Traversal::Forward,
        );

        assert_eq!(inverted, declared_inverted);
    }

    #[test]
    fn test_inverted_backward_double_flip_restores_declared_order() {
        let columns = [
            column("a", Direction::Asc),
            column("b", Direction::Desc),
        ];
        let inverted_backward =
            SeekPlan::compile(&columns, Disposition::Inverted, Traversal::Backward);
        let regular_forward =
            SeekPlan::compile(&columns, Disposition::Regular, Traversal::Forward);

        assert_eq!(inverted_backward, regular_forward);
    }

    #[test]
    fn test_cast_hint_flows_into_every_comparison() {
        let plan = SeekPlan::compile(
            &[
                column("lane", Direction::Asc),
                SortColumn {
                    field: "id".into(),
                    direction: Direction::Asc,
                    value_type: Some(ValueKind::Uuid),
                },
            ],
            Disposition::Regular,
            Traversal::Forward,
        );

        let id = uuid::Uuid::from_u128(9);
        assert_eq!(
            plan.seek_predicate(&[Value::Int(1), Value::Uuid(id)]),
            and(vec![
                compare("lane", CompareOp::Gte, 1i64),
                or(vec![
                    compare("lane", CompareOp::Gt, 1i64),
                    and(vec![
                        compare("lane", CompareOp::Eq, 1i64),
                        compare_cast("id", CompareOp::Gt, id, ValueKind::Uuid),
                    ]),
                ]),
            ])
        );
    }
}
