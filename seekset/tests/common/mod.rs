//! Shared test support: an in-memory `QuerySource` that actually sorts,
//! filters, and projects, so pagination semantics can be checked
//! end-to-end without a database.

use std::cmp::Ordering;
use std::convert::Infallible;

use seekset::{
    CompareOp, Comparison, Direction, FieldRef, KeyedRow, OrderBy, Predicate, QuerySource, Value,
};

/// A record: named field values.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new<const N: usize>(fields: [(&str, Value); N]) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> &Value {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
            .unwrap_or_else(|| panic!("record has no field '{field}'"))
    }
}

/// In-memory query over a vector of records.
#[derive(Debug, Clone)]
pub struct MemorySource {
    rows: Vec<Record>,
    order: Vec<OrderBy>,
    predicates: Vec<Predicate>,
    projection: Vec<FieldRef>,
    limit: Option<usize>,
    pre_ordered: bool,
}

impl MemorySource {
    pub fn new(rows: Vec<Record>) -> Self {
        Self {
            rows,
            order: Vec::new(),
            predicates: Vec::new(),
            projection: Vec::new(),
            limit: None,
            pre_ordered: false,
        }
    }

    /// Pretend the caller already ordered the query.
    #[allow(dead_code)]
    pub fn pre_ordered(mut self) -> Self {
        self.pre_ordered = true;
        self
    }
}

impl QuerySource for MemorySource {
    type Record = Record;
    type Error = Infallible;

    fn has_explicit_order(&self) -> bool {
        self.pre_ordered
    }

    fn order_by(mut self, terms: &[OrderBy]) -> Self {
        self.order.extend(terms.iter().cloned());
        self
    }

    fn filter(mut self, predicate: &Predicate) -> Self {
        self.predicates.push(predicate.clone());
        self
    }

    fn project(mut self, key_fields: &[FieldRef]) -> Self {
        self.projection = key_fields.to_vec();
        self
    }

    fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn execute(self) -> Result<Vec<KeyedRow<Record>>, Infallible> {
        let mut rows: Vec<Record> = self
            .rows
            .into_iter()
            .filter(|record| self.predicates.iter().all(|p| eval(p, record)))
            .collect();

        rows.sort_by(|a, b| {
            for term in &self.order {
                let ordering = compare_values(a.get(term.field.as_str()), b.get(term.field.as_str()));
                let ordering = match term.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }

        Ok(rows
            .into_iter()
            .map(|record| {
                let key_values = self
                    .projection
                    .iter()
                    .map(|field| record.get(field.as_str()).clone())
                    .collect();
                KeyedRow::new(key_values, record)
            })
            .collect())
    }
}

fn eval(predicate: &Predicate, record: &Record) -> bool {
    match predicate {
        Predicate::Compare(comparison) => eval_comparison(comparison, record),
        Predicate::And(parts) => parts.iter().all(|p| eval(p, record)),
        Predicate::Or(parts) => parts.iter().any(|p| eval(p, record)),
    }
}

fn eval_comparison(comparison: &Comparison, record: &Record) -> bool {
    let ordering = compare_values(record.get(comparison.field.as_str()), &comparison.value);
    match comparison.op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Gte => ordering != Ordering::Less,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Lte => ordering != Ordering::Greater,
    }
}

/// Total order over same-kind values; test data never mixes kinds in one
/// column.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => {
            a.partial_cmp(b).expect("test data never compares NaN")
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Uuid(a), Value::Uuid(b)) => a.cmp(b),
        (Value::Null, Value::Null) => Ordering::Equal,
        (a, b) => panic!("cannot compare {a:?} with {b:?}"),
    }
}
