//! Named sort strategies and their precompiled seek plans.
//!
//! A strategy is declared once at setup time - through the builder or from
//! a `"field,-field"` sort string - and compiled into the four seek plans
//! pagination needs (regular/inverted x forward/backward). Registered
//! strategies are immutable and looked up concurrently without locking.

mod plan;

pub use plan::{Disposition, SeekPlan, Traversal};
pub(crate) use plan::PlanSet;

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::codec::MAX_CURSOR_VALUES;
use crate::query::FieldRef;
use crate::value::ValueKind;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (smallest first).
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Direction {
    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// One declared sort column.
///
/// The final column of a strategy must be unique and non-null over the
/// record set - that is what makes the ordering total and pagination
/// deterministic. The library cannot check this; declaring a non-unique
/// tail column silently produces unstable page boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct SortColumn {
    /// The field expression to sort and seek on.
    pub field: FieldRef,
    /// The declared direction.
    pub direction: Direction,
    /// Declared value kind. Doubles as the cast hint on cursor
    /// comparisons and as the converter-registry key for this column.
    pub value_type: Option<ValueKind>,
}

/// Strategy declaration errors, surfaced at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StrategyError {
    /// The strategy declares no columns.
    #[error("sort strategy '{strategy}' declares no columns")]
    NoSortColumns {
        /// The offending strategy name.
        strategy: String,
    },
    /// More columns than a cursor token can carry.
    #[error(
        "sort strategy '{strategy}' declares {count} columns, more than the {} a cursor can carry",
        MAX_CURSOR_VALUES
    )]
    TooManyColumns {
        /// The offending strategy name.
        strategy: String,
        /// The declared column count.
        count: usize,
    },
    /// A strategy with this name is already registered.
    #[error("sort strategy '{strategy}' is already registered")]
    DuplicateStrategy {
        /// The offending strategy name.
        strategy: String,
    },
}

/// A named, immutable sort strategy with precompiled seek plans.
///
/// # Example
///
/// ```
/// use seekset::{Direction, SortStrategy};
///
/// let by_name = SortStrategy::builder("by_name")
///     .asc("last_name")
///     .desc("id")
///     .build()
///     .unwrap();
///
/// assert_eq!(by_name.columns().len(), 2);
/// assert_eq!(by_name.columns()[1].direction, Direction::Desc);
///
/// // Same declaration, from a sort string
/// let parsed = SortStrategy::parse("by_name", "last_name,-id").unwrap();
/// assert_eq!(parsed.columns(), by_name.columns());
/// ```
#[derive(Debug, Clone)]
pub struct SortStrategy {
    name: String,
    columns: Vec<SortColumn>,
    key_fields: Vec<FieldRef>,
    plans: PlanSet,
}

impl SortStrategy {
    /// Start declaring a strategy.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SortStrategyBuilder {
        SortStrategyBuilder {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Declare a strategy from a sort string like `"last_name,-id"`.
    ///
    /// Fields prefixed with `-` sort descending; empty segments are
    /// skipped. Sort strings cannot declare value kinds - use the builder
    /// when a column needs a cast hint or a registered converter.
    pub fn parse(name: impl Into<String>, sort: &str) -> Result<Self, StrategyError> {
        let mut builder = Self::builder(name);
        for part in sort.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            builder = match part.strip_prefix('-') {
                Some(field) => builder.desc(field),
                None => builder.asc(part),
            };
        }
        builder.build()
    }

    /// The strategy's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared columns, in order.
    #[must_use]
    pub fn columns(&self) -> &[SortColumn] {
        &self.columns
    }

    /// The projection: every sort field, in column order.
    #[must_use]
    pub fn key_fields(&self) -> &[FieldRef] {
        &self.key_fields
    }

    /// The compiled plan for one (disposition, traversal) combination.
    #[must_use]
    pub fn plan(&self, disposition: Disposition, traversal: Traversal) -> &SeekPlan {
        self.plans.get(disposition, traversal)
    }
}

/// Builder for [`SortStrategy`].
#[derive(Debug, Clone)]
#[must_use = "call .build() to compile the strategy"]
pub struct SortStrategyBuilder {
    name: String,
    columns: Vec<SortColumn>,
}

impl SortStrategyBuilder {
    /// Append an ascending column.
    pub fn asc(self, field: impl Into<FieldRef>) -> Self {
        self.column(SortColumn {
            field: field.into(),
            direction: Direction::Asc,
            value_type: None,
        })
    }

    /// Append a descending column.
    pub fn desc(self, field: impl Into<FieldRef>) -> Self {
        self.column(SortColumn {
            field: field.into(),
            direction: Direction::Desc,
            value_type: None,
        })
    }

    /// Append an ascending column with a declared value kind.
    pub fn asc_typed(self, field: impl Into<FieldRef>, kind: ValueKind) -> Self {
        self.column(SortColumn {
            field: field.into(),
            direction: Direction::Asc,
            value_type: Some(kind),
        })
    }

    /// Append a descending column with a declared value kind.
    pub fn desc_typed(self, field: impl Into<FieldRef>, kind: ValueKind) -> Self {
        self.column(SortColumn {
            field: field.into(),
            direction: Direction::Desc,
            value_type: Some(kind),
        })
    }

    /// Append a fully specified column.
    pub fn column(mut self, column: SortColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Compile the declared columns into a strategy.
    pub fn build(self) -> Result<SortStrategy, StrategyError> {
        if self.columns.is_empty() {
            return Err(StrategyError::NoSortColumns {
                strategy: self.name,
            });
        }
        if self.columns.len() > MAX_CURSOR_VALUES {
            return Err(StrategyError::TooManyColumns {
                strategy: self.name,
                count: self.columns.len(),
            });
        }

        let key_fields = self.columns.iter().map(|c| c.field.clone()).collect();
        let plans = PlanSet::compile(&self.columns);
        Ok(SortStrategy {
            name: self.name,
            columns: self.columns,
            key_fields,
            plans,
        })
    }
}

/// Registry of named strategies.
///
/// Built once at setup time, then read-only: every pagination call looks
/// its strategy up here, and concurrent lookups need no synchronization.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    strategies: BTreeMap<String, SortStrategy>,
}

impl StrategyRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy under its declared name.
    pub fn register(&mut self, strategy: SortStrategy) -> Result<(), StrategyError> {
        if self.strategies.contains_key(strategy.name()) {
            return Err(StrategyError::DuplicateStrategy {
                strategy: strategy.name().to_string(),
            });
        }
        debug!(
            strategy = %strategy.name(),
            columns = strategy.columns().len(),
            "registered sort strategy"
        );
        self.strategies.insert(strategy.name().to_string(), strategy);
        Ok(())
    }

    /// Look a strategy up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SortStrategy> {
        self.strategies.get(name)
    }

    /// The registered strategy names, in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }

    /// Look a strategy up, panicking when it is missing.
    ///
    /// Paginating with an unregistered name is a code defect, not bad
    /// input, so the paginator fails fast instead of returning an error.
    pub(crate) fn expect(&self, name: &str) -> &SortStrategy {
        self.get(name).unwrap_or_else(|| {
            panic!("unknown sort strategy '{name}': register strategies before paginating")
        })
    }
}
