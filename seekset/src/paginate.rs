//! The pagination orchestrator.

use std::fmt;

use thiserror::Error;
use tracing::{debug, trace};

use crate::codec::{BinaryCodec, CursorCodec};
use crate::convert::{ConverterRegistry, ValueConverter};
use crate::options::{PageArgs, ValidationError};
use crate::page::Page;
use crate::query::{KeyedRow, QuerySource};
use crate::strategy::{SortStrategy, StrategyRegistry, Traversal};
use crate::value::{Value, ValueKind};

/// Default ceiling for the requested page size.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 500;

/// Errors returned by [`Paginator::paginate`].
///
/// Decode failures are deliberately collapsed into the uninformative
/// [`MalformedCursor`](Self::MalformedCursor): cursor tokens are untrusted
/// input, and the caller-facing error must not describe what the payload
/// got wrong. The specific [`DecodeError`](crate::DecodeError) is logged
/// at debug level instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PaginationError<E> {
    /// The query already carries an explicit ordering, which would fight
    /// the ordering pagination imposes. Programming error in the calling
    /// code.
    #[error("query already carries an explicit ordering; pagination imposes its own")]
    AlreadyOrdered,
    /// The supplied cursor could not be decoded, failed a value
    /// conversion, or does not match the strategy's column count.
    #[error("cursor is malformed")]
    MalformedCursor,
    /// The argument combination or page size failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Query execution failed downstream; passed through unchanged.
    #[error("query execution failed: {0}")]
    Query(E),
}

/// The pagination environment: registered strategies, value converters,
/// the default cursor codec, and the page-size ceiling.
///
/// Configured builder-style once at setup time, then shared read-only by
/// any number of concurrent pagination calls.
///
/// # Example
///
/// ```ignore
/// let mut registry = StrategyRegistry::new();
/// registry.register(SortStrategy::parse("by_name", "last_name,-id")?)?;
///
/// let paginator = Paginator::new(registry).with_max_page_size(100);
///
/// let page = paginator.paginate(query, "by_name", &PageArgs::new().first(20))?;
/// let next = paginator.paginate(
///     next_query,
///     "by_name",
///     &PageArgs::new().first(20).after(page.end_cursor.unwrap()),
/// )?;
/// ```
#[derive(Debug)]
pub struct Paginator {
    registry: StrategyRegistry,
    converters: ConverterRegistry,
    codec: Box<dyn CursorCodec>,
    max_page_size: usize,
}

impl Paginator {
    /// Create a paginator over a registry, with the [`BinaryCodec`]
    /// default codec and [`DEFAULT_MAX_PAGE_SIZE`].
    #[must_use]
    pub fn new(registry: StrategyRegistry) -> Self {
        Self {
            registry,
            converters: ConverterRegistry::new(),
            codec: Box::new(BinaryCodec::new()),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    /// Set the page-size ceiling.
    #[must_use]
    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// Swap the default cursor codec.
    #[must_use]
    pub fn with_codec(mut self, codec: impl CursorCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// Register a value converter for one kind.
    #[must_use]
    pub fn with_converter(
        mut self,
        kind: ValueKind,
        converter: impl ValueConverter + 'static,
    ) -> Self {
        self.converters.register(kind, converter);
        self
    }

    /// The strategy registry.
    #[must_use]
    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// The configured page-size ceiling.
    #[must_use]
    pub const fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    /// Paginate `query` with the named strategy.
    ///
    /// Validates the arguments, seeks past the cursor (if any), imposes
    /// the strategy's ordering and projection, over-fetches one row past
    /// the page size, executes, and assembles the page.
    ///
    /// # Panics
    ///
    /// Panics if `strategy` was never registered - an unregistered name is
    /// a code defect, not recoverable input.
    pub fn paginate<Q: QuerySource>(
        &self,
        query: Q,
        strategy: &str,
        args: &PageArgs,
    ) -> Result<Page<Q::Record>, PaginationError<Q::Error>> {
        self.prepare(query, strategy, args)?.run()
    }

    /// [`paginate`](Self::paginate) with a per-call codec.
    pub fn paginate_using<Q: QuerySource>(
        &self,
        codec: &dyn CursorCodec,
        query: Q,
        strategy: &str,
        args: &PageArgs,
    ) -> Result<Page<Q::Record>, PaginationError<Q::Error>> {
        self.prepare_using(codec, query, strategy, args)?.run()
    }

    /// The raising twin of [`paginate`](Self::paginate).
    ///
    /// # Panics
    ///
    /// Panics on every error `paginate` would return, in addition to the
    /// unknown-strategy panic. For callers that treat pagination failures
    /// as unreachable.
    #[track_caller]
    pub fn paginate_expect<Q: QuerySource>(
        &self,
        query: Q,
        strategy: &str,
        args: &PageArgs,
    ) -> Page<Q::Record>
    where
        Q::Error: fmt::Display,
    {
        match self.paginate(query, strategy, args) {
            Ok(page) => page,
            Err(err) => panic!("pagination failed: {err}"),
        }
    }

    /// Apply every pure pagination step to `query` and stop short of
    /// executing it.
    ///
    /// This is the seam for hosts whose executor is asynchronous: take the
    /// extended query out of the returned [`Prepared`], run it however the
    /// host runs queries (awaited or blocking), and feed the fetched rows
    /// to the [`PageAssembler`]. Nothing is executed if any step fails.
    ///
    /// # Panics
    ///
    /// Panics if `strategy` was never registered.
    pub fn prepare<'a, Q: QuerySource>(
        &'a self,
        query: Q,
        strategy: &str,
        args: &PageArgs,
    ) -> Result<Prepared<'a, Q>, PaginationError<Q::Error>> {
        self.prepare_using(&*self.codec, query, strategy, args)
    }

    /// [`prepare`](Self::prepare) with a per-call codec.
    pub fn prepare_using<'a, Q: QuerySource>(
        &'a self,
        codec: &'a dyn CursorCodec,
        query: Q,
        strategy: &str,
        args: &PageArgs,
    ) -> Result<Prepared<'a, Q>, PaginationError<Q::Error>> {
        let options = args.validate(self.max_page_size)?;
        if query.has_explicit_order() {
            return Err(PaginationError::AlreadyOrdered);
        }
        let strategy = self.registry.expect(strategy);
        let plan = strategy.plan(options.disposition(), options.traversal());

        let from_cursor = options.cursor().is_some();
        let mut query = query;
        if let Some(token) = options.cursor() {
            let cursor_values = self
                .decode_cursor(codec, strategy, token)
                .ok_or(PaginationError::MalformedCursor)?;
            query = query.filter(&plan.seek_predicate(&cursor_values));
        }
        query = query.order_by(plan.order_by());
        query = query.project(strategy.key_fields());
        query = query.limit(options.page_size() + 1);

        trace!(
            strategy = %strategy.name(),
            traversal = ?options.traversal(),
            disposition = ?options.disposition(),
            page_size = options.page_size(),
            from_cursor,
            "prepared pagination query"
        );

        Ok(Prepared {
            query,
            assembler: PageAssembler {
                paginator: self,
                codec,
                strategy,
                page_size: options.page_size(),
                traversal: options.traversal(),
                from_cursor,
            },
        })
    }

    /// `(opaque cursor, record)` pairs for a page, re-encoding each row's
    /// key tuple on demand through the default codec.
    ///
    /// # Panics
    ///
    /// Panics if the page's strategy is no longer registered.
    pub fn edges<'p, R>(&self, page: &'p Page<R>) -> Vec<(String, &'p R)> {
        let strategy = self.registry.expect(page.strategy());
        page.rows()
            .iter()
            .map(|row| {
                (
                    self.encode_key(&*self.codec, strategy, &row.key_values),
                    &row.record,
                )
            })
            .collect()
    }

    /// Decode and restore one cursor token; `None` collapses every failure
    /// mode into the caller-facing [`PaginationError::MalformedCursor`].
    fn decode_cursor(
        &self,
        codec: &dyn CursorCodec,
        strategy: &SortStrategy,
        token: &str,
    ) -> Option<Vec<Value>> {
        let raw = match codec.decode(token) {
            Ok(values) => values,
            Err(err) => {
                debug!(strategy = %strategy.name(), error = %err, "cursor decode failed");
                return None;
            },
        };
        if raw.len() != strategy.columns().len() {
            debug!(
                strategy = %strategy.name(),
                expected = strategy.columns().len(),
                actual = raw.len(),
                "cursor arity does not match strategy"
            );
            return None;
        }

        let mut values = Vec::with_capacity(raw.len());
        for (column, value) in strategy.columns().iter().zip(raw) {
            match self.converters.from_portable(column.value_type, value) {
                Ok(value) => values.push(value),
                Err(err) => {
                    debug!(
                        strategy = %strategy.name(),
                        field = %column.field,
                        error = %err,
                        "cursor value conversion failed"
                    );
                    return None;
                },
            }
        }
        Some(values)
    }

    /// Encode one row's key tuple into an opaque cursor.
    fn encode_key(
        &self,
        codec: &dyn CursorCodec,
        strategy: &SortStrategy,
        key_values: &[Value],
    ) -> String {
        let portable: Vec<Value> = strategy
            .columns()
            .iter()
            .zip(key_values)
            .map(|(column, value)| {
                self.converters
                    .to_portable(column.value_type, value.clone())
            })
            .collect();
        codec.encode(&portable)
    }
}

/// A fully extended query plus the assembler that finishes its page.
#[must_use = "the prepared query still has to be executed"]
pub struct Prepared<'a, Q: QuerySource> {
    query: Q,
    assembler: PageAssembler<'a>,
}

impl<'a, Q: QuerySource> Prepared<'a, Q> {
    /// Split into the query and the assembler, for hosts that execute the
    /// query themselves.
    pub fn into_parts(self) -> (Q, PageAssembler<'a>) {
        (self.query, self.assembler)
    }

    /// Execute the query and assemble the page.
    pub fn run(self) -> Result<Page<Q::Record>, PaginationError<Q::Error>> {
        let (query, assembler) = self.into_parts();
        let rows = query.execute().map_err(PaginationError::Query)?;
        Ok(assembler.assemble(rows))
    }
}

impl<Q: QuerySource> fmt::Debug for Prepared<'_, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prepared")
            .field("assembler", &self.assembler)
            .finish_non_exhaustive()
    }
}

/// Classifies over-fetched rows into a [`Page`].
#[derive(Debug)]
#[must_use = "the assembler does nothing until fed the executed rows"]
pub struct PageAssembler<'a> {
    paginator: &'a Paginator,
    codec: &'a dyn CursorCodec,
    strategy: &'a SortStrategy,
    page_size: usize,
    traversal: Traversal,
    from_cursor: bool,
}

impl PageAssembler<'_> {
    /// Trim the over-fetch, restore forward orientation, derive the
    /// navigation flags, and encode the boundary cursors.
    ///
    /// `fetched` must be the rows from executing the prepared query,
    /// untouched and in fetch order.
    pub fn assemble<R>(&self, mut fetched: Vec<KeyedRow<R>>) -> Page<R> {
        // The single extra row is the only signal that another page exists
        // in the direction of travel.
        let overflow = fetched.len() > self.page_size;
        fetched.truncate(self.page_size);
        if self.traversal == Traversal::Backward {
            fetched.reverse();
        }

        // A cursor proves rows exist on its far side; the over-fetch
        // answers the other side.
        let (has_previous_page, has_next_page) = match self.traversal {
            Traversal::Forward => (self.from_cursor, overflow),
            Traversal::Backward => (overflow, self.from_cursor),
        };

        let start_cursor = fetched.first().map(|row| {
            self.paginator
                .encode_key(self.codec, self.strategy, &row.key_values)
        });
        let end_cursor = fetched.last().map(|row| {
            self.paginator
                .encode_key(self.codec, self.strategy, &row.key_values)
        });

        Page::new(
            self.strategy.name(),
            fetched,
            has_previous_page,
            has_next_page,
            start_cursor,
            end_cursor,
        )
    }
}
