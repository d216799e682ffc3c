// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
// Pedantic lints that are too verbose to fix individually in a builder-heavy crate
#![allow(clippy::doc_markdown)] // Code items in docs - extensive doc changes needed
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::missing_panics_doc)] // # Panics sections documented where they matter
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self by design
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
#![allow(clippy::match_same_arms)] // Intentional for clarity in some match expressions
#![allow(clippy::cast_possible_truncation)] // Intentional in wire-format context
#![allow(clippy::cast_sign_loss)] // Intentional in wire-format context
#![allow(clippy::cast_precision_loss)] // Intentional in wire-format context
// Internal code where bounds are checked before use
#![allow(clippy::indexing_slicing)] // Bounds checked before indexing
#![allow(clippy::unwrap_used)] // Used in tests after explicit setup

//! # seekset - Keyset (Seek) Pagination
//!
//! Keyset pagination over an ordered, filterable record set. Declare a
//! multi-column sort strategy once; each pagination call extends your query
//! with the strategy's ordering, a beyond-cursor seek predicate, a
//! `page size + 1` over-fetch, and a sort-key projection, then classifies
//! the fetched rows into a [`Page`] with navigation flags and opaque
//! boundary cursors.
//!
//! | Strategy   | Jump to Page | Performance | Stability | Use Case               |
//! |------------|--------------|-------------|-----------|------------------------|
//! | **Offset** | Yes          | O(n) skip   | Unstable* | Admin panels, reports  |
//! | **Keyset** | No           | O(1)        | Stable    | Feeds, APIs, exports   |
//!
//! *Unstable = results shift if data changes between requests
//!
//! This crate is the pagination algorithm only. The query itself - SQL
//! rendering, bindings, execution - stays behind the [`QuerySource`]
//! trait, which any store with ordered, filterable queries can implement.
//!
//! ## Declaring strategies
//!
//! ```
//! use seekset::{PageArgs, Paginator, SortStrategy, StrategyRegistry};
//!
//! let mut registry = StrategyRegistry::new();
//! registry.register(
//!     SortStrategy::builder("by_name")
//!         .asc("last_name")
//!         .desc("id")
//!         .build()
//!         .unwrap(),
//! ).unwrap();
//!
//! let paginator = Paginator::new(registry).with_max_page_size(100);
//!
//! // Arguments mirror the Relay convention: first/after, last/before
//! let args = PageArgs::new().first(20);
//! assert!(args.validate(paginator.max_page_size()).is_ok());
//! ```
//!
//! ## Seek predicates
//!
//! A cursor never stores an offset; it stores the sort-key values of a
//! boundary row. Seeking past `(last_name, id) = ("May", 7)` on a
//! `(last_name ASC, id DESC)` strategy compiles to
//!
//! ```text
//! last_name >= 'May' AND (last_name > 'May' OR (last_name = 'May' AND id < 7))
//! ```
//!
//! which a composite index satisfies without skipping rows.
//!
//! ## Cursors are opaque
//!
//! ```
//! use seekset::{BinaryCodec, CursorCodec, Value};
//!
//! let codec = BinaryCodec::new();
//! let token = codec.encode(&[Value::String("May".into()), Value::Int(7)]);
//! assert_eq!(
//!     codec.decode(&token).unwrap(),
//!     vec![Value::String("May".into()), Value::Int(7)],
//! );
//! // Tampered tokens fail with a generic decode error
//! assert!(codec.decode("definitely-not-a-cursor").is_err());
//! ```
//!
//! ## Caller obligations
//!
//! - The final strategy column must be unique and non-null over the record
//!   set, or page boundaries are non-deterministic.
//! - Nullable sort columns must be pre-coalesced in the field expression
//!   (`COALESCE(nick, '')` and the like); seek predicates never
//!   special-case NULL.
//! - Mid-traversal mutations are only consistent outside the traversed key
//!   range: a row inserted behind the cursor is not revisited, one
//!   inserted ahead appears. This is inherent to keyset pagination, not a
//!   defect.

mod codec;
mod convert;
mod options;
mod page;
mod paginate;
mod query;
mod strategy;
mod value;

pub use codec::{
    BinaryCodec, CursorCodec, DecodeError, JsonCodec, MAX_CURSOR_BYTES, MAX_CURSOR_VALUES,
};
pub use convert::{ConversionError, ConverterRegistry, TimestampMicros, ValueConverter};
pub use options::{PageArgs, PageOptions, ValidationError};
pub use page::Page;
pub use paginate::{
    DEFAULT_MAX_PAGE_SIZE, PageAssembler, PaginationError, Paginator, Prepared,
};
pub use query::{
    CompareOp, Comparison, FieldRef, KeyedRow, OrderBy, Predicate, QuerySource, and, compare,
    compare_cast, or,
};
pub use strategy::{
    Direction, Disposition, SeekPlan, SortColumn, SortStrategy, SortStrategyBuilder,
    StrategyError, StrategyRegistry, Traversal,
};
pub use value::{Value, ValueKind};

/// Prelude module for convenient imports.
///
/// ```
/// use seekset::prelude::*;
///
/// let strategy = SortStrategy::parse("by_id", "id").unwrap();
/// assert_eq!(strategy.columns()[0].direction, Direction::Asc);
/// ```
pub mod prelude {
    pub use crate::{
        BinaryCodec, CompareOp, Comparison, ConverterRegistry, CursorCodec, DecodeError,
        Direction, Disposition, FieldRef, JsonCodec, KeyedRow, OrderBy, Page, PageArgs,
        PageAssembler, PageOptions, PaginationError, Paginator, Predicate, Prepared, QuerySource,
        SeekPlan, SortColumn, SortStrategy, SortStrategyBuilder, StrategyError, StrategyRegistry,
        TimestampMicros, Traversal, ValidationError, Value, ValueConverter, ValueKind, and,
        compare, compare_cast, or,
    };
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================

#[cfg(test)]
mod api_contracts {
    use static_assertions::assert_impl_all;

    // ========================================================================
    // Value and predicate types
    // ========================================================================

    // Value is Clone, Debug, PartialEq (no Eq because of Float)
    assert_impl_all!(crate::Value: Clone, std::fmt::Debug, PartialEq, Send, Sync);

    // ValueKind is Copy and usable as a map key
    assert_impl_all!(crate::ValueKind: Copy, Clone, std::fmt::Debug, PartialEq, Eq, std::hash::Hash, Ord);

    // Predicate trees compare structurally
    assert_impl_all!(crate::Predicate: Clone, std::fmt::Debug, PartialEq);
    assert_impl_all!(crate::Comparison: Clone, std::fmt::Debug, PartialEq);
    assert_impl_all!(crate::FieldRef: Clone, std::fmt::Debug, PartialEq, Eq, std::hash::Hash);

    // ========================================================================
    // Enum types
    // ========================================================================

    assert_impl_all!(crate::CompareOp: Copy, Clone, std::fmt::Debug, PartialEq, Eq);
    assert_impl_all!(crate::Direction: Copy, Clone, std::fmt::Debug, PartialEq, Eq);
    assert_impl_all!(crate::Traversal: Copy, Clone, std::fmt::Debug, PartialEq, Eq);
    assert_impl_all!(crate::Disposition: Copy, Clone, std::fmt::Debug, PartialEq, Eq);

    // ========================================================================
    // Strategy and environment types
    // ========================================================================

    // Shared read-only across concurrent pagination calls
    assert_impl_all!(crate::SortStrategy: Clone, std::fmt::Debug, Send, Sync);
    assert_impl_all!(crate::StrategyRegistry: Clone, std::fmt::Debug, Default, Send, Sync);
    assert_impl_all!(crate::Paginator: std::fmt::Debug, Send, Sync);

    // Codecs are stateless and shareable
    assert_impl_all!(crate::BinaryCodec: Copy, Clone, std::fmt::Debug, Default, Send, Sync);
    assert_impl_all!(crate::JsonCodec: Copy, Clone, std::fmt::Debug, Default, Send, Sync);

    // ========================================================================
    // Error types
    // ========================================================================

    assert_impl_all!(crate::DecodeError: Clone, std::fmt::Debug, PartialEq, Eq, std::error::Error);
    assert_impl_all!(crate::ValidationError: Clone, std::fmt::Debug, PartialEq, Eq, std::error::Error);
    assert_impl_all!(crate::StrategyError: Clone, std::fmt::Debug, PartialEq, Eq, std::error::Error);
    assert_impl_all!(crate::ConversionError: Clone, std::fmt::Debug, PartialEq, Eq, std::error::Error);
    assert_impl_all!(crate::PaginationError<std::io::Error>: std::fmt::Debug, std::error::Error);

    // ========================================================================
    // Result types
    // ========================================================================

    assert_impl_all!(crate::Page<String>: Clone, std::fmt::Debug, PartialEq);
    assert_impl_all!(crate::KeyedRow<String>: Clone, std::fmt::Debug, PartialEq);
    assert_impl_all!(crate::PageArgs: Clone, std::fmt::Debug, Default);
    assert_impl_all!(crate::PageOptions: Clone, std::fmt::Debug, PartialEq, Eq);
}
