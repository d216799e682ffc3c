//! The page value object returned to callers.

use crate::query::KeyedRow;

/// One page of results with navigation metadata.
///
/// Rows always read in the resolved forward orientation, whichever
/// direction was traversed to fetch them. A page has no lifecycle beyond
/// the call that produced it - the next page is a fresh pagination call
/// seeded with this page's boundary cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    strategy: String,
    rows: Vec<KeyedRow<R>>,
    /// Whether a page exists before this one, in the resolved orientation.
    pub has_previous_page: bool,
    /// Whether a page exists after this one, in the resolved orientation.
    pub has_next_page: bool,
    /// Opaque cursor of the first row, `None` when the page is empty.
    pub start_cursor: Option<String>,
    /// Opaque cursor of the last row, `None` when the page is empty.
    pub end_cursor: Option<String>,
}

impl<R> Page<R> {
    pub(crate) fn new(
        strategy: impl Into<String>,
        rows: Vec<KeyedRow<R>>,
        has_previous_page: bool,
        has_next_page: bool,
        start_cursor: Option<String>,
        end_cursor: Option<String>,
    ) -> Self {
        Self {
            strategy: strategy.into(),
            rows,
            has_previous_page,
            has_next_page,
            start_cursor,
            end_cursor,
        }
    }

    /// Name of the strategy that produced this page.
    #[must_use]
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// The rows with their sort-key tuples.
    #[must_use]
    pub fn rows(&self) -> &[KeyedRow<R>] {
        &self.rows
    }

    /// The records alone, dropping the key tuples.
    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.rows.iter().map(|row| &row.record)
    }

    /// Consume the page into its records.
    #[must_use]
    pub fn into_records(self) -> Vec<R> {
        self.rows.into_iter().map(|row| row.record).collect()
    }

    /// Number of rows in this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the page holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
