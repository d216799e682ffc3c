//! Pagination argument validation.

use thiserror::Error;

use crate::strategy::{Disposition, Traversal};

/// Raw keyword-style arguments for one pagination call.
///
/// Built fluent-style and validated as a whole; the permitted argument
/// combinations are exactly:
///
/// | Arguments           | Meaning                              |
/// |---------------------|--------------------------------------|
/// | `first`             | First page, forward                  |
/// | `first` + `after`   | Page following the cursor, forward   |
/// | `last`              | Last page, backward                  |
/// | `last` + `before`   | Page preceding the cursor, backward  |
///
/// `inverted` may accompany any of the four and flips every column of the
/// strategy's declared order. Anything else - both `first` and `last`,
/// `after` with `last`, a cursor with no page size - fails validation.
///
/// # Example
///
/// ```
/// use seekset::PageArgs;
///
/// let args = PageArgs::new().first(20).after("opaque-token");
/// assert!(args.validate(100).is_ok());
///
/// let bad = PageArgs::new().first(20).last(20);
/// assert!(bad.validate(100).is_err());
/// ```
#[derive(Debug, Clone, Default)]
#[must_use = "arguments do nothing until passed to a paginate call"]
pub struct PageArgs {
    first: Option<i64>,
    last: Option<i64>,
    after: Option<String>,
    before: Option<String>,
    inverted: bool,
}

impl PageArgs {
    /// Start with no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the first `count` rows, traversing forward.
    pub const fn first(mut self, count: i64) -> Self {
        self.first = Some(count);
        self
    }

    /// Request the last `count` rows, traversing backward.
    pub const fn last(mut self, count: i64) -> Self {
        self.last = Some(count);
        self
    }

    /// Resume forward traversal past this cursor.
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Resume backward traversal before this cursor.
    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    /// Flip every column of the strategy's declared order.
    pub const fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Validate the combination into concrete page options.
    pub fn validate(&self, max_page_size: usize) -> Result<PageOptions, ValidationError> {
        let (count, traversal, cursor) = match (self.first, self.last) {
            (Some(count), None) if self.before.is_none() => {
                (count, Traversal::Forward, self.after.clone())
            },
            (None, Some(count)) if self.after.is_none() => {
                (count, Traversal::Backward, self.before.clone())
            },
            _ => {
                return Err(ValidationError::InvalidArgumentCombination {
                    supplied: self.supplied_keys(),
                });
            },
        };

        let page_size = usize::try_from(count)
            .ok()
            .filter(|size| *size <= max_page_size)
            .ok_or(ValidationError::PageSizeOutOfRange {
                requested: count,
                max: max_page_size,
            })?;

        Ok(PageOptions {
            page_size,
            traversal,
            disposition: if self.inverted {
                Disposition::Inverted
            } else {
                Disposition::Regular
            },
            cursor,
        })
    }

    fn supplied_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.first.is_some() {
            keys.push("first");
        }
        if self.last.is_some() {
            keys.push("last");
        }
        if self.after.is_some() {
            keys.push("after");
        }
        if self.before.is_some() {
            keys.push("before");
        }
        keys
    }
}

/// Validated options for one pagination call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    page_size: usize,
    traversal: Traversal,
    disposition: Disposition,
    cursor: Option<String>,
}

impl PageOptions {
    /// Requested page size (the query fetches one extra row beyond it).
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Resolved traversal direction.
    #[must_use]
    pub const fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// Resolved disposition.
    #[must_use]
    pub const fn disposition(&self) -> Disposition {
        self.disposition
    }

    /// The opaque cursor to seek past, if one was supplied.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

/// Argument-validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The supplied argument keys do not form a permitted combination.
    #[error(
        "invalid pagination arguments {supplied:?}: valid combinations are \
         {{first}}, {{first, after}}, {{last}}, {{last, before}}"
    )]
    InvalidArgumentCombination {
        /// The argument keys that were supplied.
        supplied: Vec<&'static str>,
    },
    /// The page size falls outside `0..=max`.
    #[error("page size {requested} is outside 0..={max}")]
    PageSizeOutOfRange {
        /// The requested page size.
        requested: i64,
        /// The configured ceiling.
        max: usize,
    },
}
