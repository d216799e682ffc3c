//! The abstract query boundary: predicate trees and the collaborator
//! interface pagination requires from its environment.

mod predicate;
mod source;

// Re-export all public items
pub use predicate::{CompareOp, Comparison, FieldRef, Predicate, and, compare, compare_cast, or};
pub use source::{KeyedRow, OrderBy, QuerySource};
