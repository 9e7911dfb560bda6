//! Multi-framework deduplication.
//!
//! A package shipping `net8.0`, `net6.0` and `netstandard2.0` builds produces
//! three records for every member. [`Deduplicator`] keeps the best build of each
//! and folds the rest into its framework summary.

mod engine;
mod framework;

pub use engine::{DeduplicationStats, Deduplicator};
pub use framework::{
    FrameworkFamily, FrameworkOrdering, FrameworkPriority, ParsedFramework, sort_best_first,
};
