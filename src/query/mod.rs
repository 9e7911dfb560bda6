//! Query layer: argument validation, predicate construction and record rebuilding.

mod engine;
mod filters;

pub use engine::QueryEngine;
pub use filters::SearchFilters;
