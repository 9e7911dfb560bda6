//! Indexing and querying of .NET XML API documentation.
//!
//! Records ([`model::MemberInfo`]) are flattened into search documents by
//! [`document`], stored through an [`index::SearchIndex`] backend, queried with
//! [`query::QueryEngine`], and collapsed across framework builds by
//! [`dedup::Deduplicator`].

pub mod cli;
pub mod config;
pub mod dedup;
pub mod document;
pub mod error;
pub mod fingerprint;
pub mod index;
pub mod model;
pub mod nuget;
pub mod perf;
pub mod query;
pub mod tracing;

pub use config::Config;
pub use dedup::{DeduplicationStats, Deduplicator, FrameworkOrdering, FrameworkPriority};
pub use error::{QueryError, QueryResult, Result};
pub use index::{InMemoryIndex, SearchIndex, TantivyIndex};
pub use model::{MemberInfo, MemberType};
pub use query::{QueryEngine, SearchFilters};
