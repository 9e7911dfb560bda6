//! Search-engine primitives consumed by the query layer.
//!
//! [`SearchIndex`] is the read contract: a conjunction of field predicates plus
//! document lookup and statistics. [`DocumentSink`] is the write side used at
//! index-build time. Two backends implement both: [`TantivyIndex`] for real
//! corpora and [`InMemoryIndex`] for tests and small ad-hoc sets.

mod bulk;
mod memory;
mod tantivy_index;
mod wildcard;

pub use bulk::BulkIndexer;
pub use memory::InMemoryIndex;
pub use tantivy_index::TantivyIndex;
pub use wildcard::wildcard_to_regex;

use crate::document::FieldSet;
use crate::error::Result;
use crate::model::IndexStatistics;

/// Engine-internal document address. Only meaningful to the index that produced it.
pub type DocId = u64;

/// One condition on a stored field. Conditions passed together are ANDed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Exact for keyword fields; all tokens present for text fields.
    Match { field: &'static str, value: String },
    /// `*` / `?` wildcard over a keyword field.
    Wildcard { field: &'static str, pattern: String },
    /// Inclusive integer range.
    IntRange { field: &'static str, min: i64, max: i64 },
    /// Field has at least one non-empty value.
    Exists { field: &'static str },
}

impl Predicate {
    pub fn matches(field: &'static str, value: impl Into<String>) -> Self {
        Self::Match {
            field,
            value: value.into(),
        }
    }

    pub const fn field(&self) -> &'static str {
        match self {
            Self::Match { field, .. }
            | Self::Wildcard { field, .. }
            | Self::IntRange { field, .. }
            | Self::Exists { field } => field,
        }
    }
}

/// A matching document and its address.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub fields: FieldSet,
}

/// Read-side contract of a documentation index.
pub trait SearchIndex: Send + Sync {
    /// Documents satisfying every predicate, best first, at most `max_results`.
    /// An empty predicate list matches everything.
    fn search(&self, predicates: &[Predicate], max_results: usize) -> Result<Vec<SearchHit>>;

    fn get_document(&self, doc_id: DocId) -> Result<Option<FieldSet>>;

    fn index_statistics(&self) -> Result<Option<IndexStatistics>>;

    fn total_documents(&self) -> Result<u64>;

    fn index_size_in_bytes(&self) -> Result<u64>;

    fn search_by_field(
        &self,
        field: &'static str,
        value: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>> {
        self.search(&[Predicate::matches(field, value)], max_results)
    }

    fn search_by_int_range(
        &self,
        field: &'static str,
        min: i64,
        max: i64,
        max_results: usize,
    ) -> Result<Vec<SearchHit>> {
        self.search(&[Predicate::IntRange { field, min, max }], max_results)
    }

    fn search_by_field_exists(
        &self,
        field: &'static str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>> {
        self.search(&[Predicate::Exists { field }], max_results)
    }
}

/// Write-side contract used while building an index.
pub trait DocumentSink: Send + Sync {
    fn add_document(&self, doc: &FieldSet) -> Result<()>;

    /// Make added documents visible to searches.
    fn commit(&self) -> Result<()>;

    /// Discard every document added since the last commit.
    fn rollback(&self) -> Result<()>;
}
