//! Vector-backed index with the same matching rules as the tantivy backend.

use super::{DocId, DocumentSink, Predicate, SearchHit, SearchIndex, wildcard_to_regex};
use crate::document::{FieldKind, FieldSet, fields};
use crate::error::Result;
use crate::model::IndexStatistics;
use ahash::AHashSet;
use anyhow::{Context, bail};
use parking_lot::RwLock;
use regex::Regex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Documents are kept in insertion order, which doubles as relevance order.
///
/// Added documents are searchable at once; `committed` only marks how far a
/// rollback truncates.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    docs: RwLock<Vec<FieldSet>>,
    committed: AtomicUsize,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(docs: impl IntoIterator<Item = FieldSet>) -> Self {
        let docs: Vec<FieldSet> = docs.into_iter().collect();
        Self {
            committed: AtomicUsize::new(docs.len()),
            docs: RwLock::new(docs),
        }
    }
}

/// A predicate with its regex (if any) compiled once per search.
enum Compiled<'a> {
    Match { field: &'a str, kind: FieldKind, value: &'a str },
    Wildcard { field: &'a str, regex: Regex },
    IntRange { field: &'a str, min: i64, max: i64 },
    Exists { field: &'a str },
}

impl<'a> Compiled<'a> {
    fn new(predicate: &'a Predicate) -> Result<Self> {
        let field = predicate.field();
        let Some(kind) = fields::kind_of(field) else {
            bail!("Unknown field '{}'", field);
        };

        Ok(match predicate {
            Predicate::Match { value, .. } => {
                if kind == FieldKind::Stored {
                    bail!("Field '{}' is not searchable", field);
                }
                Compiled::Match {
                    field,
                    kind,
                    value: value.as_str(),
                }
            }
            Predicate::Wildcard { pattern, .. } => {
                if kind != FieldKind::Keyword {
                    bail!("Wildcard queries need a keyword field, '{}' is {:?}", field, kind);
                }
                let regex = Regex::new(&format!("^(?:{})$", wildcard_to_regex(pattern)))
                    .with_context(|| format!("Invalid wildcard pattern '{}'", pattern))?;
                Compiled::Wildcard { field, regex }
            }
            Predicate::IntRange { min, max, .. } => {
                if kind != FieldKind::Integer {
                    bail!("Range queries need an integer field, '{}' is {:?}", field, kind);
                }
                Compiled::IntRange {
                    field,
                    min: *min,
                    max: *max,
                }
            }
            Predicate::Exists { .. } => Compiled::Exists { field },
        })
    }

    fn is_match(&self, doc: &FieldSet) -> bool {
        match self {
            Compiled::Match { field, kind, value } => match kind {
                FieldKind::Text => {
                    // Values of one field are searched as a whole, as tantivy does.
                    let wanted = fields::tokenize(value);
                    if wanted.is_empty() {
                        return false;
                    }
                    let tokens: AHashSet<String> =
                        doc.get_all(field).flat_map(fields::tokenize).collect();
                    wanted.iter().all(|token| tokens.contains(token))
                }
                FieldKind::Integer => value.trim().parse::<i64>().is_ok_and(|wanted| {
                    doc.get_all(field)
                        .any(|stored| stored.trim().parse::<i64>() == Ok(wanted))
                }),
                FieldKind::Keyword | FieldKind::Stored => {
                    doc.get_all(field).any(|stored| stored == *value)
                }
            },
            Compiled::Wildcard { field, regex } => {
                doc.get_all(field).any(|stored| regex.is_match(stored))
            }
            Compiled::IntRange { field, min, max } => doc.get_all(field).any(|stored| {
                stored
                    .trim()
                    .parse::<i64>()
                    .is_ok_and(|n| (*min..=*max).contains(&n))
            }),
            Compiled::Exists { field } => doc.has_value(field),
        }
    }
}

impl SearchIndex for InMemoryIndex {
    fn search(&self, predicates: &[Predicate], max_results: usize) -> Result<Vec<SearchHit>> {
        let compiled = predicates
            .iter()
            .map(Compiled::new)
            .collect::<Result<Vec<_>>>()?;

        let docs = self.docs.read();
        Ok(docs
            .iter()
            .enumerate()
            .filter(|(_, doc)| compiled.iter().all(|p| p.is_match(doc)))
            .take(max_results)
            .map(|(i, doc)| SearchHit {
                doc_id: i as DocId,
                fields: doc.clone(),
            })
            .collect())
    }

    fn get_document(&self, doc_id: DocId) -> Result<Option<FieldSet>> {
        let docs = self.docs.read();
        Ok(usize::try_from(doc_id)
            .ok()
            .and_then(|i| docs.get(i))
            .cloned())
    }

    fn index_statistics(&self) -> Result<Option<IndexStatistics>> {
        Ok(Some(IndexStatistics {
            index_path: ":memory:".to_string(),
            document_count: self.total_documents()?,
            field_count: fields::SCHEMA.len(),
            total_size_in_bytes: self.index_size_in_bytes()?,
            file_count: 0,
            last_modified: None,
        }))
    }

    fn total_documents(&self) -> Result<u64> {
        Ok(self.docs.read().len() as u64)
    }

    /// Approximate: bytes of stored values.
    fn index_size_in_bytes(&self) -> Result<u64> {
        let docs = self.docs.read();
        Ok(docs
            .iter()
            .flat_map(FieldSet::iter)
            .map(|(_, value)| value.len() as u64)
            .sum())
    }
}

impl DocumentSink for InMemoryIndex {
    fn add_document(&self, doc: &FieldSet) -> Result<()> {
        self.docs.write().push(doc.clone());
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        let docs = self.docs.read();
        self.committed.store(docs.len(), Ordering::Release);
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        let mut docs = self.docs.write();
        docs.truncate(self.committed.load(Ordering::Acquire));
        Ok(())
    }
}
