//! tantivy-backed documentation index.

use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, anyhow, bail};
use parking_lot::Mutex;
use tantivy::collector::TopDocs;
use tantivy::query::{
    AllQuery, BooleanQuery, EmptyQuery, Query, RangeQuery, RegexQuery, TermQuery,
};
use tantivy::schema::{
    FAST, Field, INDEXED, IndexRecordOption, STORED, STRING, Schema, TEXT, Value,
};
use tantivy::tokenizer::TokenStream;
use tantivy::{DocAddress, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

use super::{DocId, DocumentSink, Predicate, SearchHit, SearchIndex, wildcard_to_regex};
use crate::document::{FieldKind, FieldSet, fields};
use crate::error::Result;
use crate::model::IndexStatistics;

/// Hidden keyword field listing the names of a document's non-empty fields.
const FIELD_NAMES: &str = "_fields";

/// Minimum per-thread indexing arena tantivy accepts.
const MIN_WRITER_MEMORY: usize = 15_000_000;

#[derive(Clone, Copy)]
struct SchemaField {
    name: &'static str,
    kind: FieldKind,
    field: Field,
}

pub struct TantivyIndex {
    index: Index,
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
    schema_fields: Vec<SchemaField>,
    field_names: Field,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for TantivyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyIndex")
            .field("path", &self.path)
            .field("fields", &self.schema_fields.len())
            .finish_non_exhaustive()
    }
}

impl TantivyIndex {
    /// Open the index stored in `path`, creating an empty one if none exists.
    pub fn open_or_create(path: &Path, writer_memory_bytes: usize) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create index directory {}", path.display()))?;
        let index = if path.join("meta.json").exists() {
            tracing::info!("Opening documentation index at {}", path.display());
            Index::open_in_dir(path)
                .with_context(|| format!("Failed to open index at {}", path.display()))?
        } else {
            tracing::info!("Creating documentation index at {}", path.display());
            Index::create_in_dir(path, build_schema())
                .with_context(|| format!("Failed to create index at {}", path.display()))?
        };
        Self::from_index(index, Some(path.to_path_buf()), writer_memory_bytes)
    }

    /// A throwaway index that lives only in memory.
    pub fn create_in_ram(writer_memory_bytes: usize) -> Result<Self> {
        Self::from_index(Index::create_in_ram(build_schema()), None, writer_memory_bytes)
    }

    fn from_index(index: Index, path: Option<PathBuf>, writer_memory_bytes: usize) -> Result<Self> {
        let schema = index.schema();
        let schema_fields = fields::SCHEMA
            .iter()
            .map(|&(name, kind)| {
                schema
                    .get_field(name)
                    .map(|field| SchemaField { name, kind, field })
                    .map_err(|_| anyhow!("Index schema is missing field '{}'", name))
            })
            .collect::<Result<Vec<_>>>()?;
        let field_names = schema
            .get_field(FIELD_NAMES)
            .map_err(|_| anyhow!("Index schema is missing field '{}'", FIELD_NAMES))?;

        let writer = index
            .writer_with_num_threads(1, writer_memory_bytes.max(MIN_WRITER_MEMORY))
            .context("Failed to create index writer")?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .context("Failed to create index reader")?;

        Ok(Self {
            index,
            reader,
            writer: Mutex::new(writer),
            schema_fields,
            field_names,
            path,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn schema_field(&self, name: &str) -> Result<SchemaField> {
        self.schema_fields
            .iter()
            .find(|entry| entry.name == name)
            .copied()
            .ok_or_else(|| anyhow!("Unknown field '{}'", name))
    }

    fn build_query(&self, predicates: &[Predicate]) -> Result<Box<dyn Query>> {
        let mut queries = predicates
            .iter()
            .map(|predicate| self.predicate_query(predicate))
            .collect::<Result<Vec<_>>>()?;
        Ok(match queries.len() {
            0 => Box::new(AllQuery),
            1 => queries.remove(0),
            _ => Box::new(BooleanQuery::intersection(queries)),
        })
    }

    fn predicate_query(&self, predicate: &Predicate) -> Result<Box<dyn Query>> {
        let entry = self.schema_field(predicate.field())?;
        match predicate {
            Predicate::Match { value, .. } => self.match_query(entry, value),
            Predicate::Wildcard { pattern, .. } => {
                if entry.kind != FieldKind::Keyword {
                    bail!(
                        "Wildcard queries need a keyword field, '{}' is {:?}",
                        entry.name,
                        entry.kind
                    );
                }
                let regex = wildcard_to_regex(pattern);
                let query = RegexQuery::from_pattern(&regex, entry.field)
                    .with_context(|| format!("Invalid wildcard pattern '{}'", pattern))?;
                Ok(Box::new(query))
            }
            Predicate::IntRange { min, max, .. } => {
                if entry.kind != FieldKind::Integer {
                    bail!(
                        "Range queries need an integer field, '{}' is {:?}",
                        entry.name,
                        entry.kind
                    );
                }
                Ok(Box::new(RangeQuery::new_i64_bounds(
                    entry.name.to_string(),
                    Bound::Included(*min),
                    Bound::Included(*max),
                )))
            }
            Predicate::Exists { .. } => Ok(Box::new(TermQuery::new(
                Term::from_field_text(self.field_names, entry.name),
                IndexRecordOption::Basic,
            ))),
        }
    }

    fn match_query(&self, entry: SchemaField, value: &str) -> Result<Box<dyn Query>> {
        match entry.kind {
            FieldKind::Keyword => Ok(Box::new(TermQuery::new(
                Term::from_field_text(entry.field, value),
                IndexRecordOption::Basic,
            ))),
            FieldKind::Integer => Ok(match value.trim().parse::<i64>() {
                Ok(n) => Box::new(TermQuery::new(
                    Term::from_field_i64(entry.field, n),
                    IndexRecordOption::Basic,
                )),
                Err(_) => Box::new(EmptyQuery),
            }),
            FieldKind::Text => {
                let mut analyzer = self
                    .index
                    .tokenizer_for_field(entry.field)
                    .with_context(|| format!("No tokenizer for field '{}'", entry.name))?;
                let mut stream = analyzer.token_stream(value);
                let mut terms: Vec<Box<dyn Query>> = Vec::new();
                while stream.advance() {
                    terms.push(Box::new(TermQuery::new(
                        Term::from_field_text(entry.field, &stream.token().text),
                        IndexRecordOption::WithFreqs,
                    )));
                }
                Ok(match terms.len() {
                    0 => Box::new(EmptyQuery),
                    1 => terms.remove(0),
                    _ => Box::new(BooleanQuery::intersection(terms)),
                })
            }
            FieldKind::Stored => bail!("Field '{}' is not searchable", entry.name),
        }
    }

    fn to_field_set(&self, doc: &TantivyDocument) -> FieldSet {
        let mut out = FieldSet::with_capacity(32);
        for entry in &self.schema_fields {
            for value in doc.get_all(entry.field) {
                if let Some(text) = value.as_str() {
                    out.push(entry.name, text);
                } else if let Some(number) = value.as_i64() {
                    out.push(entry.name, number.to_string());
                }
            }
        }
        out
    }

    fn to_document(&self, doc: &FieldSet) -> TantivyDocument {
        let mut out = TantivyDocument::default();
        for (name, value) in doc.iter() {
            let Some(entry) = self.schema_fields.iter().find(|entry| entry.name == name) else {
                continue;
            };
            if entry.kind == FieldKind::Integer {
                match value.trim().parse::<i64>() {
                    Ok(n) => out.add_i64(entry.field, n),
                    Err(_) => tracing::debug!("Dropping non-numeric {}='{}'", name, value),
                }
            } else {
                out.add_text(entry.field, value);
            }
        }
        for name in doc.populated_fields() {
            out.add_text(self.field_names, name);
        }
        out
    }

    fn directory_usage(path: &Path) -> Result<(usize, u64, Option<SystemTime>)> {
        let mut file_count = 0;
        let mut total_bytes = 0;
        let mut newest: Option<SystemTime> = None;
        for entry in std::fs::read_dir(path)
            .with_context(|| format!("Failed to read index directory {}", path.display()))?
        {
            let metadata = entry?.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            file_count += 1;
            total_bytes += metadata.len();
            if let Ok(modified) = metadata.modified() {
                newest = Some(newest.map_or(modified, |current| current.max(modified)));
            }
        }
        Ok((file_count, total_bytes, newest))
    }
}

impl SearchIndex for TantivyIndex {
    fn search(&self, predicates: &[Predicate], max_results: usize) -> Result<Vec<SearchHit>> {
        let query = self.build_query(predicates)?;
        let searcher = self.reader.searcher();
        // TopDocs preallocates twice its limit, so never ask for more than exist.
        let limit = usize::try_from(searcher.num_docs()).map_or(max_results, |n| n.min(max_results));
        if limit == 0 {
            return Ok(Vec::new());
        }
        let top_docs = searcher
            .search(query.as_ref(), &TopDocs::with_limit(limit))
            .context("Search failed")?;

        top_docs
            .into_iter()
            .map(|(_score, address)| {
                let doc: TantivyDocument = searcher.doc(address)?;
                Ok(SearchHit {
                    doc_id: encode_address(address),
                    fields: self.to_field_set(&doc),
                })
            })
            .collect()
    }

    fn get_document(&self, doc_id: DocId) -> Result<Option<FieldSet>> {
        let address = decode_address(doc_id);
        let searcher = self.reader.searcher();
        let in_range = searcher
            .segment_readers()
            .get(address.segment_ord as usize)
            .is_some_and(|segment| address.doc_id < segment.max_doc());
        if !in_range {
            return Ok(None);
        }
        let doc: TantivyDocument = searcher.doc(address)?;
        Ok(Some(self.to_field_set(&doc)))
    }

    fn index_statistics(&self) -> Result<Option<IndexStatistics>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        let (file_count, total_size_in_bytes, last_modified) = Self::directory_usage(path)?;
        Ok(Some(IndexStatistics {
            index_path: path.display().to_string(),
            document_count: self.total_documents()?,
            field_count: self.schema_fields.len(),
            total_size_in_bytes,
            file_count,
            last_modified,
        }))
    }

    fn total_documents(&self) -> Result<u64> {
        Ok(self.reader.searcher().num_docs())
    }

    fn index_size_in_bytes(&self) -> Result<u64> {
        match &self.path {
            Some(path) => Ok(Self::directory_usage(path)?.1),
            None => Ok(0),
        }
    }
}

impl DocumentSink for TantivyIndex {
    fn add_document(&self, doc: &FieldSet) -> Result<()> {
        let doc = self.to_document(doc);
        self.writer.lock().add_document(doc)?;
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.writer.lock().commit().context("Failed to commit index")?;
        self.reader.reload().context("Failed to reload index reader")?;
        tracing::debug!("Committed index ({} documents)", self.total_documents()?);
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        self.writer.lock().rollback().context("Failed to roll back index writer")?;
        Ok(())
    }
}

fn build_schema() -> Schema {
    let mut builder = Schema::builder();
    for &(name, kind) in fields::SCHEMA {
        match kind {
            FieldKind::Keyword => {
                builder.add_text_field(name, STRING | STORED);
            }
            FieldKind::Text => {
                builder.add_text_field(name, TEXT | STORED);
            }
            FieldKind::Integer => {
                builder.add_i64_field(name, INDEXED | STORED | FAST);
            }
            FieldKind::Stored => {
                builder.add_text_field(name, STORED);
            }
        }
    }
    builder.add_text_field(FIELD_NAMES, STRING);
    builder.build()
}

fn encode_address(address: DocAddress) -> DocId {
    (u64::from(address.segment_ord) << 32) | u64::from(address.doc_id)
}

fn decode_address(doc_id: DocId) -> DocAddress {
    DocAddress::new((doc_id >> 32) as u32, (doc_id & 0xffff_ffff) as u32)
}
