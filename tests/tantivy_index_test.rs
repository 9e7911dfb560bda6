mod common;

use assert2::{check, let_assert};
use common::{WRITER_MEMORY, corpus, load};
use dotnet_docs::document::{self, FieldSet, fields};
use dotnet_docs::index::{BulkIndexer, DocumentSink, Predicate, SearchIndex, TantivyIndex};
use dotnet_docs::query::QueryEngine;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn reopened_index_keeps_documents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index");

    {
        let index = TantivyIndex::open_or_create(&path, WRITER_MEMORY).unwrap();
        load(&index, &corpus());
    }

    let index = TantivyIndex::open_or_create(&path, WRITER_MEMORY).unwrap();
    check!(index.total_documents().unwrap() == corpus().len() as u64);

    let engine = QueryEngine::new(Arc::new(index));
    let_assert!(Some(member) = engine.get_by_id("T:Newtonsoft.Json.Linq.JObject").unwrap());
    check!(member.namespace == "Newtonsoft.Json.Linq");
    check!(member.is_from_nuget_cache);
}

#[test]
fn statistics_describe_the_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index");
    let index = TantivyIndex::open_or_create(&path, WRITER_MEMORY).unwrap();
    load(&index, &corpus());

    let_assert!(Some(stats) = index.index_statistics().unwrap());
    check!(stats.index_path == path.display().to_string());
    check!(stats.document_count == corpus().len() as u64);
    check!(stats.field_count == fields::SCHEMA.len());
    check!(stats.file_count > 0);
    check!(stats.total_size_in_bytes > 0);
    check!(index.index_size_in_bytes().unwrap() > 0);
    check!(stats.last_modified.is_some());
}

#[test]
fn ram_index_has_no_statistics() {
    let index = TantivyIndex::create_in_ram(WRITER_MEMORY).unwrap();
    check!(index.index_statistics().unwrap().is_none());
    check!(index.index_size_in_bytes().unwrap() == 0);
    check!(index.total_documents().unwrap() == 0);
}

#[test]
fn uncommitted_documents_are_invisible() {
    let index = TantivyIndex::create_in_ram(WRITER_MEMORY).unwrap();
    let members = corpus();
    let indexer = BulkIndexer::new(&index, 4, 100);
    indexer.add(&members[0]).unwrap();
    check!(index.total_documents().unwrap() == 0);

    index.commit().unwrap();
    check!(index.total_documents().unwrap() == 1);
}

#[test]
fn get_document_round_trips_hits() {
    let index = TantivyIndex::create_in_ram(WRITER_MEMORY).unwrap();
    load(&index, &corpus());

    let hits = index
        .search_by_field(fields::NAME, "JObject", 10)
        .unwrap();
    let_assert!([hit] = hits.as_slice());
    let_assert!(Some(doc) = index.get_document(hit.doc_id).unwrap());
    check!(doc.get(fields::ID) == Some("T:Newtonsoft.Json.Linq.JObject"));

    check!(index.get_document(u64::MAX).unwrap().is_none());
}

#[test]
fn foreign_documents_are_skipped_by_queries() {
    let index = TantivyIndex::create_in_ram(WRITER_MEMORY).unwrap();
    load(&index, &corpus());

    let mut foreign = FieldSet::new();
    foreign.push(fields::ID, "T:Foreign");
    foreign.push(fields::MEMBER_TYPE, "Delegate");
    foreign.push(fields::NAME, "JObject");
    index.add_document(&foreign).unwrap();
    index.commit().unwrap();

    check!(index.search_by_field(fields::NAME, "JObject", 10).unwrap().len() == 2);
    let engine = QueryEngine::new(Arc::new(index));
    let results = engine.search_by_name("JObject", 10).unwrap();
    let_assert!([member] = results.as_slice());
    check!(member.id == "T:Newtonsoft.Json.Linq.JObject");
}

#[test]
fn primitive_predicates() {
    let index = TantivyIndex::create_in_ram(WRITER_MEMORY).unwrap();
    load(&index, &corpus());

    let in_range = index
        .search_by_int_range(fields::CYCLOMATIC_COMPLEXITY, 1, 3, 100)
        .unwrap();
    check!(in_range.len() == 5);

    let with_exceptions = index.search_by_field_exists(fields::EXCEPTION, 100).unwrap();
    check!(with_exceptions.len() == 5);

    let_assert!(Err(_) = index.search(&[Predicate::matches(fields::SOURCE_FILE_PATH, "x")], 10));
    let_assert!(Err(_) = index.search(&[Predicate::matches("noSuchField", "x")], 10));

    let mut rebuilt = 0;
    for hit in index.search(&[], 100).unwrap() {
        if document::from_fields(&hit.fields).is_some() {
            rebuilt += 1;
        }
    }
    check!(rebuilt == corpus().len());
}

#[test]
fn rollback_discards_pending_documents() {
    let index = TantivyIndex::create_in_ram(WRITER_MEMORY).unwrap();
    let members = corpus();
    load(&index, &members[..2]);

    let indexer = BulkIndexer::new(&index, 4, 100);
    indexer.add(&members[2]).unwrap();
    index.rollback().unwrap();
    index.commit().unwrap();
    check!(index.total_documents().unwrap() == 2);

    load(&index, &members[2..]);
    check!(index.total_documents().unwrap() == members.len() as u64);
}
