//! Typed documentation queries over a [`SearchIndex`].

use super::filters::{SearchFilters, is_wildcard};
use crate::document::{self, fields};
use crate::error::{QueryError, QueryResult};
use crate::index::{Predicate, SearchHit, SearchIndex};
use crate::model::{IndexStatistics, MemberInfo, MemberType};
use std::sync::Arc;

/// Validates arguments, issues one index search, and rebuilds records.
///
/// Holds no per-query state, so one engine can serve any number of threads.
/// The index handle is shared; dropping the engine does not close it.
#[derive(Clone)]
pub struct QueryEngine {
    index: Arc<dyn SearchIndex>,
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine").finish_non_exhaustive()
    }
}

impl QueryEngine {
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        Self { index }
    }

    /// Members whose simple name is exactly `name`.
    pub fn search_by_name(&self, name: &str, max_results: usize) -> QueryResult<Vec<MemberInfo>> {
        self.field_match("name", fields::NAME, name, max_results)
    }

    /// Full-text search over names, summaries, remarks and return descriptions.
    pub fn search_content(&self, text: &str, max_results: usize) -> QueryResult<Vec<MemberInfo>> {
        self.field_match("text", fields::CONTENT, text, max_results)
    }

    pub fn search_by_namespace(
        &self,
        namespace: &str,
        max_results: usize,
    ) -> QueryResult<Vec<MemberInfo>> {
        self.field_match("namespace", fields::NAMESPACE, namespace, max_results)
    }

    pub fn search_by_type(
        &self,
        member_type: MemberType,
        max_results: usize,
    ) -> QueryResult<Vec<MemberInfo>> {
        self.field_match("memberType", fields::MEMBER_TYPE, member_type.as_str(), max_results)
    }

    pub fn search_by_assembly(
        &self,
        assembly: &str,
        max_results: usize,
    ) -> QueryResult<Vec<MemberInfo>> {
        self.field_match("assembly", fields::ASSEMBLY, assembly, max_results)
    }

    pub fn search_by_package(
        &self,
        package_id: &str,
        max_results: usize,
    ) -> QueryResult<Vec<MemberInfo>> {
        self.field_match("packageId", fields::PACKAGE_ID, package_id, max_results)
    }

    /// Members declared directly on the type with this full name.
    pub fn search_by_declaring_type(
        &self,
        type_full_name: &str,
        max_results: usize,
    ) -> QueryResult<Vec<MemberInfo>> {
        self.field_match(
            "declaringType",
            fields::DECLARING_TYPE,
            type_full_name,
            max_results,
        )
    }

    /// Members whose example code contains every token of `code`.
    pub fn search_code_examples(
        &self,
        code: &str,
        max_results: usize,
    ) -> QueryResult<Vec<MemberInfo>> {
        self.field_match("code", fields::CODE_EXAMPLE, code, max_results)
    }

    /// Members documented as throwing `exception_type` (e.g. `T:System.ArgumentNullException`).
    pub fn search_by_exception(
        &self,
        exception_type: &str,
        max_results: usize,
    ) -> QueryResult<Vec<MemberInfo>> {
        self.field_match("exceptionType", fields::EXCEPTION, exception_type, max_results)
    }

    /// Look a member up by documentation-comment ID.
    ///
    /// IDs repeat across framework builds of the same package, so this returns
    /// whichever build the index ranks first. Filter with
    /// [`search_with_filters`](Self::search_with_filters) to pick a specific build.
    // TODO: accept a target framework so callers can pick the build instead of filtering.
    pub fn get_by_id(&self, id: &str) -> QueryResult<Option<MemberInfo>> {
        let id = require_text("id", id)?;
        let mut members = self.run(&[Predicate::matches(fields::ID, id)], 1)?;
        Ok(members.pop())
    }

    /// Members with between `min` and `max` parameters, inclusive.
    pub fn get_by_parameter_count(
        &self,
        min: i64,
        max: i64,
        max_results: usize,
    ) -> QueryResult<Vec<MemberInfo>> {
        require_range(min, max)?;
        require_limit(max_results)?;
        self.run(
            &[Predicate::IntRange {
                field: fields::PARAMETER_COUNT,
                min,
                max,
            }],
            max_results,
        )
    }

    /// Members whose cyclomatic complexity is at least `min_complexity`.
    pub fn get_complex_methods(
        &self,
        min_complexity: i64,
        max_results: usize,
    ) -> QueryResult<Vec<MemberInfo>> {
        require_range(min_complexity, i64::MAX)?;
        require_limit(max_results)?;
        self.run(
            &[Predicate::IntRange {
                field: fields::CYCLOMATIC_COMPLEXITY,
                min: min_complexity,
                max: i64::MAX,
            }],
            max_results,
        )
    }

    /// Members with at least one code example.
    pub fn get_methods_with_examples(&self, max_results: usize) -> QueryResult<Vec<MemberInfo>> {
        require_limit(max_results)?;
        self.run(
            &[Predicate::Exists {
                field: fields::CODE_EXAMPLE,
            }],
            max_results,
        )
    }

    /// Types defined in `assembly`.
    pub fn list_types_from_assembly(
        &self,
        assembly: &str,
        max_results: usize,
    ) -> QueryResult<Vec<MemberInfo>> {
        let assembly = require_text("assembly", assembly)?;
        require_limit(max_results)?;
        self.run(
            &[
                Predicate::matches(fields::ASSEMBLY, assembly),
                Predicate::matches(fields::MEMBER_TYPE, MemberType::Type.as_str()),
            ],
            max_results,
        )
    }

    /// Members in namespaces matching a `*`/`?` pattern such as `System.Collections.*`.
    ///
    /// A pattern without wildcards matches the namespace exactly.
    pub fn search_by_namespace_pattern(
        &self,
        pattern: &str,
        max_results: usize,
    ) -> QueryResult<Vec<MemberInfo>> {
        let pattern = require_text("pattern", pattern)?;
        require_limit(max_results)?;
        let predicate = if is_wildcard(pattern) {
            Predicate::Wildcard {
                field: fields::NAMESPACE,
                pattern: pattern.to_string(),
            }
        } else {
            Predicate::matches(fields::NAMESPACE, pattern)
        };
        self.run(&[predicate], max_results)
    }

    /// Members matching every populated filter. No filters at all matches everything.
    pub fn search_with_filters(
        &self,
        filters: &SearchFilters,
        max_results: usize,
    ) -> QueryResult<Vec<MemberInfo>> {
        require_limit(max_results)?;
        self.run(&filters.to_predicates(), max_results)
    }

    pub fn statistics(&self) -> QueryResult<Option<IndexStatistics>> {
        Ok(self.index.index_statistics()?)
    }

    pub fn total_documents(&self) -> QueryResult<u64> {
        Ok(self.index.total_documents()?)
    }

    fn field_match(
        &self,
        argument: &'static str,
        field: &'static str,
        value: &str,
        max_results: usize,
    ) -> QueryResult<Vec<MemberInfo>> {
        let value = require_text(argument, value)?;
        require_limit(max_results)?;
        self.run(&[Predicate::matches(field, value)], max_results)
    }

    fn run(&self, predicates: &[Predicate], max_results: usize) -> QueryResult<Vec<MemberInfo>> {
        let hits = self.index.search(predicates, max_results)?;
        Ok(hits.into_iter().filter_map(rebuild).collect())
    }
}

/// Malformed documents are dropped so one bad record can't fail a whole query.
fn rebuild(hit: SearchHit) -> Option<MemberInfo> {
    let member = document::from_fields(&hit.fields);
    if member.is_none() {
        tracing::debug!(
            "Skipping malformed document {} (id={:?}, memberType={:?})",
            hit.doc_id,
            hit.fields.get(fields::ID),
            hit.fields.get(fields::MEMBER_TYPE)
        );
    }
    member
}

fn require_text<'a>(name: &'static str, value: &'a str) -> QueryResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QueryError::invalid(name, "must not be empty"));
    }
    Ok(trimmed)
}

fn require_limit(max_results: usize) -> QueryResult<()> {
    if max_results == 0 {
        return Err(QueryError::invalid("maxResults", "must be greater than zero"));
    }
    Ok(())
}

fn require_range(min: i64, max: i64) -> QueryResult<()> {
    if min < 0 {
        return Err(QueryError::invalid("min", format!("must be non-negative, got {}", min)));
    }
    if max < 0 {
        return Err(QueryError::invalid("max", format!("must be non-negative, got {}", max)));
    }
    if min > max {
        return Err(QueryError::invalid(
            "min",
            format!("must not exceed max ({} > {})", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::InMemoryIndex;
    use assert2::{check, let_assert};
    use rstest::rstest;

    fn engine() -> QueryEngine {
        QueryEngine::new(Arc::new(InMemoryIndex::new()))
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_blank_arguments_are_rejected(#[case] value: &str) {
        let engine = engine();
        let_assert!(Err(err) = engine.search_by_name(value, 10));
        check!(err.is_invalid_argument());
        let_assert!(Err(QueryError::InvalidArgument { name, .. }) = engine.get_by_id(value));
        check!(name == "id");
        let_assert!(Err(_) = engine.search_by_namespace_pattern(value, 10));
        let_assert!(Err(_) = engine.list_types_from_assembly(value, 10));
    }

    #[test]
    fn test_zero_max_results_is_rejected() {
        let engine = engine();
        let_assert!(Err(QueryError::InvalidArgument { name, .. }) = engine.search_content("x", 0));
        check!(name == "maxResults");
        let_assert!(Err(_) = engine.get_methods_with_examples(0));
        let_assert!(Err(_) = engine.search_with_filters(&SearchFilters::new(), 0));
        let_assert!(Err(_) = engine.get_complex_methods(1, 0));
    }

    #[rstest]
    #[case(3, 2)]
    #[case(1, 0)]
    #[case(i64::MAX, 0)]
    #[case(-1, 4)]
    #[case(0, -4)]
    fn test_bad_ranges_are_rejected(#[case] min: i64, #[case] max: i64) {
        let_assert!(Err(err) = engine().get_by_parameter_count(min, max, 10));
        check!(err.is_invalid_argument());
    }

    #[test]
    fn test_negative_complexity_is_rejected() {
        let_assert!(Err(err) = engine().get_complex_methods(-2, 10));
        check!(err.is_invalid_argument());
    }

    #[test]
    fn test_empty_index_yields_nothing() {
        let engine = engine();
        check!(engine.search_by_name("Foo", 10).unwrap().is_empty());
        check!(engine.get_by_id("T:Foo").unwrap().is_none());
        check!(engine.get_by_parameter_count(2, 2, 10).unwrap().is_empty());
    }
}
