mod common;

use assert2::{check, let_assert};
use common::{Backend, corpus, runtime_members};
use dotnet_docs::dedup::{Deduplicator, FrameworkOrdering};
use dotnet_docs::model::{MemberInfo, MemberType};
use rstest::rstest;
use std::cmp::Ordering;
use std::sync::Arc;

fn build(id: &str, framework: Option<&str>) -> MemberInfo {
    let mut m = MemberInfo::new(id, MemberType::Method, "Run", id.trim_start_matches("M:"));
    m.assembly = "Demo".into();
    m.target_framework = framework.map(str::to_string);
    m
}

#[test]
fn best_framework_leads_the_summary() {
    let members = vec![
        build("M:A.Run", Some("net6.0")),
        build("M:A.Run", Some("net8.0")),
        build("M:A.Run", Some("net9.0")),
        build("M:A.Run", Some("netstandard2.0")),
    ];
    let deduplicated = Deduplicator::default().deduplicate(members);
    let_assert!([member] = deduplicated.as_slice());
    check!(member.target_framework.as_deref() == Some("net9.0 [+3 others]"));
}

#[rstest]
#[case(&["net8.0"], Some("net8.0"))]
#[case(&["net6.0", "net8.0"], Some("net8.0, net6.0"))]
#[case(&["net6.0", "net8.0", "net8.0"], Some("net8.0, net6.0"))]
#[case(&["netstandard2.0", "net48", "net8.0"], Some("net8.0, netstandard2.0, net48"))]
#[case(&["", ""], None)]
fn framework_summaries(#[case] frameworks: &[&str], #[case] expected: Option<&str>) {
    let members = frameworks
        .iter()
        .map(|tfm| build("M:A.Run", Some(*tfm)))
        .collect();
    let deduplicated = Deduplicator::default().deduplicate(members);
    let_assert!([member] = deduplicated.as_slice());
    check!(member.target_framework.as_deref() == expected);
}

#[test]
fn representative_is_the_best_build() {
    let mut old = build("M:A.Run", Some("net6.0"));
    old.summary = Some("old".into());
    let mut new = build("M:A.Run", Some("net8.0"));
    new.summary = Some("new".into());

    let deduplicated = Deduplicator::default().deduplicate(vec![old, new]);
    let_assert!([member] = deduplicated.as_slice());
    check!(member.summary.as_deref() == Some("new"));
}

#[test]
fn missing_frameworks_keep_the_first_record() {
    let mut first = build("M:A.Run", None);
    first.summary = Some("first".into());
    let second = build("M:A.Run", None);

    let deduplicated = Deduplicator::default().deduplicate(vec![first, second]);
    let_assert!([member] = deduplicated.as_slice());
    check!(member.summary.as_deref() == Some("first"));
    check!(member.target_framework.is_none());
}

#[test]
fn groups_keep_first_seen_order() {
    let members = vec![
        build("M:B.Run", Some("net6.0")),
        build("M:A.Run", Some("net6.0")),
        build("M:B.Run", Some("net8.0")),
        build("M:C.Run", None),
    ];
    let deduplicated = Deduplicator::default().deduplicate(members);
    let order: Vec<&str> = deduplicated.iter().map(|m| m.id.as_str()).collect();
    check!(order == ["M:B.Run", "M:A.Run", "M:C.Run"]);
}

#[test]
fn different_packages_are_different_members() {
    let mut a = build("M:A.Run", Some("net8.0"));
    a.package_id = Some("Demo.Core".into());
    let mut b = build("M:A.Run", Some("net8.0"));
    b.package_id = Some("Demo.Legacy".into());
    let c = build("M:A.Run", Some("net6.0"));

    check!(Deduplicator::default().deduplicate(vec![a, b, c]).len() == 3);
}

#[test]
fn disabled_and_empty_are_identity() {
    let members = runtime_members();
    let disabled = Deduplicator::default().with_enabled(false);
    check!(disabled.deduplicate(members.clone()) == members);
    check!(Deduplicator::default().deduplicate(Vec::new()).is_empty());
}

#[test]
fn custom_ordering_is_honored() {
    // Prefer .NET Standard for maximum reach.
    let prefer_standard = |a: &str, b: &str| -> Ordering {
        a.starts_with("netstandard")
            .cmp(&b.starts_with("netstandard"))
            .then_with(|| b.cmp(a))
    };
    let ordering: Arc<dyn FrameworkOrdering> = Arc::new(prefer_standard);
    let dedup = Deduplicator::new(ordering);

    let members = vec![
        build("M:A.Run", Some("net8.0")),
        build("M:A.Run", Some("netstandard2.0")),
    ];
    let deduplicated = dedup.deduplicate(members);
    let_assert!([member] = deduplicated.as_slice());
    check!(member.target_framework.as_deref() == Some("netstandard2.0, net8.0"));
}

#[test]
fn stats_describe_the_reduction() {
    let members = vec![
        build("M:A.Run", Some("net6.0")),
        build("M:A.Run", Some("net8.0")),
        build("M:B.Run", Some("net6.0")),
        build("M:B.Run", Some("net8.0")),
    ];
    let deduplicated = Deduplicator::default().deduplicate(members.clone());
    let stats = Deduplicator::stats(&members, &deduplicated);
    check!(stats.original_count == 4);
    check!(stats.deduplicated_count == 2);
    check!((stats.reduction_percentage - 50.0).abs() < 1e-9);
    check!((stats.average_frameworks_per_member - 2.0).abs() < 1e-9);

    let empty = Deduplicator::stats(&[], &[]);
    check!(empty.original_count == 0);
    check!(empty.reduction_percentage == 0.0);
    check!(empty.average_frameworks_per_member == 1.0);
}

#[rstest]
fn query_results_collapse(#[values(Backend::Memory, Backend::Tantivy)] backend: Backend) {
    let engine = backend.engine(&corpus());
    let results = engine.search_by_namespace("System", 100).unwrap();
    check!(results.len() == 8);

    let deduplicated = Deduplicator::default().deduplicate(results);
    check!(deduplicated.len() == 2);
    for member in &deduplicated {
        check!(member.target_framework.as_deref() == Some("net9.0 [+3 others]"));
    }
}
