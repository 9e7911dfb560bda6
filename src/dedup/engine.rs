//! Collapses per-framework copies of a member into one display record.

use super::framework::{FrameworkOrdering, FrameworkPriority, sort_best_first};
use crate::model::{MemberInfo, MemberType};
use ahash::AHashMap;
use serde::Serialize;
use std::sync::Arc;

/// Frameworks listed in full before switching to the `+N others` form.
const MAX_LISTED_FRAMEWORKS: usize = 3;

/// Identity of a logical member across framework builds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    member_type: MemberType,
    full_name: String,
    assembly: String,
    package_id: Option<String>,
}

impl GroupKey {
    fn of(member: &MemberInfo) -> Self {
        Self {
            member_type: member.member_type,
            full_name: member.full_name.clone(),
            assembly: member.assembly.clone(),
            package_id: member.package_id.clone().filter(|id| !id.is_empty()),
        }
    }
}

/// Summary of how much a deduplication pass collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeduplicationStats {
    pub original_count: usize,
    pub deduplicated_count: usize,
    pub reduction_percentage: f64,
    pub average_frameworks_per_member: f64,
}

/// Picks the best framework build of each member and summarizes the others
/// in its `target_framework` (e.g. `"net9.0, net8.0"` or `"net9.0 [+4 others]"`).
#[derive(Clone)]
pub struct Deduplicator {
    enabled: bool,
    ordering: Arc<dyn FrameworkOrdering>,
}

impl std::fmt::Debug for Deduplicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deduplicator")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(Arc::new(FrameworkPriority::new()))
    }
}

impl Deduplicator {
    pub fn new(ordering: Arc<dyn FrameworkOrdering>) -> Self {
        Self {
            enabled: true,
            ordering,
        }
    }

    pub fn with_enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// One record per `(member type, full name, assembly, package)`, in the
    /// order each group was first seen. Disabled or empty input passes through.
    pub fn deduplicate(&self, members: Vec<MemberInfo>) -> Vec<MemberInfo> {
        if !self.enabled || members.is_empty() {
            return members;
        }

        let mut slots: AHashMap<GroupKey, usize> = AHashMap::new();
        let mut groups: Vec<Vec<MemberInfo>> = Vec::new();
        for member in members {
            let next = groups.len();
            let slot = *slots.entry(GroupKey::of(&member)).or_insert(next);
            if slot == next {
                groups.push(Vec::new());
            }
            groups[slot].push(member);
        }

        groups
            .into_iter()
            .map(|group| self.collapse(group))
            .collect()
    }

    fn collapse(&self, mut group: Vec<MemberInfo>) -> MemberInfo {
        let mut frameworks: Vec<&str> = Vec::new();
        for framework in group.iter().filter_map(MemberInfo::framework) {
            if !frameworks.contains(&framework) {
                frameworks.push(framework);
            }
        }
        sort_best_first(self.ordering.as_ref(), &mut frameworks);

        let representative = frameworks
            .first()
            .and_then(|best| group.iter().position(|m| m.framework() == Some(*best)))
            .unwrap_or(0);
        let display = format_frameworks(&frameworks);

        MemberInfo {
            target_framework: Some(display).filter(|d| !d.is_empty()),
            ..group.swap_remove(representative)
        }
    }

    /// Render distinct frameworks (best first) the way `deduplicate` does.
    pub fn framework_display(&self, frameworks: &[&str]) -> String {
        let mut distinct: Vec<&str> = Vec::new();
        for framework in frameworks.iter().copied().filter(|f| !f.is_empty()) {
            if !distinct.contains(&framework) {
                distinct.push(framework);
            }
        }
        sort_best_first(self.ordering.as_ref(), &mut distinct);
        format_frameworks(&distinct)
    }

    pub fn stats(original: &[MemberInfo], deduplicated: &[MemberInfo]) -> DeduplicationStats {
        stats_from_counts(original.len(), deduplicated.len())
    }
}

fn format_frameworks(sorted: &[&str]) -> String {
    match sorted {
        [] => String::new(),
        [only] => (*only).to_string(),
        list if list.len() <= MAX_LISTED_FRAMEWORKS => list.join(", "),
        [best, rest @ ..] => format!("{} [+{} others]", best, rest.len()),
    }
}

fn stats_from_counts(original_count: usize, deduplicated_count: usize) -> DeduplicationStats {
    let reduction_percentage = if original_count == 0 {
        0.0
    } else {
        (1.0 - deduplicated_count as f64 / original_count as f64) * 100.0
    };
    let average_frameworks_per_member = if original_count > 0 && deduplicated_count > 0 {
        original_count as f64 / deduplicated_count as f64
    } else {
        1.0
    };
    DeduplicationStats {
        original_count,
        deduplicated_count,
        reduction_percentage,
        average_frameworks_per_member,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case(&[], "")]
    #[case(&["net8.0"], "net8.0")]
    #[case(&["net8.0", "net6.0"], "net8.0, net6.0")]
    #[case(&["net9.0", "net8.0", "net6.0"], "net9.0, net8.0, net6.0")]
    #[case(&["net9.0", "net8.0", "net6.0", "netstandard2.0"], "net9.0 [+3 others]")]
    fn test_format_frameworks(#[case] sorted: &[&str], #[case] expected: &str) {
        check!(format_frameworks(sorted) == expected);
    }

    #[test]
    fn test_framework_display_sorts_and_dedups() {
        let dedup = Deduplicator::default();
        check!(dedup.framework_display(&["net6.0", "", "net8.0", "net6.0"]) == "net8.0, net6.0");
    }

    #[rstest]
    #[case(4, 2, 50.0, 2.0)]
    #[case(0, 0, 0.0, 1.0)]
    #[case(10, 10, 0.0, 1.0)]
    #[case(5, 0, 100.0, 1.0)]
    fn test_stats(
        #[case] original: usize,
        #[case] deduplicated: usize,
        #[case] reduction: f64,
        #[case] average: f64,
    ) {
        let stats = stats_from_counts(original, deduplicated);
        check!(stats.original_count == original);
        check!(stats.deduplicated_count == deduplicated);
        check!((stats.reduction_percentage - reduction).abs() < 1e-9);
        check!((stats.average_frameworks_per_member - average).abs() < 1e-9);
    }

    #[test]
    fn test_group_key_treats_empty_package_as_absent() {
        let mut a = MemberInfo::new("T:A", MemberType::Type, "A", "A");
        a.package_id = Some(String::new());
        let b = MemberInfo::new("T:A", MemberType::Type, "A", "A");
        check!(GroupKey::of(&a) == GroupKey::of(&b));
    }
}
