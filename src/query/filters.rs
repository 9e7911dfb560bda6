//! Optional, ANDed filters for [`QueryEngine::search_with_filters`](super::QueryEngine::search_with_filters).

use crate::document::fields;
use crate::index::Predicate;
use crate::model::MemberType;
use serde::Deserialize;

/// Every populated filter must hold; unset or blank filters are ignored.
///
/// `namespace` accepts `*`/`?` wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFilters {
    pub query: Option<String>,
    pub namespace: Option<String>,
    pub member_type: Option<MemberType>,
    pub assembly: Option<String>,
    pub package_id: Option<String>,
    pub target_framework: Option<String>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, text: impl Into<String>) -> Self {
        self.query = Some(text.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub const fn member_type(mut self, member_type: MemberType) -> Self {
        self.member_type = Some(member_type);
        self
    }

    pub fn assembly(mut self, assembly: impl Into<String>) -> Self {
        self.assembly = Some(assembly.into());
        self
    }

    pub fn package_id(mut self, package_id: impl Into<String>) -> Self {
        self.package_id = Some(package_id.into());
        self
    }

    pub fn target_framework(mut self, target_framework: impl Into<String>) -> Self {
        self.target_framework = Some(target_framework.into());
        self
    }

    /// Lower the populated filters to index predicates.
    pub fn to_predicates(&self) -> Vec<Predicate> {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let mut predicates = Vec::new();
        if let Some(text) = present(&self.query) {
            predicates.push(Predicate::matches(fields::CONTENT, text));
        }
        if let Some(namespace) = present(&self.namespace) {
            predicates.push(if is_wildcard(&namespace) {
                Predicate::Wildcard {
                    field: fields::NAMESPACE,
                    pattern: namespace,
                }
            } else {
                Predicate::matches(fields::NAMESPACE, namespace)
            });
        }
        if let Some(kind) = self.member_type {
            predicates.push(Predicate::matches(fields::MEMBER_TYPE, kind.as_str()));
        }
        for (field, value) in [
            (fields::ASSEMBLY, &self.assembly),
            (fields::PACKAGE_ID, &self.package_id),
            (fields::TARGET_FRAMEWORK, &self.target_framework),
        ] {
            if let Some(value) = present(value) {
                predicates.push(Predicate::matches(field, value));
            }
        }
        predicates
    }
}

pub(crate) fn is_wildcard(pattern: &str) -> bool {
    pattern.contains(['*', '?'])
}
