//! Flat, ordered key/value representation of a stored document.

use super::fields;
use std::sync::Arc;

/// The document shape exchanged with a search index.
///
/// A field may occur multiple times; repeated occurrences keep their insertion
/// order, which is how list-valued attributes are addressed by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    entries: Vec<(&'static str, Arc<str>)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append one occurrence of `field`.
    pub fn push(&mut self, field: &'static str, value: impl Into<Arc<str>>) {
        self.entries.push((field, value.into()));
    }

    /// Append under a runtime name; unknown names are dropped and reported as `false`.
    pub fn push_named(&mut self, field: &str, value: impl Into<Arc<str>>) -> bool {
        match fields::canonical_name(field) {
            Some(name) => {
                self.push(name, value);
                true
            }
            None => false,
        }
    }

    /// First occurrence of `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| &**value)
    }

    /// All occurrences of `field`, in insertion order.
    pub fn get_all<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(name, _)| *name == field)
            .map(|(_, value)| &**value)
    }

    /// Whether `field` has at least one non-empty occurrence.
    pub fn has_value(&self, field: &str) -> bool {
        self.get_all(field).any(|value| !value.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(name, value)| (*name, &**value))
    }

    /// Names of fields carrying a non-empty value, deduplicated, in first-seen order.
    pub fn populated_fields(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for (name, value) in &self.entries {
            if !value.is_empty() && !names.contains(name) {
                names.push(name);
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries but keep the allocation for reuse.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
