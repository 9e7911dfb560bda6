//! Directed references between documented members.

use serde::{Deserialize, Serialize};

/// How one member refers to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrossReferenceType {
    See,
    SeeAlso,
    Param,
    Return,
    Exception,
    Inheritance,
    Parameter,
    ReturnType,
    GenericConstraint,
}

/// An edge from `source_id` to `target_id`, which may name an external symbol.
///
/// Produced once while parsing and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReference {
    pub reference_type: CrossReferenceType,
    pub source_id: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl CrossReference {
    pub fn new(
        reference_type: CrossReferenceType,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            reference_type,
            source_id: source_id.into(),
            target_id: target_id.into(),
            context: None,
        }
    }

    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Whether the target uses the `X:` documentation-comment ID form.
    pub fn targets_doc_id(&self) -> bool {
        let bytes = self.target_id.as_bytes();
        bytes.len() > 2 && bytes[1] == b':' && bytes[0].is_ascii_uppercase()
    }
}
