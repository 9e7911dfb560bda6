//! Record model for documented .NET members.
//!
//! These types are independent of any storage format; [`crate::document`]
//! handles conversion to and from the search engine's field layout.

mod member;
mod xref;

pub use member::{
    CodeExample, ComplexityMetrics, DEFAULT_CODE_LANGUAGE, ExceptionInfo, MemberInfo, MemberType,
    ParameterInfo, ParseMemberTypeError,
};
pub use xref::{CrossReference, CrossReferenceType};

use serde::Serialize;
use std::time::SystemTime;

/// Point-in-time snapshot of an index's size and shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStatistics {
    pub index_path: String,
    pub document_count: u64,
    pub field_count: usize,
    pub total_size_in_bytes: u64,
    pub file_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<SystemTime>,
}
