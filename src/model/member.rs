//! Canonical representation of one documented .NET API member.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of documented member, as encoded by the documentation-comment ID prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberType {
    Namespace,
    Type,
    Method,
    Constructor,
    Property,
    Field,
    Event,
    Operator,
}

impl MemberType {
    pub const ALL: [Self; 8] = [
        Self::Namespace,
        Self::Type,
        Self::Method,
        Self::Constructor,
        Self::Property,
        Self::Field,
        Self::Event,
        Self::Operator,
    ];

    /// Stable name used in stored documents.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Namespace => "Namespace",
            Self::Type => "Type",
            Self::Method => "Method",
            Self::Constructor => "Constructor",
            Self::Property => "Property",
            Self::Field => "Field",
            Self::Event => "Event",
            Self::Operator => "Operator",
        }
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a stored member type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMemberTypeError(pub String);

impl fmt::Display for ParseMemberTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown member type '{}'", self.0)
    }
}

impl std::error::Error for ParseMemberTypeError {}

impl FromStr for MemberType {
    type Err = ParseMemberTypeError;

    /// Case-insensitive, matching how the names were historically written.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseMemberTypeError(s.to_string()))
    }
}

/// One parameter of a method, constructor or indexer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "is_optional")]
    pub is_optional: bool,
    #[serde(default, alias = "is_params")]
    pub is_params: bool,
    #[serde(default, alias = "is_out")]
    pub is_out: bool,
    #[serde(default, alias = "is_ref")]
    pub is_ref: bool,
}

impl ParameterInfo {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            position,
            ..Self::default()
        }
    }

    /// `"<Type> <Name>"`, the searchable signature fragment.
    pub fn signature(&self) -> String {
        format!("{} {}", self.type_name, self.name)
    }
}

pub const DEFAULT_CODE_LANGUAGE: &str = "csharp";

fn default_language() -> String {
    DEFAULT_CODE_LANGUAGE.to_string()
}

/// A `<code>` block lifted from an `<example>` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub code: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl CodeExample {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            description: None,
            code: code.into(),
            language: default_language(),
        }
    }
}

/// An `<exception cref="...">` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionInfo {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl ExceptionInfo {
    pub fn new(type_name: impl Into<String>, condition: Option<String>) -> Self {
        Self {
            type_name: type_name.into(),
            condition,
        }
    }
}

/// Rough size/complexity figures computed at parse time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityMetrics {
    #[serde(alias = "parameter_count")]
    pub parameter_count: u32,
    #[serde(alias = "cyclomatic_complexity")]
    pub cyclomatic_complexity: u32,
    #[serde(alias = "documentation_line_count")]
    pub documentation_line_count: u32,
}

/// A documented API member from one framework build of one assembly.
///
/// `id` repeats across framework builds of the same package; the tuple
/// `(id, target_framework, package_id, assembly)` identifies one indexed record.
/// Records are values: anything that "changes" a record builds a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub id: String,
    pub member_type: MemberType,
    pub name: String,
    pub full_name: String,
    pub namespace: String,
    pub assembly: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub see_also: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code_examples: Vec<CodeExample>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<ExceptionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<ComplexityMetrics>,

    // Provenance: where this record came from, not what it is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_framework: Option<String>,
    #[serde(default, rename = "isFromNuGetCache", alias = "isFromNugetCache")]
    pub is_from_nuget_cache: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file_path: Option<String>,
}

impl MemberInfo {
    /// Create a record with identity fields set and everything optional empty.
    pub fn new(
        id: impl Into<String>,
        member_type: MemberType,
        name: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            member_type,
            name: name.into(),
            full_name: full_name.into(),
            namespace: String::new(),
            assembly: String::new(),
            summary: None,
            remarks: None,
            returns: None,
            see_also: None,
            parameters: Vec::new(),
            code_examples: Vec::new(),
            exceptions: Vec::new(),
            complexity: None,
            package_id: None,
            package_version: None,
            target_framework: None,
            is_from_nuget_cache: false,
            source_file_path: None,
        }
    }

    /// Copy of this record with the target framework replaced.
    pub fn with_target_framework(&self, target_framework: Option<String>) -> Self {
        Self {
            target_framework,
            ..self.clone()
        }
    }

    /// Full name of the enclosing type for non-type members.
    ///
    /// `System.String.Join(System.String,System.String[])` yields `System.String`.
    pub fn declaring_type(&self) -> Option<&str> {
        if matches!(self.member_type, MemberType::Type | MemberType::Namespace) {
            return None;
        }
        let without_params = self
            .full_name
            .split_once('(')
            .map_or(self.full_name.as_str(), |(head, _)| head);
        without_params
            .rsplit_once('.')
            .map(|(owner, _)| owner)
            .filter(|owner| !owner.is_empty())
    }

    /// Target framework, treating an empty string as absent.
    pub fn framework(&self) -> Option<&str> {
        self.target_framework.as_deref().filter(|tfm| !tfm.is_empty())
    }
}
