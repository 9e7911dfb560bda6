//! Field names and how the search engine should treat each of them.

pub const ID: &str = "id";
pub const MEMBER_TYPE: &str = "memberType";
pub const NAME: &str = "name";
pub const FULL_NAME: &str = "fullName";
pub const NAMESPACE: &str = "namespace";
pub const ASSEMBLY: &str = "assembly";
pub const DECLARING_TYPE: &str = "declaringType";

pub const SUMMARY: &str = "summary";
pub const REMARKS: &str = "remarks";
pub const RETURNS: &str = "returns";
pub const SEE_ALSO: &str = "seeAlso";
pub const CONTENT: &str = "content";

pub const PARAMETER: &str = "parameter";
pub const PARAMETER_DESCRIPTION: &str = "parameterDescription";
pub const CODE_EXAMPLE: &str = "codeExample";
pub const CODE_EXAMPLE_DESCRIPTION: &str = "codeExampleDescription";
pub const CODE_EXAMPLE_LANGUAGE: &str = "codeExampleLanguage";
pub const EXCEPTION: &str = "exception";
pub const EXCEPTION_CONDITION: &str = "exceptionCondition";

pub const PARAMETERS_JSON: &str = "parameters";
pub const CODE_EXAMPLES_JSON: &str = "codeExamples";
pub const EXCEPTIONS_JSON: &str = "exceptions";

pub const PARAMETER_COUNT: &str = "parameterCount";
pub const CYCLOMATIC_COMPLEXITY: &str = "cyclomaticComplexity";
pub const DOCUMENTATION_LINE_COUNT: &str = "documentationLineCount";

pub const PACKAGE_ID: &str = "packageId";
pub const PACKAGE_VERSION: &str = "packageVersion";
pub const TARGET_FRAMEWORK: &str = "targetFramework";
pub const IS_FROM_NUGET_CACHE: &str = "isFromNuGetCache";
pub const SOURCE_FILE_PATH: &str = "sourceFilePath";

/// Storage/matching behavior of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Indexed verbatim; matches are exact.
    Keyword,
    /// Tokenized; a match requires every query token to appear.
    Text,
    /// Decimal integer; supports range queries.
    Integer,
    /// Retrievable but not searchable.
    Stored,
}

/// Every field a document may carry, in schema order.
pub const SCHEMA: &[(&str, FieldKind)] = &[
    (ID, FieldKind::Keyword),
    (MEMBER_TYPE, FieldKind::Keyword),
    (NAME, FieldKind::Keyword),
    (FULL_NAME, FieldKind::Keyword),
    (NAMESPACE, FieldKind::Keyword),
    (ASSEMBLY, FieldKind::Keyword),
    (DECLARING_TYPE, FieldKind::Keyword),
    (SUMMARY, FieldKind::Text),
    (REMARKS, FieldKind::Text),
    (RETURNS, FieldKind::Text),
    (SEE_ALSO, FieldKind::Keyword),
    (CONTENT, FieldKind::Text),
    (PARAMETER, FieldKind::Text),
    (PARAMETER_DESCRIPTION, FieldKind::Text),
    (CODE_EXAMPLE, FieldKind::Text),
    (CODE_EXAMPLE_DESCRIPTION, FieldKind::Text),
    (CODE_EXAMPLE_LANGUAGE, FieldKind::Keyword),
    (EXCEPTION, FieldKind::Keyword),
    (EXCEPTION_CONDITION, FieldKind::Text),
    (PARAMETERS_JSON, FieldKind::Stored),
    (CODE_EXAMPLES_JSON, FieldKind::Stored),
    (EXCEPTIONS_JSON, FieldKind::Stored),
    (PARAMETER_COUNT, FieldKind::Integer),
    (CYCLOMATIC_COMPLEXITY, FieldKind::Integer),
    (DOCUMENTATION_LINE_COUNT, FieldKind::Integer),
    (PACKAGE_ID, FieldKind::Keyword),
    (PACKAGE_VERSION, FieldKind::Keyword),
    (TARGET_FRAMEWORK, FieldKind::Keyword),
    (IS_FROM_NUGET_CACHE, FieldKind::Keyword),
    (SOURCE_FILE_PATH, FieldKind::Stored),
];

/// Look up a field's kind. Unknown names are `None`.
pub fn kind_of(field: &str) -> Option<FieldKind> {
    SCHEMA
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, kind)| *kind)
}

/// Resolve a field name to its `'static` schema entry.
pub fn canonical_name(field: &str) -> Option<&'static str> {
    SCHEMA
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(name, _)| *name)
}

/// Lowercased alphanumeric tokens, the unit of matching for [`FieldKind::Text`].
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}
