//! Conversion between [`MemberInfo`] records and stored [`FieldSet`] documents.
//!
//! List-valued attributes are written twice: once as parallel repeated fields
//! (`parameter[i]`, `parameterDescription[i]`, ...) so they stay searchable, and
//! once as a structured JSON field that is the preferred source on read. Documents
//! written before the structured fields existed are rebuilt by zipping the
//! parallel groups, padding missing descriptions with `None`.

use super::field_set::FieldSet;
use super::fields::{self as f};
use crate::model::{
    CodeExample, ComplexityMetrics, DEFAULT_CODE_LANGUAGE, ExceptionInfo, MemberInfo, MemberType,
    ParameterInfo,
};
use crate::perf::StringInternCache;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Build the stored document for a record.
pub fn to_fields(member: &MemberInfo) -> FieldSet {
    let mut out = FieldSet::with_capacity(32);
    write_fields(member, &mut out, None);
    out
}

/// Append a record's fields to `out`, sharing repeated low-cardinality values
/// (namespace, assembly, package, framework, ...) through `interner` when given.
pub fn write_fields(member: &MemberInfo, out: &mut FieldSet, interner: Option<&StringInternCache>) {
    let shared = |value: &str| -> Arc<str> {
        match interner {
            Some(cache) => cache.get_or_add(value),
            None => Arc::from(value),
        }
    };

    out.push(f::ID, member.id.as_str());
    out.push(f::MEMBER_TYPE, shared(member.member_type.as_str()));
    out.push(f::NAME, member.name.as_str());
    out.push(f::FULL_NAME, member.full_name.as_str());
    out.push(f::NAMESPACE, shared(&member.namespace));
    out.push(f::ASSEMBLY, shared(&member.assembly));
    if let Some(owner) = member.declaring_type() {
        out.push(f::DECLARING_TYPE, owner);
    }

    for (field, value) in [
        (f::SUMMARY, &member.summary),
        (f::REMARKS, &member.remarks),
        (f::RETURNS, &member.returns),
        (f::SEE_ALSO, &member.see_also),
    ] {
        if let Some(value) = value {
            out.push(field, value.as_str());
        }
    }
    out.push(f::CONTENT, searchable_content(member));

    for param in &member.parameters {
        out.push(f::PARAMETER, param.signature());
        out.push(
            f::PARAMETER_DESCRIPTION,
            param.description.as_deref().unwrap_or_default(),
        );
    }
    push_json(out, f::PARAMETERS_JSON, &member.parameters);

    for example in &member.code_examples {
        out.push(f::CODE_EXAMPLE, example.code.as_str());
        out.push(
            f::CODE_EXAMPLE_DESCRIPTION,
            example.description.as_deref().unwrap_or_default(),
        );
        out.push(f::CODE_EXAMPLE_LANGUAGE, shared(&example.language));
    }
    push_json(out, f::CODE_EXAMPLES_JSON, &member.code_examples);

    for exception in &member.exceptions {
        out.push(f::EXCEPTION, shared(&exception.type_name));
        out.push(
            f::EXCEPTION_CONDITION,
            exception.condition.as_deref().unwrap_or_default(),
        );
    }
    push_json(out, f::EXCEPTIONS_JSON, &member.exceptions);

    if let Some(metrics) = &member.complexity {
        out.push(f::PARAMETER_COUNT, metrics.parameter_count.to_string());
        out.push(
            f::CYCLOMATIC_COMPLEXITY,
            metrics.cyclomatic_complexity.to_string(),
        );
        out.push(
            f::DOCUMENTATION_LINE_COUNT,
            metrics.documentation_line_count.to_string(),
        );
    }

    // The engine has no notion of an absent value, so provenance is always written.
    for (field, value) in [
        (f::PACKAGE_ID, &member.package_id),
        (f::PACKAGE_VERSION, &member.package_version),
        (f::TARGET_FRAMEWORK, &member.target_framework),
    ] {
        out.push(field, shared(value.as_deref().unwrap_or_default()));
    }
    out.push(
        f::IS_FROM_NUGET_CACHE,
        shared(if member.is_from_nuget_cache { "true" } else { "false" }),
    );
    out.push(
        f::SOURCE_FILE_PATH,
        member.source_file_path.as_deref().unwrap_or_default(),
    );
}

/// Rebuild a record from a stored document.
///
/// Returns `None` when `id` or `memberType` is missing or `memberType` is not a
/// known kind; such documents are foreign or corrupt and are skipped by callers.
pub fn from_fields(doc: &FieldSet) -> Option<MemberInfo> {
    let id = doc.get(f::ID).filter(|id| !id.is_empty())?;
    let member_type: MemberType = doc.get(f::MEMBER_TYPE)?.parse().ok()?;

    let text = |field: &str| doc.get(field).unwrap_or_default().to_string();
    let optional = |field: &str| doc.get(field).map(str::to_string);
    let non_empty = |field: &str| {
        doc.get(field)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let mut member = MemberInfo::new(id, member_type, text(f::NAME), text(f::FULL_NAME));
    member.namespace = text(f::NAMESPACE);
    member.assembly = text(f::ASSEMBLY);
    member.summary = optional(f::SUMMARY);
    member.remarks = optional(f::REMARKS);
    member.returns = optional(f::RETURNS);
    member.see_also = optional(f::SEE_ALSO);

    member.parameters = read_json(doc, f::PARAMETERS_JSON).unwrap_or_else(|| zip_parameters(doc));
    member.code_examples =
        read_json(doc, f::CODE_EXAMPLES_JSON).unwrap_or_else(|| zip_code_examples(doc));
    member.exceptions = read_json(doc, f::EXCEPTIONS_JSON).unwrap_or_else(|| zip_exceptions(doc));
    member.complexity = read_complexity(doc);

    member.package_id = non_empty(f::PACKAGE_ID);
    member.package_version = non_empty(f::PACKAGE_VERSION);
    member.target_framework = non_empty(f::TARGET_FRAMEWORK);
    member.source_file_path = non_empty(f::SOURCE_FILE_PATH);
    member.is_from_nuget_cache = doc
        .get(f::IS_FROM_NUGET_CACHE)
        .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("true"));

    Some(member)
}

fn searchable_content(member: &MemberInfo) -> String {
    [
        Some(member.name.as_str()),
        member.summary.as_deref(),
        member.remarks.as_deref(),
        member.returns.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join("\n")
}

fn push_json<T: serde::Serialize>(out: &mut FieldSet, field: &'static str, items: &[T]) {
    if items.is_empty() {
        return;
    }
    match serde_json::to_string(items) {
        Ok(json) => out.push(field, json),
        Err(e) => tracing::warn!("Failed to encode {}: {}", field, e),
    }
}

fn read_json<T: DeserializeOwned>(doc: &FieldSet, field: &str) -> Option<Vec<T>> {
    let raw = doc.get(field).filter(|raw| !raw.is_empty())?;
    serde_json::from_str(raw).ok()
}

/// Description at `index`, treating missing and empty entries as absent.
fn nth_description(values: &[&str], index: usize) -> Option<String> {
    values
        .get(index)
        .filter(|value| !value.is_empty())
        .map(|value| (*value).to_string())
}

fn zip_parameters(doc: &FieldSet) -> Vec<ParameterInfo> {
    let descriptions: Vec<&str> = doc.get_all(f::PARAMETER_DESCRIPTION).collect();
    doc.get_all(f::PARAMETER)
        .enumerate()
        .map(|(position, signature)| {
            let (type_name, name) = signature
                .trim()
                .rsplit_once(' ')
                .unwrap_or(("", signature.trim()));
            ParameterInfo {
                description: nth_description(&descriptions, position),
                ..ParameterInfo::new(name, type_name.trim_end(), position)
            }
        })
        .collect()
}

fn zip_code_examples(doc: &FieldSet) -> Vec<CodeExample> {
    let descriptions: Vec<&str> = doc.get_all(f::CODE_EXAMPLE_DESCRIPTION).collect();
    let languages: Vec<&str> = doc.get_all(f::CODE_EXAMPLE_LANGUAGE).collect();
    doc.get_all(f::CODE_EXAMPLE)
        .enumerate()
        .map(|(i, code)| CodeExample {
            description: nth_description(&descriptions, i),
            code: code.to_string(),
            language: nth_description(&languages, i)
                .unwrap_or_else(|| DEFAULT_CODE_LANGUAGE.to_string()),
        })
        .collect()
}

fn zip_exceptions(doc: &FieldSet) -> Vec<ExceptionInfo> {
    let conditions: Vec<&str> = doc.get_all(f::EXCEPTION_CONDITION).collect();
    doc.get_all(f::EXCEPTION)
        .enumerate()
        .map(|(i, type_name)| ExceptionInfo::new(type_name, nth_description(&conditions, i)))
        .collect()
}

/// All three metrics must parse; partial data is not surfaced.
fn read_complexity(doc: &FieldSet) -> Option<ComplexityMetrics> {
    let number = |field: &str| doc.get(field)?.trim().parse::<u32>().ok();
    Some(ComplexityMetrics {
        parameter_count: number(f::PARAMETER_COUNT)?,
        cyclomatic_complexity: number(f::CYCLOMATIC_COMPLEXITY)?,
        documentation_line_count: number(f::DOCUMENTATION_LINE_COUNT)?,
    })
}
