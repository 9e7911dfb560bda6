//! Shared fixtures for integration tests.
//!
//! The corpus mixes a framework assembly (`System.Runtime`) shipped for several
//! target frameworks with a NuGet package (`Newtonsoft.Json`), so queries and
//! deduplication both have something to bite on.
//!
//! Every query test runs against both backends through [`Backend`]:
//! ```ignore
//! #[rstest]
//! fn my_test(#[values(Backend::Memory, Backend::Tantivy)] backend: Backend) {
//!     let engine = backend.engine(&corpus());
//! }
//! ```

#![allow(dead_code)] // Helpers used across different integration test crates

use dotnet_docs::index::{BulkIndexer, DocumentSink, InMemoryIndex, SearchIndex, TantivyIndex};
use dotnet_docs::model::{
    CodeExample, ComplexityMetrics, ExceptionInfo, MemberInfo, MemberType, ParameterInfo,
};
use dotnet_docs::query::QueryEngine;
use std::collections::BTreeSet;
use std::sync::Arc;

pub const WRITER_MEMORY: usize = 15_000_000;

pub const RUNTIME_FRAMEWORKS: [&str; 4] = ["net6.0", "net8.0", "net9.0", "netstandard2.0"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Tantivy,
}

impl Backend {
    pub fn index(self, members: &[MemberInfo]) -> Arc<dyn SearchIndex> {
        match self {
            Backend::Memory => {
                let index = Arc::new(InMemoryIndex::new());
                load(index.as_ref(), members);
                index
            }
            Backend::Tantivy => {
                let index = Arc::new(TantivyIndex::create_in_ram(WRITER_MEMORY).unwrap());
                load(index.as_ref(), members);
                index
            }
        }
    }

    pub fn engine(self, members: &[MemberInfo]) -> QueryEngine {
        QueryEngine::new(self.index(members))
    }
}

pub fn load(sink: &dyn DocumentSink, members: &[MemberInfo]) {
    let indexer = BulkIndexer::new(sink, 8, 1_000);
    let count = indexer.index_all(members).unwrap();
    assert_eq!(count, members.len());
}

pub fn ids(members: &[MemberInfo]) -> BTreeSet<String> {
    members.iter().map(|m| m.id.clone()).collect()
}

fn member(
    id: &str,
    member_type: MemberType,
    name: &str,
    full_name: &str,
    namespace: &str,
    assembly: &str,
) -> MemberInfo {
    let mut m = MemberInfo::new(id, member_type, name, full_name);
    m.namespace = namespace.to_string();
    m.assembly = assembly.to_string();
    m
}

fn complexity(parameter_count: u32, cyclomatic_complexity: u32) -> ComplexityMetrics {
    ComplexityMetrics {
        parameter_count,
        cyclomatic_complexity,
        documentation_line_count: 4,
    }
}

/// `System.String` and `String.Join`, one copy per framework in [`RUNTIME_FRAMEWORKS`].
pub fn runtime_members() -> Vec<MemberInfo> {
    let mut out = Vec::new();
    for framework in RUNTIME_FRAMEWORKS {
        let mut string = member(
            "T:System.String",
            MemberType::Type,
            "String",
            "System.String",
            "System",
            "System.Runtime",
        );
        string.summary = Some("Represents text as a sequence of UTF-16 code units.".into());
        string.target_framework = Some(framework.into());
        out.push(string);

        let mut join = member(
            "M:System.String.Join(System.String,System.String[])",
            MemberType::Method,
            "Join",
            "System.String.Join(System.String,System.String[])",
            "System",
            "System.Runtime",
        );
        join.summary = Some(
            "Concatenates all the elements of a string array, using the specified separator."
                .into(),
        );
        join.returns = Some("A string that consists of the joined elements.".into());
        join.parameters = vec![
            ParameterInfo {
                description: Some("The string to use as a separator.".into()),
                ..ParameterInfo::new("separator", "System.String", 0)
            },
            ParameterInfo {
                description: Some("An array that contains the elements to concatenate.".into()),
                is_params: true,
                ..ParameterInfo::new("value", "System.String[]", 1)
            },
        ];
        join.exceptions = vec![ExceptionInfo::new(
            "T:System.ArgumentNullException",
            Some("value is null.".into()),
        )];
        join.complexity = Some(complexity(2, 3));
        join.target_framework = Some(framework.into());
        out.push(join);
    }
    out
}

/// `Newtonsoft.Json` members as restored into a NuGet cache.
pub fn newtonsoft_members() -> Vec<MemberInfo> {
    let with_package = |mut m: MemberInfo| {
        m.package_id = Some("Newtonsoft.Json".into());
        m.package_version = Some("13.0.3".into());
        m.target_framework = Some("net6.0".into());
        m.is_from_nuget_cache = true;
        m.source_file_path = Some(
            "/home/dev/.nuget/packages/newtonsoft.json/13.0.3/lib/net6.0/Newtonsoft.Json.xml"
                .into(),
        );
        m
    };

    let convert = with_package(member(
        "T:Newtonsoft.Json.JsonConvert",
        MemberType::Type,
        "JsonConvert",
        "Newtonsoft.Json.JsonConvert",
        "Newtonsoft.Json",
        "Newtonsoft.Json",
    ));

    let mut serialize = with_package(member(
        "M:Newtonsoft.Json.JsonConvert.SerializeObject(System.Object)",
        MemberType::Method,
        "SerializeObject",
        "Newtonsoft.Json.JsonConvert.SerializeObject(System.Object)",
        "Newtonsoft.Json",
        "Newtonsoft.Json",
    ));
    serialize.summary = Some("Serializes the specified object to a JSON string.".into());
    serialize.parameters = vec![ParameterInfo::new("value", "System.Object", 0)];
    serialize.code_examples = vec![CodeExample {
        description: Some("Serialize a product".into()),
        ..CodeExample::new("string json = JsonConvert.SerializeObject(product);")
    }];
    serialize.complexity = Some(complexity(1, 1));

    let mut deserialize = with_package(member(
        "M:Newtonsoft.Json.JsonConvert.DeserializeObject(System.String,System.Type,Newtonsoft.Json.JsonSerializerSettings)",
        MemberType::Method,
        "DeserializeObject",
        "Newtonsoft.Json.JsonConvert.DeserializeObject(System.String,System.Type,Newtonsoft.Json.JsonSerializerSettings)",
        "Newtonsoft.Json",
        "Newtonsoft.Json",
    ));
    deserialize.summary = Some("Deserializes the JSON to the specified .NET type.".into());
    deserialize.parameters = vec![
        ParameterInfo::new("value", "System.String", 0),
        ParameterInfo::new("type", "System.Type", 1),
        ParameterInfo {
            is_optional: true,
            ..ParameterInfo::new("settings", "Newtonsoft.Json.JsonSerializerSettings", 2)
        },
    ];
    deserialize.exceptions = vec![ExceptionInfo::new(
        "T:Newtonsoft.Json.JsonReaderException",
        Some("The JSON is malformed.".into()),
    )];
    deserialize.code_examples = vec![CodeExample::new(
        "Product p = (Product)JsonConvert.DeserializeObject(json, typeof(Product), settings);",
    )];
    deserialize.complexity = Some(complexity(3, 12));

    let mut linq = with_package(member(
        "T:Newtonsoft.Json.Linq.JObject",
        MemberType::Type,
        "JObject",
        "Newtonsoft.Json.Linq.JObject",
        "Newtonsoft.Json.Linq",
        "Newtonsoft.Json",
    ));
    linq.summary = Some("Represents a JSON object.".into());

    vec![convert, serialize, deserialize, linq]
}

pub fn corpus() -> Vec<MemberInfo> {
    let mut all = runtime_members();
    all.extend(newtonsoft_members());
    all
}
