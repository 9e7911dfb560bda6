//! `dotnet-docs` command line.

use crate::config::Config;
use crate::dedup::Deduplicator;
use crate::error::Result;
use crate::fingerprint;
use crate::index::{BulkIndexer, SearchIndex, TantivyIndex};
use crate::model::{MemberInfo, MemberType};
use crate::nuget::PackageLocation;
use crate::query::{QueryEngine, SearchFilters};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "dotnet-docs")]
#[command(about = "Query indexed .NET XML API documentation", long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./dotnet-docs.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Index directory, overriding the config file
    #[arg(long, global = true, env = "DOTNET_DOCS_INDEX")]
    pub index: Option<PathBuf>,

    /// Maximum number of results
    #[arg(short = 'n', long, global = true)]
    pub limit: Option<usize>,

    /// Show every framework build instead of one record per member
    #[arg(long, global = true)]
    pub no_dedup: bool,

    /// Print JSON instead of one line per record
    #[arg(long, global = true)]
    pub json: bool,

    /// Log at DEBUG
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Members with this exact simple name
    Name { name: String },
    /// Full-text search over names and documentation
    Content { text: String },
    /// Members in a namespace
    Namespace { namespace: String },
    /// Members in namespaces matching a `*`/`?` pattern
    Pattern { pattern: String },
    /// Members defined in an assembly
    Assembly { assembly: String },
    /// Types defined in an assembly
    Types { assembly: String },
    /// Members shipped in a NuGet package
    Package { package_id: String },
    /// Members declared on a type
    Declaring { type_name: String },
    /// Members documented to throw an exception type
    Exception { exception_type: String },
    /// Members with code examples
    Examples,
    /// Members whose code examples contain the given code
    Code { code: String },
    /// Look up one member by documentation ID (e.g. `M:System.String.Join`)
    Id { id: String },
    /// Members whose parameter count lies in `[min, max]`
    Params { min: i64, max: i64 },
    /// Members with cyclomatic complexity of at least `min`
    Complex { min: i64 },
    /// Combined filters; all given filters must match
    Filter {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        namespace: Option<String>,
        #[arg(long)]
        kind: Option<MemberType>,
        #[arg(long)]
        assembly: Option<String>,
        #[arg(long)]
        package: Option<String>,
        #[arg(long)]
        framework: Option<String>,
    },
    /// Index size and shape
    Stats,
    /// List documentation files under a directory with hashes and package info
    Scan { dir: PathBuf },
    /// Index records from a JSON array produced by a doc-comment parser
    Import {
        file: PathBuf,
        /// Indexing threads
        #[arg(long, default_value_t = 1)]
        workers: usize,
    },
}

/// Resolved settings shared by every command.
struct Session {
    config: Config,
    limit: usize,
    dedup: Deduplicator,
    json: bool,
}

impl Session {
    fn new(cli: &Cli) -> Result<Self> {
        let mut config = Config::load(cli.config.as_deref())?;
        if let Some(index) = &cli.index {
            config.set_index_path(index);
        }
        let limit = cli.limit.unwrap_or(config.default_max_results);
        let dedup = Deduplicator::default().with_enabled(config.deduplicate && !cli.no_dedup);
        Ok(Self {
            config,
            limit,
            dedup,
            json: cli.json,
        })
    }

    fn open_index(&self) -> Result<Arc<TantivyIndex>> {
        let index = TantivyIndex::open_or_create(&self.config.index_path, self.config.writer_memory_bytes)?;
        Ok(Arc::new(index))
    }

    fn engine(&self) -> Result<QueryEngine> {
        let index: Arc<dyn SearchIndex> = self.open_index()?;
        Ok(QueryEngine::new(index))
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let session = Session::new(&cli)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Stats => {
            let engine = session.engine()?;
            let stats = engine.statistics()?;
            match stats {
                Some(stats) if session.json => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
                }
                Some(stats) => {
                    writeln!(out, "Index:     {}", stats.index_path)?;
                    writeln!(out, "Documents: {}", stats.document_count)?;
                    writeln!(out, "Fields:    {}", stats.field_count)?;
                    writeln!(out, "Files:     {}", stats.file_count)?;
                    writeln!(out, "Size:      {} bytes", stats.total_size_in_bytes)?;
                }
                None => writeln!(out, "No index at {}", session.config.index_path.display())?,
            }
        }
        Commands::Scan { dir } => {
            let files = fingerprint::fingerprint_doc_files(&dir).await?;
            for (path, hash) in files {
                match PackageLocation::from_path(&path) {
                    Some(loc) => writeln!(
                        out,
                        "{}  {}  {} {} {}",
                        hash,
                        path.display(),
                        loc.package_id,
                        loc.version,
                        loc.target_framework
                    )?,
                    None => writeln!(out, "{}  {}", hash, path.display())?,
                }
            }
        }
        Commands::Import { file, workers } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let members: Vec<MemberInfo> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse records from {}", file.display()))?;

            let index = session.open_index()?;
            let indexer = BulkIndexer::new(
                index.as_ref(),
                session.config.pool_max_size,
                session.config.intern_cache_max_size,
            );
            let count = indexer.index_parallel(&members, workers)?;
            writeln!(out, "Indexed {} records into {}", count, session.config.index_path.display())?;
        }
        command => {
            let engine = session.engine()?;
            let members = query(&engine, command, session.limit)?;
            let original = members.len();
            let members = session.dedup.deduplicate(members);
            tracing::debug!("{} results, {} after deduplication", original, members.len());
            print_members(&mut out, &members, session.json)?;
        }
    }

    Ok(())
}

fn query(engine: &QueryEngine, command: Commands, limit: usize) -> Result<Vec<MemberInfo>> {
    let members = match command {
        Commands::Name { name } => engine.search_by_name(&name, limit)?,
        Commands::Content { text } => engine.search_content(&text, limit)?,
        Commands::Namespace { namespace } => engine.search_by_namespace(&namespace, limit)?,
        Commands::Pattern { pattern } => engine.search_by_namespace_pattern(&pattern, limit)?,
        Commands::Assembly { assembly } => engine.search_by_assembly(&assembly, limit)?,
        Commands::Types { assembly } => engine.list_types_from_assembly(&assembly, limit)?,
        Commands::Package { package_id } => engine.search_by_package(&package_id, limit)?,
        Commands::Declaring { type_name } => engine.search_by_declaring_type(&type_name, limit)?,
        Commands::Exception { exception_type } => {
            engine.search_by_exception(&exception_type, limit)?
        }
        Commands::Examples => engine.get_methods_with_examples(limit)?,
        Commands::Code { code } => engine.search_code_examples(&code, limit)?,
        Commands::Id { id } => engine.get_by_id(&id)?.into_iter().collect(),
        Commands::Params { min, max } => engine.get_by_parameter_count(min, max, limit)?,
        Commands::Complex { min } => engine.get_complex_methods(min, limit)?,
        Commands::Filter {
            query,
            namespace,
            kind,
            assembly,
            package,
            framework,
        } => {
            let filters = SearchFilters {
                query,
                namespace,
                member_type: kind,
                assembly,
                package_id: package,
                target_framework: framework,
            };
            engine.search_with_filters(&filters, limit)?
        }
        Commands::Stats | Commands::Scan { .. } | Commands::Import { .. } => Vec::new(),
    };
    Ok(members)
}

fn print_members(out: &mut impl Write, members: &[MemberInfo], json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(members)?)?;
        return Ok(());
    }
    for member in members {
        writeln!(out, "{}", format_line(member))?;
    }
    Ok(())
}

/// `Method  System.String.Join(...)  [net9.0, net8.0]  System.Runtime`
fn format_line(member: &MemberInfo) -> String {
    let mut line = format!("{:<11} {}", member.member_type, member.full_name);
    if let Some(framework) = member.framework() {
        line.push_str(&format!("  [{}]", framework));
    }
    if !member.assembly.is_empty() {
        line.push_str("  ");
        line.push_str(&member.assembly);
    }
    if let Some(summary) = member.summary.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let first = summary.lines().next().unwrap_or(summary);
        line.push_str("  - ");
        line.push_str(first);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_parse_query_command() {
        let cli = Cli::parse_from(["dotnet-docs", "-n", "5", "--no-dedup", "name", "Join"]);
        check!(cli.limit == Some(5));
        check!(cli.no_dedup);
        let_assert!(Commands::Name { name } = cli.command);
        check!(name == "Join");
    }

    #[test]
    fn test_index_flag_expands_tilde() {
        let cli = Cli::parse_from(["dotnet-docs", "--index", "~/docs-index", "stats"]);
        let session = Session::new(&cli).unwrap();
        if let Some(home) = dirs::home_dir() {
            check!(session.config.index_path == home.join("docs-index"));
        }
    }

    #[test]
    fn test_parse_filter_kind() {
        let cli = Cli::parse_from([
            "dotnet-docs",
            "filter",
            "--kind",
            "method",
            "--namespace",
            "System.*",
            "--json",
        ]);
        check!(cli.json);
        let_assert!(Commands::Filter { kind, namespace, query, .. } = cli.command);
        check!(kind == Some(MemberType::Method));
        check!(namespace.as_deref() == Some("System.*"));
        check!(query.is_none());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let_assert!(Err(_) = Cli::try_parse_from(["dotnet-docs", "filter", "--kind", "widget"]));
    }

    #[test]
    fn test_params_accept_ranges() {
        let cli = Cli::parse_from(["dotnet-docs", "params", "1", "3"]);
        let_assert!(Commands::Params { min: 1, max: 3 } = cli.command);
    }

    #[test]
    fn test_format_line() {
        let mut member = MemberInfo::new(
            "M:System.String.Join(System.String,System.String[])",
            MemberType::Method,
            "Join",
            "System.String.Join(System.String,System.String[])",
        );
        member.assembly = "System.Runtime".into();
        member.target_framework = Some("net9.0, net8.0".into());
        member.summary = Some("\n  Concatenates strings.\n  More text.".into());
        check!(
            format_line(&member)
                == "Method      System.String.Join(System.String,System.String[])  [net9.0, net8.0]  System.Runtime  - Concatenates strings."
        );
    }

    #[test]
    fn test_print_members_json() {
        let member = MemberInfo::new("T:Foo", MemberType::Type, "Foo", "Foo");
        let mut buffer = Vec::new();
        print_members(&mut buffer, &[member], true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        check!(value[0]["id"] == "T:Foo");
        check!(value[0]["memberType"] == "Type");
    }
}
