//! `dotnet-docs.toml` configuration.

use crate::error::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "dotnet-docs.toml";
pub const INDEX_PATH_ENV: &str = "DOTNET_DOCS_INDEX";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tantivy index directory. `~` is expanded.
    pub index_path: PathBuf,
    pub default_max_results: usize,
    /// Collapse per-framework copies of a member in query output.
    pub deduplicate: bool,
    pub pool_max_size: usize,
    pub intern_cache_max_size: usize,
    /// Tantivy writer heap budget.
    pub writer_memory_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
            default_max_results: 25,
            deduplicate: true,
            pool_max_size: 64,
            intern_cache_max_size: 10_000,
            writer_memory_bytes: 50_000_000,
        }
    }
}

fn default_index_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dotnet-docs")
        .join("index")
}

impl Config {
    /// Load from `path` if given (it must exist), else `./dotnet-docs.toml` if
    /// present, else defaults. `DOTNET_DOCS_INDEX` overrides `index_path`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.is_file() {
                    Self::from_file(local)?
                } else {
                    tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                    Self::default()
                }
            }
        };

        if let Some(index) = std::env::var_os(INDEX_PATH_ENV).filter(|v| !v.is_empty()) {
            config.index_path = PathBuf::from(index);
        }
        let index_path = std::mem::take(&mut config.index_path);
        config.set_index_path(&index_path);
        Ok(config)
    }

    /// Point at another index directory, expanding a leading `~`.
    pub fn set_index_path(&mut self, path: &Path) {
        self.index_path = expand_tilde(path).into_owned();
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.default_max_results == 0 {
            anyhow::bail!("default_max_results must be greater than zero");
        }
        Ok(config)
    }
}

/// `~/x` becomes `<home>/x`; anything else is returned unchanged.
fn expand_tilde(path: &Path) -> Cow<'_, Path> {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.join(rest));
    }
    Cow::Borrowed(path)
}
