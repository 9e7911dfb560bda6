//! Content hashing and discovery of XML documentation files.
//!
//! Hashes let a caller skip re-indexing documentation files that have not changed
//! since the last run.

use crate::error::Result;
use anyhow::Context;
use ignore::WalkBuilder;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use xxhash_rust::xxh3::xxh3_64;

/// 64-bit xxh3 digest of a file's bytes, displayed and serialized as 16 hex digits.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ContentHash(u64);

impl ContentHash {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(xxh3_64(bytes))
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for ContentHash {
    type Err = ParseHashError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 16 {
            return Err(ParseHashError::InvalidLength(s.len()));
        }
        u64::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| ParseHashError::InvalidHex)
    }
}

impl Serialize for ContentHash {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseHashError {
    InvalidHex,
    /// Expected exactly 16 hex digits.
    InvalidLength(usize),
}

impl fmt::Display for ParseHashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseHashError::InvalidHex => {
                write!(f, "invalid hexadecimal characters in hash string")
            }
            ParseHashError::InvalidLength(len) => {
                write!(f, "invalid hash length: expected 16 hex characters, got {}", len)
            }
        }
    }
}

impl std::error::Error for ParseHashError {}

pub fn hash_file(path: &Path) -> Result<ContentHash> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file {}", path.display()))?;
    Ok(ContentHash::of_bytes(&bytes))
}

pub async fn hash_file_async(path: &Path) -> Result<ContentHash> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file {}", path.display()))?;
    Ok(ContentHash::of_bytes(&bytes))
}

/// All `*.xml` files under `root`, sorted by path. Honors `.gitignore`-style rules.
pub fn discover_doc_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Discover and hash every documentation file under `root` off the async runtime.
/// Files that disappear or cannot be read mid-walk are logged and skipped.
pub async fn fingerprint_doc_files(root: &Path) -> Result<Vec<(PathBuf, ContentHash)>> {
    let root = root.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let files = discover_doc_files(&root)?;
        let mut hashed = Vec::with_capacity(files.len());
        for path in files {
            match hash_file(&path) {
                Ok(hash) => hashed.push((path, hash)),
                Err(e) => tracing::warn!("{:#}", e),
            }
        }
        tracing::debug!("Hashed {} documentation files under {}", hashed.len(), root.display());
        Ok(hashed)
    })
    .await
    .context("Task panicked")?
}
