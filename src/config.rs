// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem roots for the pipeline. Every component takes a `Config` at
/// construction time, so tests can point the whole stack at temporary
/// directories instead of the production tree.
#[derive(Debug, Clone)]
pub struct Config {
    /// Per-issuer directories of extracted 13F-HR information tables (`.xlsx`).
    pub table_root: PathBuf,
    /// Per-issuer directories of derived JSON insight records.
    pub cache_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_root: PathBuf::from("data/extracted_13F_HR"),
            cache_root: PathBuf::from("data/insights"),
        }
    }
}

impl Config {
    pub fn new(table_root: impl Into<PathBuf>, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            table_root: table_root.into(),
            cache_root: cache_root.into(),
        }
    }

    /// Create both root directories if they do not exist yet.
    pub fn ensure_roots(&self) -> Result<()> {
        for dir in [&self.table_root, &self.cache_root] {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating directory {:?}", dir))?;
        }
        Ok(())
    }

    pub fn issuer_table_dir(&self, issuer: &str) -> PathBuf {
        self.table_root.join(issuer)
    }

    pub fn issuer_cache_dir(&self, issuer: &str) -> PathBuf {
        self.cache_root.join(issuer)
    }
}

/// One scrape target: an issuer name and the index page listing its
/// period spreadsheet files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuerFeed {
    pub issuer: String,
    pub index_url: String,
}

/// Load the list of issuer feeds from a YAML file.
pub fn load_feeds(path: impl AsRef<Path>) -> Result<Vec<IssuerFeed>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading feeds file {:?}", path))?;
    let feeds: Vec<IssuerFeed> = serde_yaml::from_str(&raw)
        .with_context(|| format!("parsing feeds file {:?}", path))?;
    Ok(feeds)
}
