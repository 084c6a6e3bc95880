// src/insights/store.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::insights::metrics::{compute_summary_metrics, SummaryMetrics};
use crate::insights::period::{period_label_from_filename, SortKey};
use crate::table::{list_period_files, load_infotable};

/// Derived summary for one (issuer, period) pair, as persisted on disk.
/// Recomputing from unchanged source data reproduces the file byte for
/// byte; saves always overwrite, never merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRecord {
    pub issuer: String,
    pub period_filename: String,
    pub quarter_label: String,
    pub year: i32,
    pub quarter: u32,
    pub metrics: SummaryMetrics,
}

/// One rollup entry: the insight record plus its explicit sort key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupEntry {
    #[serde(flatten)]
    pub record: InsightRecord,
    pub sort_key: SortKey,
}

/// All period insights for one issuer, newest quarter first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuerRollup {
    pub issuer: String,
    pub periods: Vec<RollupEntry>,
}

impl IssuerRollup {
    fn empty(issuer: &str) -> Self {
        Self {
            issuer: issuer.to_string(),
            periods: Vec::new(),
        }
    }
}

/// File-backed cache of insight records and per-issuer rollups under the
/// configured cache root. Single-writer model: exactly one logical writer
/// per cache key, no locking.
pub struct InsightStore {
    cfg: Config,
}

impl InsightStore {
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    /// Location of the persisted insight for one (issuer, period).
    pub fn insight_path(&self, issuer: &str, period_filename: &str) -> PathBuf {
        let stem = Path::new(period_filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(period_filename);
        self.cfg
            .issuer_cache_dir(issuer)
            .join(format!("{stem}.json"))
    }

    /// Location of the persisted rollup for one issuer.
    pub fn rollup_path(&self, issuer: &str) -> PathBuf {
        self.cfg.issuer_cache_dir(issuer).join("quarters.json")
    }

    /// Compute and persist the insight record for one period, overwriting
    /// any previous value. Returns where the record was written.
    pub fn save_insight(&self, issuer: &str, period_filename: &str) -> Result<PathBuf> {
        let table = load_infotable(&self.cfg, issuer, period_filename);
        let metrics = compute_summary_metrics(&table);
        let (quarter_label, key) = period_label_from_filename(period_filename);
        let record = InsightRecord {
            issuer: issuer.to_string(),
            period_filename: period_filename.to_string(),
            quarter_label,
            year: key.year,
            quarter: key.quarter,
            metrics,
        };
        let path = self.insight_path(issuer, period_filename);
        write_json(&path, &record)?;
        debug!(issuer, period_filename, path = %path.display(), "saved insight");
        Ok(path)
    }

    /// Read the insight for one period, computing and persisting it first
    /// when absent. Content that cannot be parsed yields `Ok(None)`; this
    /// layer does not attempt repair.
    pub fn load_insight(
        &self,
        issuer: &str,
        period_filename: &str,
    ) -> Result<Option<InsightRecord>> {
        let path = self.insight_path(issuer, period_filename);
        if !path.exists() {
            self.save_insight(issuer, period_filename)?;
        }
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable insight record");
                return Ok(None);
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt insight record");
                Ok(None)
            }
        }
    }

    /// Recompute every period insight for `issuer` and persist the sorted
    /// rollup, overwriting any previous value.
    #[tracing::instrument(level = "info", skip(self))]
    pub fn rebuild_rollup(&self, issuer: &str) -> Result<PathBuf> {
        let files = list_period_files(&self.cfg, issuer);
        let mut periods = Vec::with_capacity(files.len());
        for period_filename in &files {
            self.save_insight(issuer, period_filename)?;
            let Some(record) = self.load_insight(issuer, period_filename)? else {
                warn!(issuer, period = %period_filename, "skipping unreadable insight");
                continue;
            };
            let (_, sort_key) = period_label_from_filename(period_filename);
            periods.push(RollupEntry { record, sort_key });
        }
        // Newest first; (0, 0) fallback keys land at the end.
        periods.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
        let rollup = IssuerRollup {
            issuer: issuer.to_string(),
            periods,
        };
        let path = self.rollup_path(issuer);
        write_json(&path, &rollup)?;
        info!(issuer, periods = rollup.periods.len(), "rebuilt rollup");
        Ok(path)
    }

    /// Read the rollup for one issuer, building it when absent. A rollup
    /// file that cannot be parsed gets one forced rebuild; if even that
    /// cannot be read back, the result degrades to an empty rollup instead
    /// of an error.
    pub fn load_rollup(&self, issuer: &str) -> Result<IssuerRollup> {
        let path = self.rollup_path(issuer);
        if !path.exists() {
            self.rebuild_rollup(issuer)?;
        }
        if let Some(rollup) = read_rollup(&path) {
            return Ok(rollup);
        }
        warn!(issuer, path = %path.display(), "rollup unreadable; rebuilding");
        if let Err(e) = self.rebuild_rollup(issuer) {
            warn!(issuer, error = %e, "rollup rebuild failed");
        }
        Ok(read_rollup(&path).unwrap_or_else(|| IssuerRollup::empty(issuer)))
    }
}

fn read_rollup(path: &Path) -> Option<IssuerRollup> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

/// Write `value` as pretty-printed JSON, creating parent directories as
/// needed.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating cache directory {:?}", parent))?;
    }
    let body = serde_json::to_string_pretty(value).context("serializing cache record")?;
    fs::write(path, body).with_context(|| format!("writing cache file {:?}", path))?;
    Ok(())
}
