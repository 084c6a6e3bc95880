// src/insights/metrics.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::table::HoldingsTable;

/// Aggregate statistics derived from one holdings table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub rows: u64,
    pub unique_issuer_name: u64,
    pub unique_class_title: u64,
    pub sum_value_usd_quarter_end: f64,
    pub unique_other_manager_seq: u64,
}

/// Compute summary metrics for a holdings table. Pure and deterministic:
/// the same table always yields the same record. An empty table yields all
/// zeros; value cells that are missing or fail to parse as numbers
/// contribute zero to the sum; distinct counts skip empty cells; a missing
/// column counts as zero for its field.
pub fn compute_summary_metrics(table: &HoldingsTable) -> SummaryMetrics {
    if table.is_empty() {
        return SummaryMetrics::default();
    }
    SummaryMetrics {
        rows: table.rows.len() as u64,
        unique_issuer_name: distinct(table, "issuer_name"),
        unique_class_title: distinct(table, "class_title"),
        sum_value_usd_quarter_end: table
            .column("value_usd_quarter_end")
            .map(|col| col.map(|v| v.as_number_or_zero()).sum())
            .unwrap_or(0.0),
        unique_other_manager_seq: distinct(table, "other_manager_seq"),
    }
}

fn distinct(table: &HoldingsTable, column: &str) -> u64 {
    match table.column(column) {
        Some(col) => col.filter_map(|v| v.as_key()).collect::<BTreeSet<_>>().len() as u64,
        None => 0,
    }
}
