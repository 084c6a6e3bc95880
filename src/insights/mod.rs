// src/insights/mod.rs
pub mod metrics;
pub mod period;
pub mod store;

pub use metrics::{compute_summary_metrics, SummaryMetrics};
pub use period::{period_label_from_filename, SortKey};
pub use store::{InsightRecord, InsightStore, IssuerRollup, RollupEntry};
