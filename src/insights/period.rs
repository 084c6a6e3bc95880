// src/insights/period.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sortable (year, quarter) key for one filing period. Orders
/// lexicographically, so descending sorts put the newest quarter first and
/// the `(0, 0)` fallback for malformed identifiers last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SortKey {
    pub year: i32,
    pub quarter: u32,
}

impl SortKey {
    /// Key assigned to identifiers whose date prefix cannot be parsed.
    pub const NONE: SortKey = SortKey { year: 0, quarter: 0 };
}

/// Map a period filename like `20230331.xlsx` to a human-readable quarter
/// label and a sort key. The first six characters of the file stem encode
/// `YYYYMM`. Any identifier that does not parse falls back to the raw stem
/// and `SortKey::NONE`; this function never fails.
pub fn period_label_from_filename(filename: &str) -> (String, SortKey) {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string();
    match parse_yyyymm(&stem) {
        Some(key) => (format!("{}-Q{}", key.year, key.quarter), key),
        None => (stem, SortKey::NONE),
    }
}

fn parse_yyyymm(stem: &str) -> Option<SortKey> {
    let year: i32 = stem.get(..4)?.parse().ok()?;
    let month: u32 = stem.get(4..6)?.parse().ok()?;
    // Rejects month 0 and 13+; the day part of the stem is irrelevant here.
    NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(SortKey {
        year,
        quarter: (month - 1) / 3 + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_valid_quarter_ends() {
        assert_eq!(
            period_label_from_filename("20230331.xlsx"),
            ("2023-Q1".to_string(), SortKey { year: 2023, quarter: 1 })
        );
        assert_eq!(
            period_label_from_filename("20230630.xlsx"),
            ("2023-Q2".to_string(), SortKey { year: 2023, quarter: 2 })
        );
        assert_eq!(
            period_label_from_filename("20231231.xlsx"),
            ("2023-Q4".to_string(), SortKey { year: 2023, quarter: 4 })
        );
    }

    #[test]
    fn every_month_lands_in_the_right_quarter() {
        for (month, quarter) in (1..=12).map(|m| (m, (m - 1) / 3 + 1)) {
            let name = format!("2024{:02}15.xlsx", month);
            let (label, key) = period_label_from_filename(&name);
            assert_eq!(label, format!("2024-Q{}", quarter));
            assert_eq!(key, SortKey { year: 2024, quarter });
        }
    }

    #[test]
    fn non_numeric_prefix_falls_back_to_stem() {
        assert_eq!(
            period_label_from_filename("abcdef.xlsx"),
            ("abcdef".to_string(), SortKey::NONE)
        );
    }

    #[test]
    fn out_of_range_month_falls_back_to_stem() {
        assert_eq!(
            period_label_from_filename("20231301.xlsx"),
            ("20231301".to_string(), SortKey::NONE)
        );
        assert_eq!(
            period_label_from_filename("20230001.xlsx"),
            ("20230001".to_string(), SortKey::NONE)
        );
    }

    #[test]
    fn short_stem_falls_back_to_stem() {
        assert_eq!(
            period_label_from_filename("2023.xlsx"),
            ("2023".to_string(), SortKey::NONE)
        );
    }

    #[test]
    fn fallback_key_sorts_below_any_real_quarter() {
        assert!(SortKey::NONE < SortKey { year: 1999, quarter: 1 });
        assert!(SortKey { year: 2023, quarter: 1 } < SortKey { year: 2023, quarter: 2 });
        assert!(SortKey { year: 2023, quarter: 4 } < SortKey { year: 2024, quarter: 1 });
    }
}
