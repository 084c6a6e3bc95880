//! inspect_rollup: print one issuer's cached rollup as a quarter-by-quarter
//! summary with a proportional value bar per period. Read-only consumer of
//! the insight cache.

use anyhow::Result;
use edgarscraper::{config::Config, insights::InsightStore};
use std::{env, process::exit};

const BAR_WIDTH: f64 = 40.0;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <ISSUER>", args[0]);
        exit(1);
    }
    if let Err(e) = inspect(&args[1]) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

fn inspect(issuer: &str) -> Result<()> {
    let store = InsightStore::new(Config::default());
    let rollup = store.load_rollup(issuer)?;

    println!(
        "=== Issuer: {} ({} periods) ===",
        rollup.issuer,
        rollup.periods.len()
    );
    let max_value = rollup
        .periods
        .iter()
        .map(|p| p.record.metrics.sum_value_usd_quarter_end)
        .fold(0.0_f64, f64::max);

    for period in &rollup.periods {
        let m = &period.record.metrics;
        let bar_len = if max_value > 0.0 {
            (m.sum_value_usd_quarter_end / max_value * BAR_WIDTH).round() as usize
        } else {
            0
        };
        println!(
            "{:<12} rows {:>7}  issuers {:>6}  classes {:>5}  value {:>18.2}  {}",
            period.record.quarter_label,
            m.rows,
            m.unique_issuer_name,
            m.unique_class_title,
            m.sum_value_usd_quarter_end,
            "#".repeat(bar_len)
        );
    }
    Ok(())
}
