//! rebuild_insights: force-rebuild cached rollups from the extracted tables.
//!
//! With an issuer argument, rebuilds that issuer's rollup; without one,
//! rebuilds every issuer directory found under the table root.

use anyhow::Result;
use edgarscraper::{config::Config, insights::InsightStore, table};
use std::{env, process::exit};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [ISSUER]", args[0]);
        exit(1);
    }
    if let Err(e) = rebuild(args.get(1).map(String::as_str)) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

fn rebuild(issuer: Option<&str>) -> Result<()> {
    let cfg = Config::default();
    let store = InsightStore::new(cfg.clone());

    let issuers = match issuer {
        Some(one) => vec![one.to_string()],
        None => table::list_issuers(&cfg),
    };
    if issuers.is_empty() {
        println!("no issuers under {}", cfg.table_root.display());
        return Ok(());
    }

    for issuer in issuers {
        let path = store.rebuild_rollup(&issuer)?;
        println!("rebuilt {} -> {}", issuer, path.display());
    }
    Ok(())
}
