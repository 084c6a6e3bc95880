use anyhow::Result;
use edgarscraper::{
    config::{self, Config},
    fetch,
    insights::InsightStore,
    table,
};
use reqwest::Client;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::{mpsc, Semaphore};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const FEEDS_FILE: &str = "issuers.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configure dirs ───────────────────────────────────────────
    let client = Client::new();
    let cfg = Config::default();
    cfg.ensure_roots()?;
    let store = InsightStore::new(cfg.clone());

    // ─── 3) load issuer feeds ────────────────────────────────────────
    if !Path::new(FEEDS_FILE).exists() {
        info!("no {} found; nothing to scrape", FEEDS_FILE);
        return Ok(());
    }
    let feeds = config::load_feeds(FEEDS_FILE)?;
    info!("{} issuer feeds configured", feeds.len());

    for feed in feeds {
        let issuer = feed.issuer;

        // ─── 4) discover new period files ────────────────────────────
        let have: HashSet<String> = table::list_period_files(&cfg, &issuer)
            .into_iter()
            .collect();
        let urls = fetch::urls::fetch_period_file_urls(&client, &feed.index_url).await?;
        let to_download: Vec<String> = urls
            .into_iter()
            .filter(|u| {
                Path::new(u)
                    .file_name()
                    .map(|n| !have.contains(&n.to_string_lossy().to_string()))
                    .unwrap_or(false)
            })
            .collect();
        info!(issuer = %issuer, new = to_download.len(), "period files to download");

        // ─── 5) spawn downloader tasks ───────────────────────────────
        let (tx, mut rx) = mpsc::channel::<Result<PathBuf, (String, String)>>(100);
        let dl_sem = Arc::new(Semaphore::new(3));
        let mut dl_handles = Vec::with_capacity(to_download.len());
        let dest_dir = cfg.issuer_table_dir(&issuer);

        for url in to_download {
            let client = client.clone();
            let dest_dir = dest_dir.clone();
            let tx = tx.clone();
            let sem = dl_sem.clone();

            dl_handles.push(tokio::spawn(async move {
                let _permit = sem.acquire().await.unwrap();
                info!(url = %url, "downloading");
                match fetch::filings::download_filing(&client, &url, &dest_dir).await {
                    Ok(Some(path)) => {
                        info!(path = %path.display(), "downloaded");
                        let _ = tx.send(Ok(path)).await;
                    }
                    Ok(None) => {}
                    Err(err) => {
                        error!("{} failed: {}", url, err);
                        let _ = tx.send(Err((url.clone(), err.to_string()))).await;
                    }
                }
            }));
        }
        // drop the original sender so `rx.recv()` ends once all downloads complete
        drop(tx);

        // ─── 6) cache an insight per downloaded file ─────────────────
        while let Some(msg) = rx.recv().await {
            match msg {
                Ok(path) => {
                    let name = match path.file_name().and_then(|n| n.to_str()) {
                        Some(name) => name.to_string(),
                        None => continue,
                    };
                    if let Err(e) = store.save_insight(&issuer, &name) {
                        error!("insight for {} failed: {}", name, e);
                    }
                }
                Err((url, err)) => {
                    error!("download error {}: {}", url, err);
                }
            }
        }
        for h in dl_handles {
            let _ = h.await;
        }

        // ─── 7) refresh the issuer rollup ────────────────────────────
        store.rebuild_rollup(&issuer)?;
    }

    info!("all done");
    Ok(())
}
