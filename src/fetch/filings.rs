// src/fetch/filings.rs
use anyhow::Result;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;
use url::Url;

/// Download one period spreadsheet and save it under `dest_dir` using the
/// filename carried by the URL. Links without a usable `*.xlsx` filename
/// are skipped with a warning (`Ok(None)`): the period listing only picks
/// up `.xlsx` files, so saving anything else would just strand it in the
/// issuer directory.
pub async fn download_filing(
    client: &Client,
    url_str: &str,
    dest_dir: impl AsRef<Path>,
) -> Result<Option<PathBuf>> {
    let url = Url::parse(url_str)?;
    let filename = match period_filename_from_url(&url) {
        Some(name) => name,
        None => {
            warn!(url = %url, "skipping link without an .xlsx filename");
            return Ok(None);
        }
    };
    let dest_path = dest_dir.as_ref().join(&filename);

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let resp = client.get(url.as_str()).send().await?.error_for_status()?;
    let bytes = resp.bytes().await?;
    fs::write(&dest_path, &bytes).await?;

    Ok(Some(dest_path))
}

/// Final path segment of the URL, accepted only when it names an `.xlsx`
/// period file per the ingestion contract.
fn period_filename_from_url(url: &Url) -> Option<String> {
    let name = url.path_segments()?.last()?;
    if name.is_empty() || !name.to_ascii_lowercase().ends_with(".xlsx") {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_xlsx_filenames() {
        let url = Url::parse("https://example.com/filings/blackrock/20230331.xlsx").unwrap();
        assert_eq!(
            period_filename_from_url(&url),
            Some("20230331.xlsx".to_string())
        );
        let upper = Url::parse("https://example.com/20230630.XLSX").unwrap();
        assert_eq!(
            period_filename_from_url(&upper),
            Some("20230630.XLSX".to_string())
        );
    }

    #[test]
    fn rejects_non_xlsx_and_nameless_urls() {
        for raw in [
            "https://example.com/filings/readme.txt",
            "https://example.com/filings/",
            "https://example.com/",
        ] {
            let url = Url::parse(raw).unwrap();
            assert_eq!(period_filename_from_url(&url), None, "{raw}");
        }
    }
}
