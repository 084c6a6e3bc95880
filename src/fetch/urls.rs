// src/fetch/urls.rs
use anyhow::Result;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

const MAX_RETRIES: usize = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Scrape one filing index page for links to period spreadsheet files
/// (`*.xlsx`). Relative hrefs are resolved against the page URL.
pub async fn fetch_period_file_urls(client: &Client, index_url: &str) -> Result<Vec<String>> {
    let base = Url::parse(index_url)?;
    let mut attempt = 0;

    // retry loop
    let links = loop {
        attempt += 1;

        let resp = client.get(index_url).send().await;
        match resp {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(html) => break extract_period_links(&html, &base),
                Err(_) if attempt < MAX_RETRIES => {
                    sleep(RETRY_DELAY).await;
                    continue;
                }
                Err(e) => return Err(e.into()),
            },
            Err(_) if attempt < MAX_RETRIES => {
                sleep(RETRY_DELAY).await;
                continue;
            }
            Ok(resp) => return Err(anyhow::anyhow!("HTTP error: {}", resp.status())),
            Err(e) => return Err(e.into()),
        }
    };

    Ok(links)
}

fn extract_period_links(html: &str, base: &Url) -> Vec<String> {
    let selector =
        Selector::parse(r#"a[href$=".xlsx"]"#).expect("Invalid CSS selector for .xlsx links");
    Html::parse_document(html)
        .select(&selector)
        .filter_map(|e| e.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .map(|u| u.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_only_xlsx_links_and_resolves_relative_hrefs() {
        let html = r#"
            <html><body>
              <a href="20230331.xlsx">Q1</a>
              <a href="/filings/blackrock/20230630.xlsx">Q2</a>
              <a href="https://other.example.com/20230930.xlsx">Q3</a>
              <a href="readme.txt">notes</a>
              <a>no href</a>
            </body></html>
        "#;
        let base = Url::parse("https://example.com/filings/blackrock/").unwrap();
        let links = extract_period_links(html, &base);
        assert_eq!(
            links,
            vec![
                "https://example.com/filings/blackrock/20230331.xlsx",
                "https://example.com/filings/blackrock/20230630.xlsx",
                "https://other.example.com/20230930.xlsx",
            ]
        );
    }

    #[test]
    fn page_without_links_yields_empty_list() {
        let base = Url::parse("https://example.com/").unwrap();
        assert!(extract_period_links("<html></html>", &base).is_empty());
    }
}
