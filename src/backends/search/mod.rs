#[cfg(test)]
mod tests;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use tracing::{debug, warn};
use url::Url;

use crate::backends::traits::SearchProvider;
use crate::constants::SEARCH_TIMEOUT;
use crate::errors::ConfigurationError;

// Anchors in the indexer's result page, quoted or bare hrefs alike. The
// result rows carry the server path as the anchor text.
static ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a[^>]*href=["']?([^"'>\s]+)["']?[^>]*>(.*?)</a>"#).expect("valid pattern")
});
static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid pattern"));

/// Client for the media server's companion indexing endpoint. The indexer
/// lives on the server origin, outside the DAV mount, and answers with an
/// HTML page of result links.
pub struct SearchClient {
    client: reqwest::Client,
    origin: Url,
}

impl SearchClient {
    /// Derive the indexer origin from the configured WebDAV URL by dropping
    /// the mount path.
    pub fn new(webdav_url: &str) -> Result<Self, ConfigurationError> {
        let url = Url::parse(webdav_url).map_err(|source| ConfigurationError::InvalidBaseUrl {
            url: webdav_url.to_string(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigurationError::UnsupportedScheme(webdav_url.to_string()));
        }

        let mut origin = url;
        origin.set_path("");
        origin.set_query(None);
        origin.set_fragment(None);

        let client = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Ok(Self { client, origin })
    }

    async fn request(&self, keyword: &str) -> Result<String> {
        let mut url = self.origin.clone();
        url.set_path("/search");
        url.query_pairs_mut()
            .append_pair("box", keyword)
            .append_pair("url", "")
            .append_pair("type", "video");

        debug!("Searching {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("search request failed")?;
        if !response.status().is_success() {
            bail!("indexer answered with {}", response.status());
        }
        response
            .text()
            .await
            .context("failed to read search response")
    }

    /// Pull result paths out of the HTML: anchor text that looks like a
    /// server path, minus navigation chrome, nested markup, and URL encoding.
    fn parse_results(html: &str) -> Vec<String> {
        let mut results = Vec::new();
        for caps in ANCHOR.captures_iter(html) {
            let text = caps[2].trim();
            if text.is_empty() || text.contains("返回") || text.contains("关注") {
                continue;
            }
            // Result rows are paths; anything without a separator is a
            // button or label.
            if !text.contains('/') {
                continue;
            }

            let text = MARKUP.replace_all(text, "");
            let text = percent_decode_str(text.trim()).decode_utf8_lossy().into_owned();
            results.push(text);
        }
        results
    }
}

#[async_trait]
impl SearchProvider for SearchClient {
    async fn search(&self, keyword: &str) -> Vec<String> {
        match self.request(keyword).await {
            Ok(html) => {
                let results = Self::parse_results(&html);
                debug!("Search for {keyword:?} matched {} paths", results.len());
                results
            }
            Err(e) => {
                warn!("Search for {keyword:?} failed: {e:#}");
                Vec::new()
            }
        }
    }
}
