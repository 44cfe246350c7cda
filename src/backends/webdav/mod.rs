mod propfind;
pub mod resolver;


pub use resolver::PathResolver;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::backends::traits::DirectoryLister;
use crate::constants::LISTING_TIMEOUT;
use crate::errors::ConfigurationError;
use crate::models::{Entry, EntryKind};
use propfind::parse_multistatus;

const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="DAV:">
  <D:prop>
    <D:displayname/>
    <D:resourcetype/>
    <D:getcontentlength/>
    <D:getlastmodified/>
  </D:prop>
</D:propfind>"#;

/// WebDAV directory browser. Listings go over `PROPFIND` Depth 1 with basic
/// auth; failures of any kind collapse to an empty listing so a flaky server
/// can never take the session down.
pub struct WebDavClient {
    client: reqwest::Client,
    resolver: PathResolver,
}

impl WebDavClient {
    pub fn new(
        base_url: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, ConfigurationError> {
        let resolver = PathResolver::new(base_url, username, password)?;
        let client = reqwest::Client::builder()
            .timeout(LISTING_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Ok(Self { client, resolver })
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Authenticated stream URL for a server path.
    pub fn stream_url(&self, path: &str) -> Result<String> {
        self.resolver.stream_url(path)
    }

    async fn propfind(&self, path: &str) -> Result<Vec<Entry>> {
        let requested = {
            let mut p = self.resolver.normalize(path);
            if !p.starts_with('/') {
                p.insert(0, '/');
            }
            p
        };
        let url = self.resolver.request_url(path)?;

        let method = Method::from_bytes(b"PROPFIND").context("PROPFIND is not a valid method")?;
        let response = self
            .client
            .request(method, url)
            .basic_auth(self.resolver.username(), Some(self.resolver.password()))
            .header("Depth", "1")
            .header(reqwest::header::CONTENT_TYPE, "application/xml")
            .body(PROPFIND_BODY)
            .send()
            .await
            .context("PROPFIND request failed")?;

        let status = response.status();
        if status != StatusCode::MULTI_STATUS && !status.is_success() {
            bail!("server answered PROPFIND with {status}");
        }

        let body = response
            .text()
            .await
            .context("failed to read PROPFIND response")?;
        let resources = parse_multistatus(&body)?;

        let mut entries = Vec::new();
        for resource in resources {
            // Some servers advertise absolute URLs in hrefs.
            let raw_path = if resource.href.starts_with("http://")
                || resource.href.starts_with("https://")
            {
                Url::parse(&resource.href)
                    .map(|u| u.path().to_string())
                    .unwrap_or_else(|_| resource.href.clone())
            } else {
                resource.href.clone()
            };

            let entry_path = {
                let normalized = self.resolver.normalize(&raw_path);
                let trimmed = normalized.trim_end_matches('/');
                if trimmed.is_empty() {
                    "/".to_string()
                } else {
                    trimmed.to_string()
                }
            };

            // Depth 1 includes the collection itself; the caller only wants
            // its children.
            if entry_path == requested.trim_end_matches('/')
                || (requested == "/" && entry_path == "/")
            {
                continue;
            }

            entries.push(Entry {
                path: entry_path,
                kind: if resource.is_collection {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                },
                size: resource.size,
                modified: resource.modified,
            });
        }

        Ok(entries)
    }
}

#[async_trait]
impl DirectoryLister for WebDavClient {
    async fn list(&self, path: &str) -> Vec<Entry> {
        match self.propfind(path).await {
            Ok(entries) => {
                debug!("Listed {} entries under {path:?}", entries.len());
                entries
            }
            Err(e) => {
                warn!("WebDAV listing of {path:?} failed: {e:#}");
                Vec::new()
            }
        }
    }
}
