use async_trait::async_trait;

use crate::models::Entry;

/// Directory listing provider. Implementations swallow transport and auth
/// failures and return an empty listing instead; the caller cannot tell a
/// missing directory from an unreachable server, and does not need to.
#[async_trait]
pub trait DirectoryLister: Send + Sync {
    async fn list(&self, path: &str) -> Vec<Entry>;
}

/// Companion indexer search. Returns server paths to browse, not playable
/// URLs. Same empty-on-failure contract as [`DirectoryLister`].
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, keyword: &str) -> Vec<String>;
}
