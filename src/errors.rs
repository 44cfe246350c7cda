use thiserror::Error;

/// Failures that make a server configuration unusable. These surface at
/// client construction time and are never retried.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("malformed WebDAV base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("WebDAV base URL {0:?} must use an http or https scheme")]
    UnsupportedScheme(String),
}
