//! Error types for client construction, request dispatch and downloads.
//!
//! Every variant keeps the context needed to diagnose it (the URL or path
//! involved) together with the underlying cause where one exists.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by [`Client`](crate::Client) operations.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request method is not a valid HTTP token.
    #[error("invalid HTTP method: {method:?}")]
    InvalidMethod {
        /// The rejected method string.
        method: String,
    },

    /// The request URL could not be parsed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The rejected URL string.
        url: String,
    },

    /// A header name or value contains characters HTTP does not allow.
    #[error("invalid header {name}: {reason}")]
    InvalidHeader {
        /// The header being set.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before a response arrived.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
        /// The underlying timeout error.
        #[source]
        source: reqwest::Error,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL being requested.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read to completion.
    #[error("failed reading response body from {url}: {source}")]
    Read {
        /// The URL whose body failed.
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body is not valid JSON for the requested type.
    #[error("failed to decode response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    /// A request body could not be serialized to JSON.
    #[error("failed to encode request body: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    /// A download got something other than `200 OK`.
    #[error("download failed: {status_text}")]
    Status {
        /// The URL that was downloaded.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Status line text, e.g. `404 Not Found`.
        status_text: String,
    },

    /// File system error while saving a download.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl HttpError {
    /// Creates an invalid method error.
    pub fn invalid_method(method: impl Into<String>) -> Self {
        Self::InvalidMethod {
            method: method.into(),
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an invalid header error.
    pub fn invalid_header(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Classifies a dispatch failure as a timeout or a network error.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.into(),
                source,
            }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates a body read error.
    pub fn read(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Read {
            url: url.into(),
            source,
        }
    }

    /// Creates a download status error.
    pub fn status(url: impl Into<String>, status: u16, status_text: impl Into<String>) -> Self {
        Self::Status {
            url: url.into(),
            status,
            status_text: status_text.into(),
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: each variant needs the
// URL or path that the source error does not carry.
