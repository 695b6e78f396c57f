//! Fully materialized responses.

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::HttpError;

/// A response whose body has already been read into memory.
///
/// The network stream behind it is gone by the time this value exists, so
/// holding one ties up no connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Numeric status, e.g. `404`.
    pub status_code: u16,
    /// Status line text, e.g. `404 Not Found`.
    pub status: String,
    /// The complete response body.
    pub body: Vec<u8>,
    /// Response headers.
    pub headers: HeaderMap,
}

impl Response {
    /// Drains `raw` into a `Response`.
    ///
    /// `raw` is consumed on every path: after a successful read, and when
    /// the read fails and it is dropped with the error.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Read`] if the body cannot be read to the end.
    pub async fn from_raw(raw: reqwest::Response) -> Result<Self, HttpError> {
        let status = raw.status();
        let url = raw.url().to_string();
        let headers = raw.headers().clone();

        let body = raw
            .bytes()
            .await
            .map_err(|e| HttpError::read(url.as_str(), e))?;

        debug!(url = %url, status = status.as_u16(), bytes = body.len(), "response body drained");

        Ok(Self {
            status_code: status.as_u16(),
            status: status_text(status),
            body: body.to_vec(),
            headers,
        })
    }

    /// Returns true for 2xx status codes.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Decode`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body).map_err(|source| HttpError::Decode { source })
    }
}

/// Formats a status as `"<code> <reason>"`, or just the code when the reason is unknown.
pub(crate) fn status_text(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}
