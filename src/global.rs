//! Process-wide default client.
//!
//! Callers that do not need their own configuration can use these
//! functions instead of holding a [`Client`]. The default client is built
//! with [`ClientConfig::default`](crate::ClientConfig::default) on first use
//! and lives until the process exits; [`close_idle_connections`] is the only
//! lifecycle hook.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::client::Client;
use crate::error::HttpError;
use crate::request::Request;
use crate::response::Response;

static DEFAULT_CLIENT: OnceLock<Client> = OnceLock::new();

/// Returns the shared default client, building it on first call.
pub fn default_client() -> &'static Client {
    DEFAULT_CLIENT.get_or_init(Client::new)
}

/// Makes a GET request with the default client.
///
/// # Errors
///
/// See [`Client::get`].
pub async fn get(url: &str) -> Result<Response, HttpError> {
    default_client().get(url).await
}

/// Makes a HEAD request with the default client.
///
/// # Errors
///
/// See [`Client::head`].
pub async fn head(url: &str) -> Result<Response, HttpError> {
    default_client().head(url).await
}

/// Makes a POST request with the default client.
///
/// # Errors
///
/// See [`Client::post`].
pub async fn post(
    url: &str,
    content_type: &str,
    body: impl Into<Vec<u8>>,
) -> Result<Response, HttpError> {
    default_client().post(url, content_type, body).await
}

/// Makes a form POST with the default client.
///
/// # Errors
///
/// See [`Client::post_form`].
pub async fn post_form(
    url: &str,
    form: &BTreeMap<String, Vec<String>>,
) -> Result<Response, HttpError> {
    default_client().post_form(url, form).await
}

/// Sends `request` with the default client.
///
/// # Errors
///
/// See [`Client::send`].
pub async fn send(request: &Request) -> Result<Response, HttpError> {
    default_client().send(request).await
}

/// Sends a prebuilt `reqwest::Request` with the default client.
///
/// # Errors
///
/// See [`Client::raw_send`].
pub async fn raw_send(request: reqwest::Request) -> Result<reqwest::Response, HttpError> {
    default_client().raw_send(request).await
}

/// Downloads `url` to `path` with the default client.
///
/// # Errors
///
/// See [`Client::download_file`].
pub async fn download_file(url: &str, path: impl AsRef<Path>) -> Result<(), HttpError> {
    default_client().download_file(url, path).await
}

/// Closes idle connections held by the default client.
///
/// # Errors
///
/// See [`Client::close_idle_connections`].
pub fn close_idle_connections() -> Result<(), HttpError> {
    default_client().close_idle_connections()
}
