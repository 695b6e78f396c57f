//! HTTP client wrapper with preconfigured timeouts and pooling.
//!
//! [`Client`] turns a [`ClientConfig`] into a `reqwest::Client` once and
//! reuses it for every call. Shaped operations (`get`, `post`, `send`, ...)
//! return a [`Response`] whose body is already in memory; `raw_send` hands
//! back the live `reqwest::Response` instead.
//!
//! Only transport failures are errors. A `500` from `get` is a successful
//! call returning a `Response` with `status_code == 500`; `download_file` is
//! the one operation that treats anything but `200` as a failure.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::Method;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::constants::CONTENT_TYPE_FORM;
use crate::error::HttpError;
use crate::request::{Request, encode_params};
use crate::response::Response;
use crate::user_agent;

/// Reusable HTTP client.
///
/// Cheap to clone; clones share one connection pool. Safe to use from many
/// tasks at once, the pool does its own synchronization.
///
/// # Example
///
/// ```no_run
/// use httpwrap::Client;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new();
/// let response = client.get("https://example.com/").await?;
/// println!("{}: {} bytes", response.status, response.body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<RwLock<reqwest::Client>>,
    config: Arc<ClientConfig>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a client with [`ClientConfig::default`].
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a client from `config`. No network I/O happens here.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::ClientBuild`] if the transport cannot be built
    /// (for example, no TLS backend could be initialized).
    pub fn with_config(config: ClientConfig) -> Result<Self, HttpError> {
        if config.include_root_ca {
            warn!("include_root_ca is unsupported; using built-in root certificates");
        }
        if config.skip_tls_verify {
            warn!("TLS certificate verification is disabled for this client");
        }

        let client = build_client(&config)?;
        Ok(Self {
            inner: Arc::new(RwLock::new(client)),
            config: Arc::new(config),
        })
    }

    /// Returns the configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the overall per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Makes a GET request.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<Response, HttpError> {
        self.send(&Request::new(Method::GET.as_str(), url, None)).await
    }

    /// Makes a HEAD request. The returned body is empty.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    #[instrument(skip(self), fields(url = %url))]
    pub async fn head(&self, url: &str) -> Result<Response, HttpError> {
        self.send(&Request::new(Method::HEAD.as_str(), url, None)).await
    }

    /// Makes a POST request with the given content type and body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidHeader`] for an invalid content type,
    /// otherwise see [`send`](Self::send).
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: impl Into<Vec<u8>>,
    ) -> Result<Response, HttpError> {
        let mut request = Request::new(Method::POST.as_str(), url, Some(body.into()));
        request.set_content_type(content_type)?;
        self.send(&request).await
    }

    /// Makes a POST request with `form` URL-encoded as the body.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    #[instrument(skip(self, form), fields(url = %url))]
    pub async fn post_form(
        &self,
        url: &str,
        form: &BTreeMap<String, Vec<String>>,
    ) -> Result<Response, HttpError> {
        let body = encode_params(form).into_bytes();
        self.post(url, CONTENT_TYPE_FORM, body).await
    }

    /// Sends `request` and reads the whole response body.
    ///
    /// Any status code is returned as a `Response`; only failures to build,
    /// send, or read the request are errors.
    ///
    /// # Errors
    ///
    /// - [`HttpError::InvalidMethod`] / [`HttpError::InvalidUrl`]: nothing was sent
    /// - [`HttpError::Timeout`]: the configured timeout elapsed
    /// - [`HttpError::Network`]: DNS, connect, TLS or protocol failure
    /// - [`HttpError::Read`]: the body could not be drained
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.base_url))]
    pub async fn send(&self, request: &Request) -> Result<Response, HttpError> {
        let raw_request = request.build()?;
        let raw = self.raw_send(raw_request).await?;
        Response::from_raw(raw).await
    }

    /// Sends a prebuilt `reqwest::Request` and returns the live response.
    ///
    /// The caller owns the returned body; dropping the response releases
    /// its connection.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Timeout`] or [`HttpError::Network`] on transport failure.
    pub async fn raw_send(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, HttpError> {
        let url = request.url().to_string();
        debug!(method = %request.method(), url = %url, "dispatching request");
        self.current()
            .execute(request)
            .await
            .map_err(|e| HttpError::transport(url, e))
    }

    /// Downloads `url` and writes the body to `path`.
    ///
    /// The file is created or truncated (mode `0o644` on Unix) only after a
    /// `200 OK`; any other status leaves `path` untouched.
    ///
    /// # Errors
    ///
    /// - errors from [`get`](Self::get)
    /// - [`HttpError::Status`] for any status other than 200
    /// - [`HttpError::Io`] if the file cannot be written
    #[instrument(skip(self, path), fields(url = %url))]
    pub async fn download_file(&self, url: &str, path: impl AsRef<Path>) -> Result<(), HttpError> {
        let path = path.as_ref();
        let response = self.get(url).await?;

        if response.status_code != 200 {
            return Err(HttpError::status(
                url,
                response.status_code,
                response.status,
            ));
        }

        write_file(path, &response.body).await?;
        debug!(path = %path.display(), bytes = response.body.len(), "download complete");
        Ok(())
    }

    /// Closes idle pooled connections.
    ///
    /// The pool is replaced with a fresh one built from the same config. The
    /// old pool closes once requests still running on it finish.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::ClientBuild`] if the replacement cannot be built;
    /// the current pool stays in place.
    pub fn close_idle_connections(&self) -> Result<(), HttpError> {
        let fresh = build_client(&self.config)?;
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = fresh;
        debug!("idle connections released");
        Ok(())
    }

    fn current(&self) -> reqwest::Client {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn build_client(config: &ClientConfig) -> Result<reqwest::Client, HttpError> {
    // reqwest's connect phase covers both TCP connect and TLS handshake.
    let connect_timeout = config
        .dial_timeout
        .saturating_add(config.tls_handshake_timeout);
    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout)
        .connect_timeout(connect_timeout)
        .tcp_keepalive(config.keep_alive)
        .pool_idle_timeout(config.idle_conn_timeout)
        .pool_max_idle_per_host(config.max_idle_conns)
        .user_agent(user_agent::default_user_agent());

    if config.skip_tls_verify {
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|source| HttpError::ClientBuild { source })
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), HttpError> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o644);

    let mut file = options
        .open(path)
        .await
        .map_err(|e| HttpError::io(path, e))?;
    file.write_all(contents)
        .await
        .map_err(|e| HttpError::io(path, e))?;
    file.flush().await.map_err(|e| HttpError::io(path, e))?;
    Ok(())
}
