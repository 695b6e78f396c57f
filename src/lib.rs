//! httpwrap Library
//!
//! A preconfigured HTTP client that hands back fully read responses.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Client tunables, defaults and config-file loading
//! - [`client`] - The [`Client`] and its verb shortcuts and file download
//! - [`request`] - [`Request`] values assembled before sending
//! - [`response`] - [`Response`] values with the body already in memory
//! - [`global`] - The same operations against one process-wide client
//! - [`error`] - [`HttpError`], covering every failure the client reports
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> Result<(), httpwrap::HttpError> {
//! let response = httpwrap::global::get("https://example.com/").await?;
//! if response.is_success() {
//!     println!("{}", response.text());
//! }
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod global;
pub mod request;
pub mod response;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use client::Client;
pub use config::{ClientConfig, ConfigError, default_config_path};
pub use error::HttpError;
pub use request::Request;
pub use response::Response;
