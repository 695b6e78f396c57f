//! Client configuration and config-file loading.
//!
//! A [`ClientConfig`] is plain data: it is copied into a client at
//! construction and never consulted again. Values are not validated; zero
//! durations are handed to the transport as-is.
//!
//! Config files use one `key = value` pair per line, `#` starts a comment:
//!
//! ```text
//! timeout_secs = 5
//! max_idle_conns = 16
//! skip_tls_verify = false
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::constants::{
    DEFAULT_DIAL_TIMEOUT, DEFAULT_EXPECT_CONTINUE_TIMEOUT, DEFAULT_IDLE_CONN_TIMEOUT,
    DEFAULT_KEEP_ALIVE, DEFAULT_MAX_IDLE_CONNS, DEFAULT_TIMEOUT, DEFAULT_TLS_HANDSHAKE_TIMEOUT,
};

/// Tunables wired into a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Overall per-request timeout, including reading the body.
    pub timeout: Duration,
    /// TCP connect timeout.
    pub dial_timeout: Duration,
    /// TCP keep-alive interval.
    pub keep_alive: Duration,
    /// How long an idle pooled connection is kept.
    pub idle_conn_timeout: Duration,
    /// TLS handshake budget, added to the connect timeout.
    pub tls_handshake_timeout: Duration,
    /// Wait for `100 Continue`. Carried for completeness; the transport never sends `Expect`.
    pub expect_continue_timeout: Duration,
    /// Maximum idle pooled connections (per host).
    pub max_idle_conns: usize,
    /// Disables certificate verification for every request made by the client.
    pub skip_tls_verify: bool,
    /// Reserved for custom root CA support; currently has no effect.
    pub include_root_ca: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            keep_alive: DEFAULT_KEEP_ALIVE,
            idle_conn_timeout: DEFAULT_IDLE_CONN_TIMEOUT,
            tls_handshake_timeout: DEFAULT_TLS_HANDSHAKE_TIMEOUT,
            expect_continue_timeout: DEFAULT_EXPECT_CONTINUE_TIMEOUT,
            max_idle_conns: DEFAULT_MAX_IDLE_CONNS,
            skip_tls_verify: false,
            include_root_ca: false,
        }
    }
}

/// Errors loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line is not of the form `key = value`.
    #[error("invalid config syntax on line {line}: expected key = value")]
    Syntax { line: usize },

    /// The key is not a known setting.
    #[error("unknown config key `{key}` on line {line}")]
    UnknownKey { key: String, line: usize },

    /// The value could not be parsed for its key.
    #[error("invalid `{key}` value '{value}' on line {line}: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        line: usize,
        expected: &'static str,
    },
}

impl ClientConfig {
    /// Loads a config file, starting from the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&raw)
    }

    /// Parses config text, starting from the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on bad syntax, unknown keys or bad values.
    pub fn parse_str(raw: &str) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        for (line_index, raw_line) in raw.lines().enumerate() {
            let line_no = line_index + 1;
            let line = strip_inline_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            let Some((raw_key, raw_value)) = line.split_once('=') else {
                return Err(ConfigError::Syntax { line: line_no });
            };
            let key = raw_key.trim();
            let value = raw_value.trim();

            match key {
                "timeout_secs" => cfg.timeout = parse_secs(key, value, line_no)?,
                "dial_timeout_secs" => cfg.dial_timeout = parse_secs(key, value, line_no)?,
                "keep_alive_secs" => cfg.keep_alive = parse_secs(key, value, line_no)?,
                "idle_conn_timeout_secs" => {
                    cfg.idle_conn_timeout = parse_secs(key, value, line_no)?;
                }
                "tls_handshake_timeout_secs" => {
                    cfg.tls_handshake_timeout = parse_secs(key, value, line_no)?;
                }
                "expect_continue_timeout_secs" => {
                    cfg.expect_continue_timeout = parse_secs(key, value, line_no)?;
                }
                "max_idle_conns" => cfg.max_idle_conns = parse_count(key, value, line_no)?,
                "skip_tls_verify" => cfg.skip_tls_verify = parse_bool(key, value, line_no)?,
                "include_root_ca" => cfg.include_root_ca = parse_bool(key, value, line_no)?,
                _ => {
                    return Err(ConfigError::UnknownKey {
                        key: key.to_string(),
                        line: line_no,
                    });
                }
            }
        }
        Ok(cfg)
    }
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/httpwrap/config.toml`
/// 2. `$HOME/.config/httpwrap/config.toml`
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("httpwrap")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("httpwrap")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

fn strip_inline_comment(line: &str) -> &str {
    match line.find('#') {
        Some(index) => &line[..index],
        None => line,
    }
}

fn parse_secs(key: &str, value: &str, line: usize) -> Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| invalid_value(key, value, line, "whole seconds"))
}

fn parse_count(key: &str, value: &str, line: usize) -> Result<usize, ConfigError> {
    value
        .parse::<usize>()
        .map_err(|_| invalid_value(key, value, line, "a whole number"))
}

fn parse_bool(key: &str, value: &str, line: usize) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid_value(key, value, line, "true or false")),
    }
}

fn invalid_value(key: &str, value: &str, line: usize, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        line,
        expected,
    }
}
