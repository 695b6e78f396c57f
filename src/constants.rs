//! Default client tunables (timeouts, pool limits).

use std::time::Duration;

/// Default overall request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default TCP connect timeout (10 seconds).
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Default TCP keep-alive interval (30 seconds).
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Default time an idle pooled connection is kept open (90 seconds).
pub const DEFAULT_IDLE_CONN_TIMEOUT: Duration = Duration::from_secs(90);

/// Default TLS handshake timeout (10 seconds).
pub const DEFAULT_TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default wait for a `100 Continue` reply (1 second).
pub const DEFAULT_EXPECT_CONTINUE_TIMEOUT: Duration = Duration::from_secs(1);

/// Default maximum number of idle pooled connections.
pub const DEFAULT_MAX_IDLE_CONNS: usize = 100;

/// Content-Type value for JSON bodies.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content-Type value used for form posts.
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
