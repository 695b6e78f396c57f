//! User-Agent string sent by every client.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/httpwrap";

/// Default User-Agent (identifies the crate and its version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("httpwrap/{version} (+{PROJECT_UA_URL})")
}
