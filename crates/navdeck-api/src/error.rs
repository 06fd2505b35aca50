use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `navdeck-api` crate.
///
/// Covers every failure mode of the raw clients: transport, URL
/// construction, control-plane authentication, and payload decoding.
/// `navdeck-core` folds these into outcome records; nothing here is ever
/// shown to a dashboard user without passing through that layer.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, or the success marker / session cookie was missing.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error that is neither a timeout nor a connect failure.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// DNS failure, refused connection, reset during handshake.
    #[error("Connection failed: {reason}")]
    Connect { reason: String },

    /// TLS setup error or client construction failure.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// The remote answered, but not with a success status.
    #[error("Unexpected HTTP {status} from {url}")]
    Status { status: u16, url: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Classify a `reqwest` send error into timeout / connect / generic
    /// transport, keeping the innermost cause readable.
    pub fn from_send(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else if err.is_connect() {
            Self::Connect {
                reason: root_cause(&err),
            }
        } else {
            Self::Transport(err)
        }
    }
}

/// Walk the `source()` chain and return the deepest message.
///
/// reqwest wraps hyper which wraps io; the outermost text is just
/// "error sending request for url (...)", the useful part is at the bottom.
fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Leaf;

    impl std::fmt::Display for Leaf {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("Connection refused (os error 111)")
        }
    }

    impl std::error::Error for Leaf {}

    #[derive(Debug)]
    struct Wrapper(Leaf);

    impl std::fmt::Display for Wrapper {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("error sending request")
        }
    }

    impl std::error::Error for Wrapper {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn root_cause_reaches_innermost_error() {
        let err = Wrapper(Leaf);
        assert_eq!(root_cause(&err), "Connection refused (os error 111)");
    }

    #[test]
    fn status_error_names_code_and_url() {
        let err = Error::Status {
            status: 502,
            url: "http://nas.local/api".into(),
        };
        assert_eq!(err.to_string(), "Unexpected HTTP 502 from http://nas.local/api");
    }
}
