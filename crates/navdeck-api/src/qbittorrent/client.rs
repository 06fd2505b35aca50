// qBittorrent Web API HTTP client
//
// Wraps `reqwest::Client` with `/api/v2` URL construction and session-cookie
// injection. Endpoint methods live in sibling files as inherent impls to
// keep this module focused on transport mechanics.

use std::time::Duration;

use reqwest::header::COOKIE;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::qbittorrent::auth::SessionToken;

/// Raw HTTP client for one qBittorrent Web UI instance.
///
/// Holds no session state: every authenticated call takes the
/// [`SessionToken`] explicitly, so a token never outlives the poll that
/// obtained it.
#[derive(Debug, Clone)]
pub struct QbitClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl QbitClient {
    /// Create a client for the Web UI rooted at `base_url`
    /// (e.g. `http://nas.local:8080`) around a pre-built `reqwest::Client`.
    /// `timeout` applies to every call.
    pub fn with_client(http: reqwest::Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            timeout,
        }
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/v2/{path}`.
    ///
    /// Plain concatenation rather than `Url::join`, so a Web UI mounted
    /// under a sub-path (`http://nas/qbt`) keeps its prefix.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/api/v2/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        );
        Url::parse(&full).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        session: &SessionToken,
    ) -> Result<T, Error> {
        debug!(path = url.path(), "GET");

        let resp = self
            .http
            .get(url.clone())
            .header(COOKIE, session.cookie_header())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::from_send(e, self.timeout))?;

        let status = resp.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: "session rejected by qBittorrent".into(),
            });
        }
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> QbitClient {
        QbitClient::with_client(
            reqwest::Client::new(),
            Url::parse(base).expect("valid base"),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn api_url_appends_v2_prefix() {
        let url = client("http://nas.local:8080").api_url("auth/login");
        assert_eq!(
            url.expect("url").as_str(),
            "http://nas.local:8080/api/v2/auth/login"
        );
    }

    #[test]
    fn api_url_keeps_sub_path_and_drops_trailing_slash() {
        let url = client("https://nas.local/qbt/").api_url("transfer/info");
        assert_eq!(
            url.expect("url").as_str(),
            "https://nas.local/qbt/api/v2/transfer/info"
        );
    }
}
