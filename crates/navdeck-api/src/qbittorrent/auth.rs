// qBittorrent authentication
//
// Form-encoded login. qBittorrent answers 200 with the literal body `Ok.`
// and a `SID` cookie on success, and 200 with `Fails.` on bad credentials,
// so the status code alone says nothing about whether we are logged in.

use std::fmt;

use reqwest::header::SET_COOKIE;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::Error;
use crate::qbittorrent::client::QbitClient;

const LOGIN_OK: &str = "Ok.";
const SESSION_COOKIE: &str = "SID";

/// Session cookie value returned by a successful login.
///
/// Opaque and short-lived: valid for the poll that obtained it. `Debug`
/// is redacted so the value never reaches logs.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// The raw cookie value.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// `Cookie` header value carrying this session.
    pub(crate) fn cookie_header(&self) -> String {
        format!("{SESSION_COOKIE}={}", self.expose())
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

impl QbitClient {
    /// Authenticate with the Web UI using username/password.
    ///
    /// `POST /api/v2/auth/login` with a form body. Returns the session
    /// token extracted from `Set-Cookie`; a missing `Ok.` marker or a
    /// missing `SID` cookie is an [`Error::Authentication`], not a
    /// transport error.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SessionToken, Error> {
        let url = self.api_url("auth/login")?;
        debug!("logging in at {}", url);

        let resp = self
            .http()
            .post(url)
            .form(&[("username", username), ("password", password.expose_secret())])
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| Error::from_send(e, self.timeout()))?;

        let status = resp.status();
        let sid = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(session_cookie_value)
            .map(str::to_owned);

        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", body.trim()),
            });
        }

        if body.trim() != LOGIN_OK {
            return Err(Error::Authentication {
                message: format!("login refused: {}", body.trim()),
            });
        }

        let sid = sid.ok_or_else(|| Error::Authentication {
            message: "login accepted but no SID cookie was set".into(),
        })?;

        debug!("login successful");
        Ok(SessionToken::new(sid))
    }
}

/// Extract the value of a `SID=...` cookie from one `Set-Cookie` header.
fn session_cookie_value(header: &str) -> Option<&str> {
    let pair = header.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_sid_from_set_cookie() {
        assert_eq!(
            session_cookie_value("SID=abc123; HttpOnly; SameSite=Strict; path=/"),
            Some("abc123")
        );
    }

    #[test]
    fn ignores_other_cookies_and_empty_sid() {
        assert_eq!(session_cookie_value("QBT_LANG=en; path=/"), None);
        assert_eq!(session_cookie_value("SID=; path=/"), None);
        assert_eq!(session_cookie_value("SIDX=abc"), None);
    }

    #[test]
    fn session_token_debug_is_redacted() {
        let token = SessionToken::new("super-secret");
        assert_eq!(format!("{token:?}"), "SessionToken([REDACTED])");
        assert_eq!(token.cookie_header(), "SID=super-secret");
    }
}
