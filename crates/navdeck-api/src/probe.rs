// Single-shot reachability probe
//
// One request, one method, one timeout. No retries and no interpretation of
// the status code beyond reporting it; the health policy lives in
// navdeck-core.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Wire method used for a probe.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    Head,
    Get,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Head => Self::HEAD,
            HttpMethod::Get => Self::GET,
        }
    }
}

/// What the remote said, when it said anything at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    /// Canonical reason phrase for `status`, if one exists.
    pub reason: Option<&'static str>,
}

/// HTTP client dedicated to reachability probes.
#[derive(Debug, Clone)]
pub struct ProbeClient {
    http: reqwest::Client,
}

impl ProbeClient {
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    /// Send exactly one request and report the status.
    ///
    /// Any status code is a successful *send*; only transport failures
    /// (timeout, DNS, refused connection, TLS) come back as `Err`. The
    /// response body is never read.
    pub async fn send(
        &self,
        url: &Url,
        method: HttpMethod,
        timeout: Duration,
    ) -> Result<ProbeResponse, Error> {
        debug!(%method, %url, "probing");

        let resp = self
            .http
            .request(method.into(), url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Error::from_send(e, timeout))?;

        let status = resp.status();
        Ok(ProbeResponse {
            status: status.as_u16(),
            reason: status.canonical_reason(),
        })
    }
}
