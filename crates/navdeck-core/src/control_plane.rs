// ── qBittorrent status polling ──
//
// One poll = one fresh login + two concurrent reads. The session token lives
// only inside `poll` and is never cached, so an expired or revoked session
// can't poison later polls. Every failure is folded into `AggregateStatus`.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, warn};

use navdeck_api::{QbitClient, SessionToken};

use crate::config::{Credentials, MonitorConfig};
use crate::error::CoreError;
use crate::target::ProbeTarget;

// ── Status model ─────────────────────────────────────────────────────

/// Global transfer counters. Zero when unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferCounters {
    pub download_rate_bps: u64,
    pub upload_rate_bps: u64,
    pub downloaded_total_bytes: u64,
    pub uploaded_total_bytes: u64,
}

/// The slice of a torrent the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub name: String,
    /// Info-hash.
    pub id: String,
    /// 0.0 to 1.0
    pub progress_fraction: f64,
    pub download_rate_bps: u64,
    pub upload_rate_bps: u64,
    /// Remote state label, passed through unvalidated.
    pub state: String,
}

/// Which of the two status reads a partial failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPart {
    Counters,
    Items,
}

impl fmt::Display for StatusPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counters => f.write_str("transfer counters"),
            Self::Items => f.write_str("torrent list"),
        }
    }
}

/// Why a poll came back incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("qBittorrent authentication failed or unreachable: {reason}")]
    Authentication { reason: String },

    #[error("authenticated with qBittorrent but both fetches failed ({counters}; {items})")]
    AllFetchesFailed { counters: String, items: String },

    #[error("partial retrieval failure: {part} unavailable ({reason})")]
    Partial { part: StatusPart, reason: String },
}

/// Result of one control-plane poll.
///
/// `counters` and `items` are always present (zeroed / empty on failure);
/// `error` is set only when at least one step failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStatus {
    pub counters: TransferCounters,
    pub items: Vec<ItemSummary>,
    #[serde(
        rename = "errorMessage",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_display"
    )]
    pub error: Option<PollError>,
}

impl AggregateStatus {
    fn failed(error: PollError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

fn serialize_display<S: Serializer>(
    error: &Option<PollError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.collect_str(e),
        None => serializer.serialize_none(),
    }
}

/// Response body for a control-plane poll.
#[derive(Debug, Clone, Serialize)]
pub struct ControlPlaneEnvelope {
    pub target: ProbeTarget,
    #[serde(flatten)]
    pub status: AggregateStatus,
}

// ── Poller ───────────────────────────────────────────────────────────

/// Session-authenticated poller for qBittorrent Web UIs.
///
/// Shares one connection pool across polls; shares nothing else.
#[derive(Debug, Clone)]
pub struct ControlPlanePoller {
    http: reqwest::Client,
    timeout: Duration,
    credentials: Credentials,
}

impl ControlPlanePoller {
    pub fn new(config: &MonitorConfig) -> Result<Self, CoreError> {
        let transport = config.control_plane_transport();
        Ok(Self {
            http: transport.build_client()?,
            timeout: transport.timeout,
            credentials: config.credentials.clone(),
        })
    }

    /// Poll the Web UI rooted at `base_url`. Never fails.
    pub async fn poll(&self, base_url: &ProbeTarget) -> AggregateStatus {
        let client =
            QbitClient::with_client(self.http.clone(), base_url.url().clone(), self.timeout);

        let session = match client
            .login(&self.credentials.username, &self.credentials.password)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                warn!(base_url = %base_url, error = %e, "qBittorrent login failed");
                return AggregateStatus::failed(PollError::Authentication {
                    reason: e.to_string(),
                });
            }
        };

        let status = fetch_status(&client, &session).await;
        if let Some(ref e) = status.error {
            warn!(base_url = %base_url, error = %e, "qBittorrent status incomplete");
        } else {
            debug!(base_url = %base_url, items = status.items.len(), "qBittorrent status fetched");
        }
        status
    }
}

/// Run both reads concurrently on one session and compose the result.
async fn fetch_status(client: &QbitClient, session: &SessionToken) -> AggregateStatus {
    let (counters, torrents) =
        tokio::join!(client.transfer_info(session), client.torrents(session));

    match (counters, torrents) {
        (Ok(counters), Ok(torrents)) => AggregateStatus {
            counters: counters.into(),
            items: torrents.into_iter().map(Into::into).collect(),
            error: None,
        },
        (Ok(counters), Err(e)) => AggregateStatus {
            counters: counters.into(),
            items: Vec::new(),
            error: Some(PollError::Partial {
                part: StatusPart::Items,
                reason: e.to_string(),
            }),
        },
        (Err(e), Ok(torrents)) => AggregateStatus {
            counters: TransferCounters::default(),
            items: torrents.into_iter().map(Into::into).collect(),
            error: Some(PollError::Partial {
                part: StatusPart::Counters,
                reason: e.to_string(),
            }),
        },
        (Err(counters), Err(items)) => AggregateStatus::failed(PollError::AllFetchesFailed {
            counters: counters.to_string(),
            items: items.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn default_status_serializes_zeroed_without_error() {
        let value = serde_json::to_value(AggregateStatus::default()).expect("serialize");
        assert_eq!(
            value,
            json!({
                "counters": {
                    "downloadRateBps": 0,
                    "uploadRateBps": 0,
                    "downloadedTotalBytes": 0,
                    "uploadedTotalBytes": 0
                },
                "items": []
            })
        );
    }

    #[test]
    fn error_serializes_as_message() {
        let status = AggregateStatus::failed(PollError::Partial {
            part: StatusPart::Items,
            reason: "Unexpected HTTP 500".into(),
        });
        let value = serde_json::to_value(&status).expect("serialize");
        assert_eq!(
            value["errorMessage"],
            "partial retrieval failure: torrent list unavailable (Unexpected HTTP 500)"
        );
        assert!(!status.is_complete());
    }
}
