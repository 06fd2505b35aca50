// ── Status aggregation surface ──
//
// The single entry point the HTTP layer and the CLI talk to. Raw inputs are
// normalized and validated here, before any network I/O; everything after
// validation succeeds is folded into an outcome record.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use navdeck_api::ProbeClient;

use crate::config::MonitorConfig;
use crate::control_plane::{AggregateStatus, ControlPlaneEnvelope, ControlPlanePoller};
use crate::error::CoreError;
use crate::health::HealthChecker;
use crate::outcome::HealthEnvelope;
use crate::probe::Prober;
use crate::target::{ProbeMethod, ProbeTarget, ServiceKind};

/// Either kind of status report, serialized without a tag.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StatusReport {
    Health(HealthEnvelope),
    ControlPlane(ControlPlaneEnvelope),
}

impl StatusReport {
    /// Whether the target should be rendered as "up".
    pub fn is_up(&self) -> bool {
        match self {
            Self::Health(h) => h.outcome.succeeded(),
            Self::ControlPlane(c) => c.status.is_complete(),
        }
    }

    pub fn target(&self) -> &ProbeTarget {
        match self {
            Self::Health(h) => &h.target,
            Self::ControlPlane(c) => &c.target,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Health(h) => h.outcome.error_message().map(str::to_owned),
            Self::ControlPlane(c) => c.status.error_message(),
        }
    }
}

/// Health checks and control-plane polls behind one handle.
///
/// Cheap to share: wrap in an `Arc` and hand to every request.
#[derive(Debug)]
pub struct StatusService<P = ProbeClient> {
    checker: HealthChecker<P>,
    poller: ControlPlanePoller,
}

impl StatusService<ProbeClient> {
    pub fn new(config: &MonitorConfig) -> Result<Self, CoreError> {
        let prober = ProbeClient::new(&config.probe_transport())?;
        Ok(Self {
            checker: HealthChecker::new(prober, config.probe_timeout),
            poller: ControlPlanePoller::new(config)?,
        })
    }
}

impl<P: Prober> StatusService<P> {
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Reachability check for a raw (query-string) URL.
    #[instrument(skip(self), level = "debug")]
    pub async fn health(
        &self,
        raw_url: &str,
        method_hint: Option<&str>,
    ) -> Result<HealthEnvelope, CoreError> {
        let target = ProbeTarget::from_query(raw_url)?;
        let method = ProbeMethod::from_hint(method_hint);
        Ok(self.check_target(target, method).await)
    }

    /// qBittorrent status for a raw (query-string) base URL.
    #[instrument(skip(self), level = "debug")]
    pub async fn control_plane(&self, raw_url: &str) -> Result<ControlPlaneEnvelope, CoreError> {
        let target = ProbeTarget::from_query(raw_url)?;
        Ok(self.poll_target(target).await)
    }

    /// Dispatch on `kind`: control-plane services are polled, everything
    /// else gets a reachability check.
    pub async fn status(
        &self,
        raw_url: &str,
        method_hint: Option<&str>,
        kind: ServiceKind,
    ) -> Result<StatusReport, CoreError> {
        let target = ProbeTarget::from_query(raw_url)?;
        Ok(self.report(target, ProbeMethod::from_hint(method_hint), kind).await)
    }

    /// Same as [`status`](Self::status) for an already validated target.
    pub async fn report(
        &self,
        target: ProbeTarget,
        method: ProbeMethod,
        kind: ServiceKind,
    ) -> StatusReport {
        if kind.is_control_plane() {
            StatusReport::ControlPlane(self.poll_target(target).await)
        } else {
            StatusReport::Health(self.check_target(target, method).await)
        }
    }

    /// Reachability check for an already validated target.
    pub async fn check_target(&self, target: ProbeTarget, method: ProbeMethod) -> HealthEnvelope {
        let outcome = self.checker.check(&target, method).await;
        debug!(target = %target, succeeded = outcome.succeeded(), "health check done");
        HealthEnvelope { target, outcome }
    }

    pub async fn poll_target(&self, target: ProbeTarget) -> ControlPlaneEnvelope {
        let status: AggregateStatus = self.poller.poll(&target).await;
        ControlPlaneEnvelope { target, status }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::TargetError;

    fn service() -> StatusService {
        let config = MonitorConfig {
            probe_timeout: Duration::from_millis(500),
            control_plane_timeout: Duration::from_millis(500),
            ..MonitorConfig::default()
        };
        StatusService::new(&config).expect("service")
    }

    #[tokio::test]
    async fn empty_url_is_rejected_before_io() {
        let err = service().health("", None).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidTarget(TargetError::Empty)));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn whitespace_url_is_rejected() {
        let err = service().control_plane("   ").await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidTarget(TargetError::Empty)));
    }

    #[tokio::test]
    async fn malformed_url_is_rejected() {
        let err = service().health("not a url", Some("head")).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidTarget(TargetError::Malformed { .. })));
    }

    #[tokio::test]
    async fn non_http_scheme_is_rejected() {
        let err = service()
            .status("ftp://files.local/", None, ServiceKind::Web)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidTarget(TargetError::UnsupportedScheme { .. })
        ));
    }
}
