// ── Adaptive health checker ──
//
// HEAD first because it is cheap; GET as a fallback because plenty of
// servers answer HEAD with 405/404/501 while serving GET fine. A 401/403 on
// HEAD already proves the service is up, so it short-circuits.

use std::time::Duration;

use navdeck_api::{HttpMethod, ProbeClient};
use tracing::debug;

use crate::outcome::ProbeOutcome;
use crate::probe::Prober;
use crate::target::{ProbeMethod, ProbeTarget};

/// Produces one verdict per target per call. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct HealthChecker<P = ProbeClient> {
    prober: P,
    timeout: Duration,
}

impl<P: Prober> HealthChecker<P> {
    /// `timeout` bounds each individual probe, so an `Auto` check can take
    /// up to twice as long.
    pub fn new(prober: P, timeout: Duration) -> Self {
        Self { prober, timeout }
    }

    /// Check `target` with the given method policy. Never fails.
    pub async fn check(&self, target: &ProbeTarget, method: ProbeMethod) -> ProbeOutcome {
        match method {
            ProbeMethod::Head => self.attempt(target, HttpMethod::Head).await,
            ProbeMethod::Get => self.attempt(target, HttpMethod::Get).await,
            ProbeMethod::Auto => self.check_auto(target).await,
        }
    }

    async fn check_auto(&self, target: &ProbeTarget) -> ProbeOutcome {
        let head = self.attempt(target, HttpMethod::Head).await;
        if head.succeeded() || head.is_access_gated() {
            return head;
        }

        debug!(
            target = %target,
            status = ?head.status_code(),
            "HEAD inconclusive, falling back to GET"
        );

        let get = self.attempt(target, HttpMethod::Get).await;
        if get.succeeded() {
            return get;
        }

        get.or_message(head.error_message())
    }

    async fn attempt(&self, target: &ProbeTarget, method: HttpMethod) -> ProbeOutcome {
        self.prober.probe(target, method, self.timeout).await
    }
}
