// ── Prober seam ──
//
// The health policy is written against this trait so it can be exercised
// with scripted responses. The production implementation wraps
// `navdeck_api::ProbeClient` and never fails: every transport error becomes
// an `Unreachable` verdict with the time spent so far.

use std::future::Future;
use std::time::{Duration, Instant};

use navdeck_api::{HttpMethod, ProbeClient};
use tracing::debug;

use crate::outcome::ProbeOutcome;
use crate::target::ProbeTarget;

/// Issues exactly one probe and reports the outcome.
pub trait Prober: Send + Sync {
    fn probe(
        &self,
        target: &ProbeTarget,
        method: HttpMethod,
        timeout: Duration,
    ) -> impl Future<Output = ProbeOutcome> + Send;
}

impl Prober for ProbeClient {
    async fn probe(
        &self,
        target: &ProbeTarget,
        method: HttpMethod,
        timeout: Duration,
    ) -> ProbeOutcome {
        let started = Instant::now();
        let result = self.send(target.url(), method, timeout).await;
        let elapsed = started.elapsed();

        match result {
            Ok(resp) => {
                debug!(%method, target = %target, status = resp.status, ?elapsed, "probe answered");
                ProbeOutcome::from_status(method, elapsed, resp.status, resp.reason)
            }
            Err(e) => {
                debug!(%method, target = %target, error = %e, ?elapsed, "probe failed");
                ProbeOutcome::unreachable(method, elapsed, e.to_string())
            }
        }
    }
}
