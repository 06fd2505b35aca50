// ── Background catalog sweep ──
//
// Checks every catalog entry on a fixed interval and publishes the results
// as an immutable snapshot. Readers never block the sweeper: the snapshot is
// swapped atomically once a sweep completes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use navdeck_api::ProbeClient;

use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::probe::Prober;
use crate::status::{StatusReport, StatusService};
use crate::target::{ProbeMethod, ProbeTarget, ServiceKind};

/// Where the sweeper gets the catalog from. Called once per sweep so
/// edits to `services.yaml` are picked up without a restart.
pub trait CatalogSource: Send + Sync + 'static {
    fn load(&self) -> impl Future<Output = Result<Catalog, CoreError>> + Send;
}

/// One checked catalog entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepEntry {
    pub category: String,
    pub name: String,
    pub checked_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: StatusReport,
}

/// Results of the most recent completed sweep.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub entries: Vec<SweepEntry>,
}

impl SweepSnapshot {
    pub fn up_count(&self) -> usize {
        self.entries.iter().filter(|e| e.report.is_up()).count()
    }
}

/// An owned unit of sweep work, detached from the catalog borrow.
struct SweepJob {
    category: String,
    name: String,
    kind: ServiceKind,
    target: ProbeTarget,
}

// ── Monitor ──────────────────────────────────────────────────────────

/// Owns the latest sweep snapshot and the background sweep task.
///
/// Cheaply cloneable via `Arc<MonitorInner>`.
pub struct Monitor<P = ProbeClient> {
    inner: Arc<MonitorInner<P>>,
}

struct MonitorInner<P> {
    service: Arc<StatusService<P>>,
    latest: ArcSwap<SweepSnapshot>,
    concurrency: usize,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<P> Clone for Monitor<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Prober + 'static> Monitor<P> {
    pub fn new(service: Arc<StatusService<P>>, concurrency: usize) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                service,
                latest: ArcSwap::from_pointee(SweepSnapshot::default()),
                concurrency: concurrency.max(1),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The most recent completed sweep. Empty until the first one finishes.
    pub fn latest(&self) -> Arc<SweepSnapshot> {
        self.inner.latest.load_full()
    }

    /// Check every entry in `catalog` once and publish the result.
    ///
    /// Entries whose monitor URL isn't an absolute http(s) URL are skipped.
    pub async fn sweep(&self, catalog: &Catalog) -> Arc<SweepSnapshot> {
        let jobs: Vec<SweepJob> = catalog
            .entries()
            .filter_map(|(category, svc)| {
                let Some(target) = svc.monitor_target() else {
                    debug!(service = %svc.name, url = svc.monitor_url(), "not probeable, skipping");
                    return None;
                };
                Some(SweepJob {
                    category: category.to_owned(),
                    name: svc.name.clone(),
                    kind: svc.kind,
                    target,
                })
            })
            .collect();

        let service = Arc::clone(&self.inner.service);
        let mut entries: Vec<(usize, SweepEntry)> = stream::iter(jobs.into_iter().enumerate())
            .map(move |(idx, job)| {
                let service = Arc::clone(&service);
                async move {
                    let report = service.report(job.target, ProbeMethod::Auto, job.kind).await;
                    let entry = SweepEntry {
                        category: job.category,
                        name: job.name,
                        checked_at: Utc::now(),
                        report,
                    };
                    (idx, entry)
                }
            })
            .buffer_unordered(self.inner.concurrency)
            .collect()
            .await;

        // buffer_unordered completes in any order; keep catalog order.
        entries.sort_by_key(|(idx, _)| *idx);
        let entries: Vec<SweepEntry> = entries.into_iter().map(|(_, entry)| entry).collect();

        let snapshot = Arc::new(SweepSnapshot {
            completed_at: Some(Utc::now()),
            entries,
        });
        self.inner.latest.store(Arc::clone(&snapshot));

        info!(
            checked = snapshot.entries.len(),
            up = snapshot.up_count(),
            "sweep complete"
        );
        snapshot
    }

    /// Spawn the periodic sweep. A zero interval leaves the monitor idle.
    pub async fn start<S: CatalogSource>(&self, interval: Duration, source: S) {
        if interval.is_zero() {
            info!("background sweep disabled");
            return;
        }
        let monitor = self.clone();
        let cancel = self.inner.cancel.clone();
        let handle = tokio::spawn(sweep_task(monitor, interval, source, cancel));
        self.inner.task_handles.lock().await.push(handle);
    }

    /// Cancel background work and wait for it to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("monitor stopped");
    }
}

// ── Background task ──────────────────────────────────────────────────

async fn sweep_task<P: Prober + 'static, S: CatalogSource>(
    monitor: Monitor<P>,
    interval: Duration,
    source: S,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                match source.load().await {
                    Ok(catalog) => {
                        monitor.sweep(&catalog).await;
                    }
                    Err(e) => warn!(error = %e, "catalog unavailable, sweep skipped"),
                }
            }
        }
    }
}
