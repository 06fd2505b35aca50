// navdeck-core: health-check policy, qBittorrent polling, and catalog sweeps
// between navdeck-api and the consumers (HTTP server, CLI).

pub mod catalog;
pub mod config;
pub mod control_plane;
pub mod convert;
pub mod error;
pub mod health;
pub mod monitor;
pub mod outcome;
pub mod probe;
pub mod status;
pub mod target;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{Catalog, Category, Service};
pub use config::{Credentials, MonitorConfig, TlsVerification};
pub use control_plane::{
    AggregateStatus, ControlPlaneEnvelope, ControlPlanePoller, ItemSummary, PollError, StatusPart,
    TransferCounters,
};
pub use error::{CoreError, TargetError};
pub use health::HealthChecker;
pub use monitor::{CatalogSource, Monitor, SweepEntry, SweepSnapshot};
pub use outcome::{HealthEnvelope, ProbeOutcome, Verdict};
pub use probe::Prober;
pub use status::{StatusReport, StatusService};
pub use target::{ProbeMethod, ProbeTarget, ServiceKind, normalize_input};

pub use navdeck_api::HttpMethod;
