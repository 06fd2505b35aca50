// ── Runtime monitor configuration ──
//
// These types describe *how* to probe and poll. They carry credential data
// and timeouts, but never touch disk or the environment. The binary builds
// a `MonitorConfig` (via navdeck-config) and hands it in.

use std::time::Duration;

use secrecy::SecretString;

use navdeck_api::{TlsMode, TransportConfig};

/// Control-plane login. `Debug` on `SecretString` is redacted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed homelab certs).
    DangerAcceptInvalid,
}

/// Everything the monitor needs, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Per-probe timeout for health checks.
    pub probe_timeout: Duration,
    /// Per-call timeout for control-plane login and fetches.
    pub control_plane_timeout: Duration,
    /// qBittorrent Web UI login.
    pub credentials: Credentials,
    pub tls: TlsVerification,
    /// Background sweep period. Zero disables the background sweep.
    pub sweep_interval: Duration,
    /// Maximum catalog entries checked at once during a sweep.
    pub sweep_concurrency: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(4000),
            control_plane_timeout: Duration::from_millis(5000),
            credentials: Credentials::new("admin", "admin"),
            tls: TlsVerification::default(),
            sweep_interval: Duration::from_secs(30),
            sweep_concurrency: 8,
        }
    }
}

impl MonitorConfig {
    pub(crate) fn probe_transport(&self) -> TransportConfig {
        TransportConfig::new(tls_to_transport(&self.tls), self.probe_timeout)
    }

    pub(crate) fn control_plane_transport(&self) -> TransportConfig {
        TransportConfig::new(tls_to_transport(&self.tls), self.control_plane_timeout)
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
