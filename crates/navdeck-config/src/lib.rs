//! Configuration for navdeck.
//!
//! Layered loading (defaults, TOML file, `NAVDECK_` environment), password
//! resolution for the qBittorrent login, and translation to
//! `navdeck_core::MonitorConfig`. The binary adds flag-aware overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use navdeck_core::{Credentials, MonitorConfig, TlsVerification};

/// Environment variable that always wins for the qBittorrent password.
pub const PASSWORD_ENV: &str = "NAVDECK_QB_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub health: HealthSection,

    #[serde(default)]
    pub qbittorrent: QbittorrentSection,

    #[serde(default)]
    pub monitor: MonitorSection,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to `services.yaml`.
    #[serde(default = "default_services_path")]
    pub services_path: PathBuf,

    /// Built dashboard client, served as static files.
    #[serde(default = "default_client_dist")]
    pub client_dist: PathBuf,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            services_path: default_services_path(),
            client_dist: default_client_dist(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3000
}
fn default_services_path() -> PathBuf {
    PathBuf::from("config/services.yaml")
}
fn default_client_dist() -> PathBuf {
    PathBuf::from("dist/client")
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HealthSection {
    /// Per-probe timeout.
    #[serde(default = "default_health_timeout")]
    pub timeout_ms: u64,
}

impl Default for HealthSection {
    fn default() -> Self {
        Self {
            timeout_ms: default_health_timeout(),
        }
    }
}

fn default_health_timeout() -> u64 {
    4000
}

#[derive(Debug, Deserialize, Serialize)]
pub struct QbittorrentSection {
    #[serde(default = "default_qb_username")]
    pub username: String,

    /// Plaintext password (prefer `password_env` or `NAVDECK_QB_PASSWORD`).
    pub password: Option<String>,

    /// Name of an environment variable holding the password.
    pub password_env: Option<String>,

    #[serde(default = "default_qb_timeout")]
    pub timeout_ms: u64,
}

impl Default for QbittorrentSection {
    fn default() -> Self {
        Self {
            username: default_qb_username(),
            password: None,
            password_env: None,
            timeout_ms: default_qb_timeout(),
        }
    }
}

fn default_qb_username() -> String {
    "admin".into()
}
fn default_qb_timeout() -> u64 {
    5000
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MonitorSection {
    /// Background sweep period; 0 disables it.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            concurrency: default_concurrency(),
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_interval() -> u64 {
    30
}
fn default_concurrency() -> usize {
    8
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "navdeck", "navdeck").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("navdeck");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from defaults, file, and environment.
///
/// `path` overrides the platform config location. A missing file is not an
/// error; the defaults and environment still apply.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("NAVDECK_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

impl Config {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.health.timeout_ms == 0 {
            return Err(ConfigError::Validation {
                field: "health.timeout_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.qbittorrent.timeout_ms == 0 {
            return Err(ConfigError::Validation {
                field: "qbittorrent.timeout_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.monitor.concurrency == 0 {
            return Err(ConfigError::Validation {
                field: "monitor.concurrency".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the qBittorrent password.
///
/// `NAVDECK_QB_PASSWORD`, then the variable named by `password_env`, then
/// the plaintext value, then the Web UI's factory default.
pub fn resolve_password(section: &QbittorrentSection) -> SecretString {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return SecretString::from(pw);
    }

    if let Some(ref env_name) = section.password_env {
        if let Ok(pw) = std::env::var(env_name) {
            return SecretString::from(pw);
        }
    }

    if let Some(ref pw) = section.password {
        return SecretString::from(pw.clone());
    }

    SecretString::from("admin")
}

/// Build a `MonitorConfig` from the loaded file, no CLI overrides.
pub fn to_monitor_config(cfg: &Config) -> MonitorConfig {
    let tls = if cfg.monitor.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.monitor.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    MonitorConfig {
        probe_timeout: Duration::from_millis(cfg.health.timeout_ms),
        control_plane_timeout: Duration::from_millis(cfg.qbittorrent.timeout_ms),
        credentials: Credentials {
            username: cfg.qbittorrent.username.clone(),
            password: resolve_password(&cfg.qbittorrent),
        },
        tls,
        sweep_interval: Duration::from_secs(cfg.monitor.interval_secs),
        sweep_concurrency: cfg.monitor.concurrency,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_apply_without_a_file() {
        Jail::expect_with(|jail| {
            let cfg = load_config(Some(&jail.directory().join("missing.toml"))).unwrap();
            assert_eq!(cfg.server.port, 3000);
            assert_eq!(cfg.server.host, "0.0.0.0");
            assert_eq!(cfg.health.timeout_ms, 4000);
            assert_eq!(cfg.qbittorrent.timeout_ms, 5000);
            assert_eq!(cfg.monitor.interval_secs, 30);
            Ok(())
        });
    }

    #[test]
    fn file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "navdeck.toml",
                r#"
                [server]
                port = 8080
                services_path = "/srv/services.yaml"

                [qbittorrent]
                username = "seedbox"
                "#,
            )?;
            jail.set_env("NAVDECK_SERVER__PORT", "9090");
            jail.set_env("NAVDECK_HEALTH__TIMEOUT_MS", "1500");

            let cfg = load_config(Some(&jail.directory().join("navdeck.toml"))).unwrap();
            assert_eq!(cfg.server.port, 9090);
            assert_eq!(cfg.server.services_path, PathBuf::from("/srv/services.yaml"));
            assert_eq!(cfg.health.timeout_ms, 1500);
            assert_eq!(cfg.qbittorrent.username, "seedbox");
            Ok(())
        });
    }

    #[test]
    fn zero_timeout_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("navdeck.toml", "[health]\ntimeout_ms = 0\n")?;
            let err = load_config(Some(&jail.directory().join("navdeck.toml"))).unwrap_err();
            assert!(matches!(err, ConfigError::Validation { .. }));
            Ok(())
        });
    }

    #[test]
    fn password_resolution_order() {
        Jail::expect_with(|jail| {
            assert_eq!(
                resolve_password(&QbittorrentSection::default()).expose_secret(),
                "admin"
            );

            let section = QbittorrentSection {
                password: Some("from-file".into()),
                password_env: Some("SEEDBOX_PW".into()),
                ..QbittorrentSection::default()
            };
            assert_eq!(resolve_password(&section).expose_secret(), "from-file");

            jail.set_env("SEEDBOX_PW", "from-named-env");
            assert_eq!(resolve_password(&section).expose_secret(), "from-named-env");

            jail.set_env(PASSWORD_ENV, "from-navdeck-env");
            assert_eq!(resolve_password(&section).expose_secret(), "from-navdeck-env");
            Ok(())
        });
    }

    #[test]
    fn monitor_config_translation() {
        let mut cfg = Config::default();
        cfg.monitor.insecure = true;
        cfg.monitor.interval_secs = 0;
        cfg.health.timeout_ms = 250;

        let monitor = to_monitor_config(&cfg);
        assert_eq!(monitor.tls, TlsVerification::DangerAcceptInvalid);
        assert!(monitor.sweep_interval.is_zero());
        assert_eq!(monitor.probe_timeout, Duration::from_millis(250));
        assert_eq!(monitor.credentials.username, "admin");
    }
}
