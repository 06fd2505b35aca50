//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use navdeck_config::ConfigError;
use navdeck_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Targets ──────────────────────────────────────────────────────
    #[error("{target} is down")]
    #[diagnostic(
        code(navdeck::target_down),
        help(
            "{reason}\n\
             Try a specific method with --method get, or --insecure for self-signed TLS."
        )
    )]
    TargetDown { target: String, reason: String },

    #[error("qBittorrent at {target} rejected the login")]
    #[diagnostic(
        code(navdeck::auth_failed),
        help(
            "{reason}\n\
             Set qbittorrent.username and NAVDECK_QB_PASSWORD (or qbittorrent.password_env)."
        )
    )]
    AuthFailed { target: String, reason: String },

    #[error("qBittorrent status for {target} is incomplete")]
    #[diagnostic(code(navdeck::partial_status), help("{reason}"))]
    Incomplete { target: String, reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid target: {reason}")]
    #[diagnostic(
        code(navdeck::invalid_target),
        help("Pass an absolute http:// or https:// URL.")
    )]
    InvalidTarget { reason: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(navdeck::validation))]
    Validation { field: String, reason: String },

    // ── Catalog ──────────────────────────────────────────────────────
    #[error("Could not load service catalog from {path}")]
    #[diagnostic(
        code(navdeck::catalog),
        help(
            "{reason}\n\
             Point --services or server.services_path at a services.yaml file."
        )
    )]
    Catalog { path: String, reason: String },

    // ── Server ───────────────────────────────────────────────────────
    #[error("Could not bind {addr}")]
    #[diagnostic(
        code(navdeck::bind_failed),
        help("Is another process using the port? Try --port.")
    )]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP client setup failed: {message}")]
    #[diagnostic(code(navdeck::client_setup))]
    ClientSetup { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(navdeck::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Bind { .. } => exit_code::CONNECTION,
            Self::InvalidTarget { .. } | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidTarget(e) => CliError::InvalidTarget {
                reason: e.to_string(),
            },
            CoreError::Catalog { message } => CliError::Catalog {
                path: "(catalog)".into(),
                reason: message,
            },
            CoreError::CatalogSyntax(e) => CliError::Catalog {
                path: "(catalog)".into(),
                reason: e.to_string(),
            },
            CoreError::ClientSetup { message } => CliError::ClientSetup { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navdeck_core::TargetError;

    #[test]
    fn invalid_target_is_a_usage_error() {
        let err = CliError::from(CoreError::InvalidTarget(TargetError::Empty));
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn down_target_exits_one() {
        let err = CliError::TargetDown {
            target: "http://nas.local/".into(),
            reason: "HTTP 502 Bad Gateway".into(),
        };
        assert_eq!(err.exit_code(), exit_code::GENERAL);
        assert_eq!(err.to_string(), "http://nas.local/ is down");
    }
}
