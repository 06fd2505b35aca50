// ── Core error types ──
//
// Errors that cross the navdeck-core boundary. Probe and poll failures never
// show up here: those are folded into outcome records. What remains is input
// validation, catalog parsing, and setup problems.

use thiserror::Error;

/// Why a raw string is not a usable probe target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("target URL is empty")]
    Empty,

    #[error("'{input}' is not a valid URL: {reason}")]
    Malformed { input: String, reason: String },

    #[error("only http and https targets are supported, got '{scheme}'")]
    UnsupportedScheme { scheme: String },
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation ───────────────────────────────────────────────────
    #[error(transparent)]
    InvalidTarget(#[from] TargetError),

    // ── Catalog ──────────────────────────────────────────────────────
    #[error("Invalid service catalog: {message}")]
    Catalog { message: String },

    #[error("Failed to parse service catalog: {0}")]
    CatalogSyntax(#[from] serde_yaml::Error),

    // ── Setup ────────────────────────────────────────────────────────
    #[error("HTTP client setup failed: {message}")]
    ClientSetup { message: String },
}

impl CoreError {
    /// Returns `true` when the caller supplied bad input (maps to HTTP 400).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidTarget(_))
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<navdeck_api::Error> for CoreError {
    fn from(err: navdeck_api::Error) -> Self {
        CoreError::ClientSetup {
            message: err.to_string(),
        }
    }
}
