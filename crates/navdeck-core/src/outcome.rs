// ── Probe outcomes ──
//
// One probe, one record. The verdict is a tagged enum so a status code and
// a transport failure can never be reported at the same time; the flat
// JSON shape the dashboard consumes is produced only at serialization.

use std::time::Duration;

use serde::Serialize;
use serde::ser::SerializeStruct;

use navdeck_api::HttpMethod;

use crate::target::ProbeTarget;

/// Classification of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Responded with a status below 400.
    Reachable { status: u16 },
    /// Responded, but with 4xx/5xx. The server is up; the check failed.
    Rejected {
        status: u16,
        message: Option<String>,
    },
    /// No HTTP response at all: timeout, DNS, refused, TLS.
    Unreachable { message: String },
}

/// Result of probing one target with one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub method: HttpMethod,
    /// Wall time from request start to response headers or failure.
    pub elapsed: Duration,
    pub verdict: Verdict,
}

impl ProbeOutcome {
    /// Build an outcome from a received status code.
    pub fn from_status(
        method: HttpMethod,
        elapsed: Duration,
        status: u16,
        reason: Option<&str>,
    ) -> Self {
        let verdict = if status < 400 {
            Verdict::Reachable { status }
        } else {
            let message = match reason {
                Some(reason) => format!("HTTP {status} {reason}"),
                None => format!("HTTP {status}"),
            };
            Verdict::Rejected {
                status,
                message: Some(message),
            }
        };
        Self {
            method,
            elapsed,
            verdict,
        }
    }

    pub fn unreachable(method: HttpMethod, elapsed: Duration, message: impl Into<String>) -> Self {
        Self {
            method,
            elapsed,
            verdict: Verdict::Unreachable {
                message: message.into(),
            },
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.verdict, Verdict::Reachable { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self.verdict {
            Verdict::Reachable { status } | Verdict::Rejected { status, .. } => Some(status),
            Verdict::Unreachable { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.verdict {
            Verdict::Reachable { .. } => None,
            Verdict::Rejected { message, .. } => message.as_deref(),
            Verdict::Unreachable { message } => Some(message),
        }
    }

    /// 401/403: something is listening and enforcing access control.
    pub fn is_access_gated(&self) -> bool {
        matches!(self.status_code(), Some(401 | 403))
    }

    pub fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }

    /// Fill in a missing failure message from an earlier attempt.
    pub(crate) fn or_message(mut self, fallback: Option<&str>) -> Self {
        if let (Verdict::Rejected { message, .. }, Some(fallback)) = (&mut self.verdict, fallback) {
            if message.is_none() {
                *message = Some(fallback.to_owned());
            }
        }
        self
    }
}

impl Serialize for ProbeOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ProbeOutcome", 5)?;
        state.serialize_field("succeeded", &self.succeeded())?;
        match self.status_code() {
            Some(code) => state.serialize_field("statusCode", &code)?,
            None => state.skip_field("statusCode")?,
        }
        state.serialize_field("elapsedMillis", &self.elapsed_millis())?;
        state.serialize_field("methodUsed", &self.method)?;
        match self.error_message() {
            Some(message) => state.serialize_field("errorMessage", message)?,
            None => state.skip_field("errorMessage")?,
        }
        state.end()
    }
}

// ── Envelope ─────────────────────────────────────────────────────────

/// Response body for a generic health check.
#[derive(Debug, Clone, Serialize)]
pub struct HealthEnvelope {
    pub target: ProbeTarget,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
}
