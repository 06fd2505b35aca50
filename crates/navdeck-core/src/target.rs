// ── Probe targets and method policy ──
//
// Everything the monitor accepts from the outside world is a string. This
// module turns those strings into validated values before any I/O happens.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::TargetError;

// ── ProbeTarget ─────────────────────────────────────────────────────

/// An absolute `http`/`https` URL that is safe to probe.
///
/// Keeps the caller's string next to the parsed URL: envelopes echo the
/// input verbatim so clients can match responses to their own keys, while
/// requests go through the normalized [`Url`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProbeTarget {
    input: String,
    url: Url,
}

impl ProbeTarget {
    /// Validate `raw` as-is (no decoding, no trimming).
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        if raw.is_empty() {
            return Err(TargetError::Empty);
        }

        let url = Url::parse(raw).map_err(|e| TargetError::Malformed {
            input: raw.to_owned(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(Self {
                input: raw.to_owned(),
                url,
            }),
            other => Err(TargetError::UnsupportedScheme {
                scheme: other.to_owned(),
            }),
        }
    }

    /// Normalize a query-string value and validate it.
    ///
    /// The value is percent-decoded once more (clients often double-encode),
    /// falling back to the raw value when it is not valid percent-encoded
    /// UTF-8, then trimmed.
    pub fn from_query(raw: &str) -> Result<Self, TargetError> {
        Self::parse(&normalize_input(raw))
    }

    /// The parsed URL requests are sent to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The validated input string, exactly as given.
    pub fn as_str(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProbeTarget {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ProbeTarget {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Percent-decode with graceful fallback, then trim.
pub fn normalize_input(raw: &str) -> String {
    let decoded = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
    decoded.trim().to_owned()
}

// ── ProbeMethod ─────────────────────────────────────────────────────

/// Probe method policy. `Auto` is not a wire method: it expands to
/// HEAD with a GET fallback.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProbeMethod {
    Head,
    Get,
    #[default]
    Auto,
}

impl ProbeMethod {
    /// Interpret an optional query hint. Only the exact lowercase values
    /// `head` and `get` select a fixed method; anything else is `Auto`.
    pub fn from_hint(hint: Option<&str>) -> Self {
        hint.and_then(|h| h.parse().ok()).unwrap_or_default()
    }
}

// ── ServiceKind ─────────────────────────────────────────────────────

/// How a catalog entry is monitored.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ServiceKind {
    /// Plain reachability check.
    #[default]
    Web,
    /// qBittorrent Web UI: polled for transfer statistics.
    Qbittorrent,
}

impl ServiceKind {
    /// Map a free-form `type` label. Unknown labels are plain web services.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("qbittorrent") {
            Self::Qbittorrent
        } else {
            Self::Web
        }
    }

    pub fn is_control_plane(self) -> bool {
        matches!(self, Self::Qbittorrent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        let target = ProbeTarget::parse("https://jellyfin.nas.local:8920/web").expect("valid");
        assert_eq!(target.url().scheme(), "https");
        assert_eq!(target.as_str(), "https://jellyfin.nas.local:8920/web");
        assert!(ProbeTarget::parse("http://10.0.0.2").is_ok());
    }

    #[test]
    fn rejects_non_http_inputs() {
        assert_eq!(ProbeTarget::parse(""), Err(TargetError::Empty));
        assert_eq!(
            ProbeTarget::parse("ftp://x"),
            Err(TargetError::UnsupportedScheme {
                scheme: "ftp".into()
            })
        );
        assert!(matches!(
            ProbeTarget::parse("not a url"),
            Err(TargetError::Malformed { .. })
        ));
        assert!(matches!(
            ProbeTarget::parse("javascript:alert(1)"),
            Err(TargetError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn from_query_decodes_and_trims() {
        let target =
            ProbeTarget::from_query("  http%3A%2F%2Fnas.local%3A8080%2F  ").expect("valid");
        assert_eq!(target.as_str(), "http://nas.local:8080/");
    }

    #[test]
    fn keeps_input_spelling() {
        let target = ProbeTarget::parse("http://NAS.Local:80").expect("valid");
        assert_eq!(target.as_str(), "http://NAS.Local:80");
        assert_eq!(target.to_string(), "http://NAS.Local:80");
        assert_eq!(target.url().as_str(), "http://nas.local/");
    }

    #[test]
    fn from_query_falls_back_to_raw_on_bad_encoding() {
        // %FF is not valid UTF-8 once decoded
        assert_eq!(normalize_input(" http://nas.local/%FF "), "http://nas.local/%FF");
        assert_eq!(ProbeTarget::from_query("   "), Err(TargetError::Empty));
    }

    #[test]
    fn method_hint_defaults_to_auto() {
        assert_eq!(ProbeMethod::from_hint(Some("head")), ProbeMethod::Head);
        assert_eq!(ProbeMethod::from_hint(Some("get")), ProbeMethod::Get);
        assert_eq!(ProbeMethod::from_hint(Some("auto")), ProbeMethod::Auto);
        assert_eq!(ProbeMethod::from_hint(Some("POST")), ProbeMethod::Auto);
        assert_eq!(ProbeMethod::from_hint(None), ProbeMethod::Auto);
    }

    #[test]
    fn service_kind_from_label() {
        assert_eq!(ServiceKind::from_label("qbittorrent"), ServiceKind::Qbittorrent);
        assert_eq!(ServiceKind::from_label(" qBittorrent "), ServiceKind::Qbittorrent);
        assert_eq!(ServiceKind::from_label("plex"), ServiceKind::Web);
    }
}
