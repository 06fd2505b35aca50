// qBittorrent Web API response types
//
// Only the fields navdeck reads are modeled explicitly. Fields use
// `#[serde(default)]` because older Web API versions omit some of them;
// torrents keep everything else in `extra` so nothing is lost in debugging.

use serde::{Deserialize, Serialize};

/// Global transfer counters from `GET /api/v2/transfer/info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferInfo {
    /// Global download rate, bytes/second.
    #[serde(default)]
    pub dl_info_speed: u64,
    /// Global upload rate, bytes/second.
    #[serde(default)]
    pub up_info_speed: u64,
    /// Bytes downloaded this session.
    #[serde(default)]
    pub dl_info_data: u64,
    /// Bytes uploaded this session.
    #[serde(default)]
    pub up_info_data: u64,
}

/// One entry from `GET /api/v2/torrents/info`.
///
/// The API returns 50+ fields per torrent; everything not listed here
/// lands in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hash: String,
    /// 0.0 to 1.0
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub dlspeed: u64,
    #[serde(default)]
    pub upspeed: u64,
    /// `downloading`, `stalledUP`, `pausedDL`, ... (open set, varies by version)
    #[serde(default)]
    pub state: String,
    /// Catch-all for the fields we do not read.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
