// ── API-to-domain type conversions ──
//
// Bridges raw qBittorrent wire types from `navdeck_api` into the public
// status model. Torrents are trimmed to the fields the dashboard renders,
// which also keeps the public contract independent of upstream additions.

use navdeck_api::{TorrentInfo, TransferInfo};

use crate::control_plane::{ItemSummary, TransferCounters};

impl From<TransferInfo> for TransferCounters {
    fn from(info: TransferInfo) -> Self {
        Self {
            download_rate_bps: info.dl_info_speed,
            upload_rate_bps: info.up_info_speed,
            downloaded_total_bytes: info.dl_info_data,
            uploaded_total_bytes: info.up_info_data,
        }
    }
}

impl From<TorrentInfo> for ItemSummary {
    fn from(t: TorrentInfo) -> Self {
        Self {
            name: t.name,
            id: t.hash,
            progress_fraction: t.progress.clamp(0.0, 1.0),
            download_rate_bps: t.dlspeed,
            upload_rate_bps: t.upspeed,
            state: t.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn torrent_is_trimmed_to_summary_fields() {
        let raw: TorrentInfo = serde_json::from_value(json!({
            "name": "ubuntu-24.04.iso",
            "hash": "f00d",
            "progress": 0.25,
            "dlspeed": 4096,
            "upspeed": 128,
            "state": "stalledDL",
            "save_path": "/downloads",
            "tracker": "udp://tracker.example:1337"
        }))
        .expect("torrent");

        let summary = ItemSummary::from(raw);
        let value = serde_json::to_value(&summary).expect("serialize");

        assert_eq!(
            value,
            json!({
                "name": "ubuntu-24.04.iso",
                "id": "f00d",
                "progressFraction": 0.25,
                "downloadRateBps": 4096,
                "uploadRateBps": 128,
                "state": "stalledDL"
            })
        );
    }

    #[test]
    fn transfer_info_maps_to_counters() {
        let counters = TransferCounters::from(TransferInfo {
            dl_info_speed: 1,
            up_info_speed: 2,
            dl_info_data: 3,
            up_info_data: 4,
        });
        assert_eq!(counters.download_rate_bps, 1);
        assert_eq!(counters.upload_rate_bps, 2);
        assert_eq!(counters.downloaded_total_bytes, 3);
        assert_eq!(counters.uploaded_total_bytes, 4);
    }
}
