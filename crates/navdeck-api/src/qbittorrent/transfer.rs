// qBittorrent status endpoints
//
// The two read-only calls behind the dashboard's transfer widget. Both are
// session-scoped and independent of each other.

use tracing::debug;

use crate::error::Error;
use crate::qbittorrent::auth::SessionToken;
use crate::qbittorrent::client::QbitClient;
use crate::qbittorrent::models::{TorrentInfo, TransferInfo};

impl QbitClient {
    /// Fetch global transfer counters.
    ///
    /// `GET /api/v2/transfer/info`
    pub async fn transfer_info(&self, session: &SessionToken) -> Result<TransferInfo, Error> {
        let url = self.api_url("transfer/info")?;
        debug!("fetching transfer info");
        self.get_json(url, session).await
    }

    /// List every torrent, fastest download first.
    ///
    /// `GET /api/v2/torrents/info?filter=all&sort=dlspeed&reverse=true`
    pub async fn torrents(&self, session: &SessionToken) -> Result<Vec<TorrentInfo>, Error> {
        let mut url = self.api_url("torrents/info")?;
        url.query_pairs_mut()
            .append_pair("filter", "all")
            .append_pair("sort", "dlspeed")
            .append_pair("reverse", "true");
        debug!("listing torrents");
        self.get_json(url, session).await
    }
}
