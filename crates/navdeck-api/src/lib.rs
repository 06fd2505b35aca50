// navdeck-api: Async HTTP clients for navdeck (reachability probes + qBittorrent Web API)

pub mod error;
pub mod probe;
pub mod qbittorrent;
pub mod transport;

pub use error::Error;
pub use probe::{HttpMethod, ProbeClient, ProbeResponse};
pub use qbittorrent::{QbitClient, SessionToken, TorrentInfo, TransferInfo};
pub use transport::{TlsMode, TransportConfig};
