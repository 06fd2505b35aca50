// qBittorrent Web API client modules
//
// Hand-written client for the `/api/v2` surface of the qBittorrent Web UI.
// Only the endpoints the dashboard needs are covered: login plus the two
// read-only status endpoints.

pub mod auth;
pub mod client;
pub mod models;
pub mod transfer;

pub use auth::SessionToken;
pub use client::QbitClient;
pub use models::{TorrentInfo, TransferInfo};
