#![allow(clippy::unwrap_used)]
// End-to-end checks through `StatusService` and `Monitor` against wiremock.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use navdeck_core::{
    Catalog, CatalogSource, CoreError, HttpMethod, Monitor, MonitorConfig, ServiceKind,
    StatusReport, StatusService,
};

fn service() -> Arc<StatusService> {
    let config = MonitorConfig {
        probe_timeout: Duration::from_secs(2),
        control_plane_timeout: Duration::from_secs(2),
        ..MonitorConfig::default()
    };
    StatusService::new(&config).unwrap().into_shared()
}

// ── Health ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_head_success_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = service().health(&server.uri(), None).await.unwrap();

    assert!(envelope.outcome.succeeded());
    assert_eq!(envelope.outcome.method, HttpMethod::Head);

    let value = serde_json::to_value(&envelope).unwrap();
    assert_eq!(value["succeeded"], true);
    assert_eq!(value["statusCode"], 200);
    assert_eq!(value["methodUsed"], "HEAD");
    assert!(value.get("errorMessage").is_none());
}

#[tokio::test]
async fn test_head_not_allowed_falls_back_to_get() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = service().health(&server.uri(), Some("auto")).await.unwrap();

    assert!(envelope.outcome.succeeded());
    assert_eq!(envelope.outcome.method, HttpMethod::Get);
}

#[tokio::test]
async fn test_forbidden_head_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let envelope = service().health(&server.uri(), None).await.unwrap();

    assert!(!envelope.outcome.succeeded());
    assert_eq!(envelope.outcome.status_code(), Some(403));
    assert!(envelope.outcome.error_message().unwrap().contains("403"));
}

#[tokio::test]
async fn test_explicit_get_skips_head() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = service().health(&server.uri(), Some("get")).await.unwrap();

    assert!(!envelope.outcome.succeeded());
    assert_eq!(envelope.outcome.status_code(), Some(503));
}

#[tokio::test]
async fn test_percent_encoded_query_value_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/app"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let encoded = urlencoding::encode(&format!("{}/app", server.uri())).into_owned();
    let envelope = service().health(&format!("  {encoded} "), None).await.unwrap();

    assert!(envelope.outcome.succeeded());
    assert!(envelope.target.as_str().ends_with("/app"));
}

#[tokio::test]
async fn test_unreachable_target_reports_message() {
    // Grab a free port, then release it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let uri = format!("http://127.0.0.1:{port}");

    let envelope = service().health(&uri, None).await.unwrap();

    assert!(!envelope.outcome.succeeded());
    assert_eq!(envelope.outcome.status_code(), None);
    assert!(!envelope.outcome.error_message().unwrap().is_empty());
}

#[tokio::test]
async fn test_envelope_echoes_input_target() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    // No trailing slash: the parsed URL would gain one, the echo must not.
    let raw = server.uri();
    let envelope = service().health(&raw, Some("head")).await.unwrap();

    let value = serde_json::to_value(&envelope).unwrap();
    assert_eq!(value["target"], raw.as_str());
    assert!(!raw.ends_with('/'));
    assert!(envelope.outcome.succeeded());
}

// ── Dispatch ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_status_dispatches_on_kind() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Fails."))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let service = service();
    let web = service.status(&server.uri(), None, ServiceKind::Web).await.unwrap();
    let qb = service
        .status(&server.uri(), None, ServiceKind::Qbittorrent)
        .await
        .unwrap();

    assert!(matches!(web, StatusReport::Health(_)));
    assert!(web.is_up());
    assert!(matches!(qb, StatusReport::ControlPlane(_)));
    assert!(!qb.is_up());

    let value = serde_json::to_value(&qb).unwrap();
    assert_eq!(value["items"], json!([]));
    assert!(value["errorMessage"].as_str().unwrap().contains("authentication"));
}

// ── Sweep ───────────────────────────────────────────────────────────

struct FixedCatalog(String);

impl CatalogSource for FixedCatalog {
    async fn load(&self) -> Result<Catalog, CoreError> {
        Catalog::from_yaml(&self.0)
    }
}

fn catalog_yaml(server: &MockServer) -> String {
    format!(
        "- Apps:\n    - Up:\n        href: {uri}/up\n    - Down:\n        href: {uri}/down\n    - Wiki:\n        href: /wiki\n",
        uri = server.uri()
    )
}

async fn mount_up_down(server: &MockServer) {
    Mock::given(method("HEAD"))
        .and(path("/up"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sweep_checks_every_probeable_entry_in_order() {
    let server = MockServer::start().await;
    mount_up_down(&server).await;

    let catalog = Catalog::from_yaml(&catalog_yaml(&server)).unwrap();
    let monitor = Monitor::new(service(), 4);

    assert!(monitor.latest().entries.is_empty());
    let snapshot = monitor.sweep(&catalog).await;

    let names: Vec<_> = snapshot.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Up", "Down"]);
    assert_eq!(snapshot.up_count(), 1);
    assert!(snapshot.completed_at.is_some());
    assert_eq!(monitor.latest().entries.len(), 2);

    let value = serde_json::to_value(&*snapshot).unwrap();
    assert_eq!(value["entries"][0]["category"], "Apps");
    assert_eq!(value["entries"][1]["succeeded"], false);
}

#[tokio::test]
async fn test_background_sweep_publishes_and_stops() {
    let server = MockServer::start().await;
    mount_up_down(&server).await;

    let monitor = Monitor::new(service(), 2);
    monitor
        .start(Duration::from_millis(50), FixedCatalog(catalog_yaml(&server)))
        .await;

    let mut published = false;
    for _ in 0..100 {
        if !monitor.latest().entries.is_empty() {
            published = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    monitor.shutdown().await;

    assert!(published, "no sweep published within two seconds");
}

#[tokio::test]
async fn test_zero_interval_never_sweeps() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let monitor = Monitor::new(service(), 2);
    monitor.start(Duration::ZERO, FixedCatalog(catalog_yaml(&server))).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    monitor.shutdown().await;

    assert!(monitor.latest().entries.is_empty());
}
