//! Integration tests for probe classification over the wire

use std::time::Duration;

use sitewatch::ProbeStatus;
use sitewatch::monitors::probe::{HttpProber, ProbeTarget};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn target(url: String, accept_unauthorized: bool) -> ProbeTarget {
    ProbeTarget {
        name: "test".to_string(),
        url,
        accept_unauthorized,
    }
}

fn prober() -> HttpProber {
    HttpProber::new(Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn ok_response_is_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = prober().probe(&target(format!("{}/", server.uri()), false)).await;

    assert_eq!(result.status, ProbeStatus::Up);
    assert_eq!(result.code, 200);
    assert!(result.error.is_empty());
}

#[tokio::test]
async fn unauthorized_is_up_only_for_the_auth_target() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let auth = prober()
        .probe(&target(format!("{}/api/auth/validate", server.uri()), true))
        .await;
    assert_eq!(auth.status, ProbeStatus::Up);
    assert_eq!(auth.code, 401);
    assert!(auth.error.is_empty());

    let plain = prober().probe(&target(format!("{}/", server.uri()), false)).await;
    assert_eq!(plain.status, ProbeStatus::Down);
    assert_eq!(plain.code, 401);
    assert!(plain.error.contains("401"));
}

#[tokio::test]
async fn server_error_is_down_with_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = prober().probe(&target(format!("{}/", server.uri()), false)).await;

    assert_eq!(result.status, ProbeStatus::Down);
    assert_eq!(result.code, 503);
    assert!(result.error.contains("503"));
}

#[tokio::test]
async fn connection_failure_is_down_with_zero_code() {
    // Nothing listens on this port.
    let result = prober()
        .probe(&target("http://127.0.0.1:9/".to_string(), false))
        .await;

    assert_eq!(result.status, ProbeStatus::Down);
    assert_eq!(result.code, 0);
    assert!(!result.error.is_empty());
}

#[tokio::test]
async fn latency_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(50)))
        .mount(&server)
        .await;

    let result = prober().probe(&target(format!("{}/", server.uri()), false)).await;

    assert!(result.latency_ms >= 50);
}
