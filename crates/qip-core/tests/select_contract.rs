//! Contract Test: Address Selection
//!
//! Constraints verified:
//! - Select is `PUT selectedv4address/<subnet>.json`, with an `addrRange`
//!   body only when a range is given
//! - An empty selection is `NoSelection`
//! - Release is `DELETE selectedv4address/<addr>/`
//! - Select calls sharing a lock never overlap on the server
//! - The lock is released when the call fails

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use common::*;
use qip_core::{AddressRange, AddressSelector, Error, SelectLock};
use tokio::task::JoinSet;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

#[tokio::test]
async fn select_without_range() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(tenant_path("selectedv4address/192.0.2.0.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "objectAddr": "192.0.2.2",
            "subnetAddr": "192.0.2.0"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let selector = AddressSelector::new(SelectLock::new());

    let selected = selector
        .select_free(&client, "192.0.2.0", None)
        .await
        .expect("select succeeds");
    assert_eq!(selected.object_addr, "192.0.2.2");
    assert_eq!(selected.subnet_addr, "192.0.2.0");

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests[0].body.is_empty(), "no body without a range");
}

#[tokio::test]
async fn select_within_range() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(tenant_path("selectedv4address/192.0.2.0.json")))
        .and(body_json(serde_json::json!({
            "addrRange": [{ "startAddress": "192.0.2.25", "endAddress": "192.0.2.30" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "objectAddr": "192.0.2.25",
            "subnetAddr": "192.0.2.0"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let selector = AddressSelector::new(SelectLock::new());
    let range = AddressRange::new("192.0.2.25", "192.0.2.30");

    let selected = selector
        .select_free(&client, "192.0.2.0", Some(&range))
        .await
        .expect("select succeeds");
    assert_eq!(selected.object_addr, "192.0.2.25");
}

#[tokio::test]
async fn empty_selection_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "subnetAddr": "192.0.2.0"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let selector = AddressSelector::new(SelectLock::new());

    let err = selector.select_free(&client, "192.0.2.0", None).await.unwrap_err();
    assert!(matches!(err, Error::NoSelection), "got {:?}", err);
}

#[tokio::test]
async fn release_deletes_selection() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(tenant_path("selectedv4address/192.0.2.25/")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let selector = AddressSelector::new(SelectLock::new());

    selector
        .release_selected(&client, "192.0.2.25")
        .await
        .expect("release succeeds");
}

#[tokio::test]
async fn release_of_unknown_address_is_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": "Object not found"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let selector = AddressSelector::new(SelectLock::new());

    let err = selector.release_selected(&client, "192.0.2.77").await.unwrap_err();
    match err {
        Error::Server { message, .. } => assert_eq!(message, "Object not found"),
        other => panic!("expected server error, got {:?}", other),
    }
}

const SERVER_DELAY: Duration = Duration::from_millis(50);

/// Responder that fails any select arriving while another is still in flight
///
/// Each response is delayed by `SERVER_DELAY`; a caller that waits for its
/// response before sending the next request can never arrive sooner than that.
#[derive(Clone, Default)]
struct OverlapDetector {
    last_arrival: Arc<Mutex<Option<Instant>>>,
    overlaps: Arc<AtomicUsize>,
    served: Arc<AtomicUsize>,
}

impl Respond for OverlapDetector {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let now = Instant::now();
        let mut last = self.last_arrival.lock().unwrap();
        let overlapping = last.is_some_and(|prev| now.duration_since(prev) < SERVER_DELAY);
        *last = Some(now);

        if overlapping {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
            return ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": "java.lang.NullPointerException"
            }));
        }

        let n = self.served.fetch_add(1, Ordering::SeqCst);
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({
                "objectAddr": format!("192.0.2.{}", 10 + n),
                "subnetAddr": "192.0.2.0"
            }))
            .set_delay(SERVER_DELAY)
    }
}

#[tokio::test]
async fn concurrent_selects_are_serialized() {
    let server = MockServer::start().await;
    let detector = OverlapDetector::default();

    Mock::given(method("PUT"))
        .and(path(tenant_path("selectedv4address/192.0.2.0.json")))
        .respond_with(detector.clone())
        .mount(&server)
        .await;

    let client = Arc::new(test_client(&server));
    let selector = AddressSelector::new(SelectLock::new());

    let mut tasks = JoinSet::new();
    for _ in 0..5 {
        let client = Arc::clone(&client);
        let selector = selector.clone();
        tasks.spawn(async move { selector.select_free(&client, "192.0.2.0", None).await });
    }

    let mut selected = Vec::new();
    while let Some(result) = tasks.join_next().await {
        let address = result.expect("task completes").expect("select succeeds");
        selected.push(address.object_addr);
    }

    selected.sort();
    selected.dedup();
    assert_eq!(selected.len(), 5, "every caller got a distinct address");
    assert_eq!(detector.overlaps.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn independent_locks_do_overlap() {
    // Sanity check for the detector itself
    let server = MockServer::start().await;
    let detector = OverlapDetector::default();

    Mock::given(method("PUT"))
        .respond_with(detector.clone())
        .mount(&server)
        .await;

    let client = test_client(&server);
    let first = AddressSelector::new(SelectLock::new());
    let second = AddressSelector::new(SelectLock::new());

    let (a, b) = tokio::join!(
        first.select_free(&client, "192.0.2.0", None),
        second.select_free(&client, "192.0.2.0", None),
    );

    assert!(a.is_err() || b.is_err());
    assert_eq!(detector.overlaps.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn lock_is_released_after_failure() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "objectAddr": "192.0.2.3"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let selector = AddressSelector::new(SelectLock::new());

    let err = selector.select_free(&client, "192.0.2.0", None).await.unwrap_err();
    assert!(matches!(err, Error::Server { .. }), "got {:?}", err);

    let selected = tokio::time::timeout(
        Duration::from_secs(5),
        selector.select_free(&client, "192.0.2.0", None),
    )
    .await
    .expect("lock was released")
    .expect("select succeeds");
    assert_eq!(selected.object_addr, "192.0.2.3");
}

#[tokio::test]
async fn empty_subnet_is_rejected() {
    let server = MockServer::start().await;
    let client = test_client(&server);
    let selector = AddressSelector::default();

    let err = selector.select_free(&client, "", None).await.unwrap_err();
    assert!(matches!(err, Error::IdRequired), "got {:?}", err);

    let err = selector.release_selected(&client, "").await.unwrap_err();
    assert!(matches!(err, Error::IdRequired), "got {:?}", err);
}
