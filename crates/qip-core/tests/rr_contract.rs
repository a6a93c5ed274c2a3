//! Contract Test: Resource Records
//!
//! Constraints verified:
//! - Listing queries `rr.json` by object address without default records
//! - Update sends the old and the updated record together
//! - Delete sends a single-delete descriptor
//! - Identity resolution: absent, unique, duplicated

mod common;

use common::*;
use qip_core::api::rr::{self, ResourceRecord};
use qip_core::identity::{encode_identity, resolve};
use qip_core::Error;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_rr_list(server: &MockServer, address: &str, records: &[serde_json::Value]) {
    Mock::given(method("GET"))
        .and(path(tenant_path("rr.json")))
        .and(query_param("address", address))
        .and(query_param("type", "OBJECT"))
        .and(query_param("getDefaultRRs", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rr_list(records)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn list_records_for_object() {
    let server = MockServer::start().await;
    mount_rr_list(
        &server,
        "192.0.2.50",
        &[
            a_record_json("*.test.int.example.com", "192.0.2.50", -1),
            a_record_json("www.int.example.com", "192.0.2.50", 3600),
        ],
    )
    .await;

    let client = test_client(&server);
    let records = rr::load_all_for_object(&client, "192.0.2.50").await.expect("list succeeds");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].owner, "*.test.int.example.com");
    assert_eq!(records[1].ttl, Some(3600));
}

#[tokio::test]
async fn create_posts_record() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(tenant_path("rr")))
        .and(body_json(serde_json::json!({
            "owner": "www.int.example.com",
            "classType": "IN",
            "rrType": "A",
            "data1": "192.0.2.50",
            "publishing": "ALWAYS",
            "ttl": -1,
            "infraType": "OBJECT",
            "infraAddr": "192.0.2.50",
            "isCreatingReverseZoneRR": false,
            "isDefaultRR": false
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let record = ResourceRecord::a_for_object("www.int.example.com", "192.0.2.50");
    rr::create(&client, &record).await.expect("create succeeds");
}

#[tokio::test]
async fn update_sends_old_and_new_record() {
    let server = MockServer::start().await;

    let old = ResourceRecord::a_for_object("www.int.example.com", "192.0.2.50");
    let mut updated = old.clone();
    updated.owner = "api.int.example.com".to_string();

    Mock::given(method("PUT"))
        .and(path(tenant_path("rr")))
        .and(body_json(serde_json::json!({
            "oldRRRec": serde_json::to_value(&old).unwrap(),
            "updatedRRRec": serde_json::to_value(&updated).unwrap(),
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    rr::update(&client, &old, &updated).await.expect("update succeeds");
}

#[tokio::test]
async fn delete_sends_single_delete_descriptor() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(tenant_path("rr")))
        .and(body_json(serde_json::json!({
            "owner": "www.int.example.com",
            "rrType": "A",
            "infraType": "OBJECT",
            "infraAddr": "192.0.2.50",
            "singleDelete": true
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let record = ResourceRecord::a_for_object("www.int.example.com", "192.0.2.50");
    rr::delete(&client, &record).await.expect("delete succeeds");
}

#[tokio::test]
async fn resolve_finds_unique_record() {
    let server = MockServer::start().await;
    mount_rr_list(
        &server,
        "192.0.2.50",
        &[
            a_record_json("www.int.example.com", "192.0.2.50", 3600),
            a_record_json("*.test.int.example.com", "192.0.2.50", 600),
        ],
    )
    .await;

    let client = test_client(&server);
    let wanted = ResourceRecord::a_for_object("*.test.int.example.com", "192.0.2.50");
    let token = encode_identity(&wanted).unwrap();

    let found = resolve(&client, &token)
        .await
        .expect("resolve succeeds")
        .expect("record exists");

    // TTL is not part of the identity, the stored value wins
    assert_eq!(found.owner, "*.test.int.example.com");
    assert_eq!(found.ttl, Some(600));
}

#[tokio::test]
async fn resolve_absent_record() {
    let server = MockServer::start().await;
    mount_rr_list(
        &server,
        "192.0.2.50",
        &[a_record_json("www.int.example.com", "192.0.2.50", -1)],
    )
    .await;

    let client = test_client(&server);
    let wanted = ResourceRecord::a_for_object("gone.int.example.com", "192.0.2.50");
    let token = encode_identity(&wanted).unwrap();

    assert!(resolve(&client, &token).await.expect("resolve succeeds").is_none());
}

#[tokio::test]
async fn resolve_duplicate_record() {
    let server = MockServer::start().await;
    mount_rr_list(
        &server,
        "192.0.2.50",
        &[
            a_record_json("www.int.example.com", "192.0.2.50", -1),
            a_record_json("www.int.example.com", "192.0.2.50", 3600),
        ],
    )
    .await;

    let client = test_client(&server);
    let wanted = ResourceRecord::a_for_object("www.int.example.com", "192.0.2.50");
    let token = encode_identity(&wanted).unwrap();

    let err = resolve(&client, &token).await.unwrap_err();
    assert!(matches!(err, Error::NonUniqueRecord), "got {:?}", err);
}

#[tokio::test]
async fn resolve_rejects_bad_tokens_without_requests() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    assert!(matches!(resolve(&client, "").await, Err(Error::IdRequired)));
    assert!(matches!(
        resolve(&client, "%%%").await,
        Err(Error::InvalidIdentity(_))
    ));

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}
