//! Test doubles and common utilities for the QIP contract tests
//!
//! Every test runs against its own `wiremock` server standing in for QIP.

#![allow(dead_code)]

use qip_core::Client;
use wiremock::MockServer;

pub const QIP_ORG: &str = "Example";
pub const TEST_TOKEN: &str = "TEST_TOKEN";

/// A client pointed at `server`, already holding a token
pub fn test_client(server: &MockServer) -> Client {
    Client::new(&server.uri(), QIP_ORG)
        .expect("client construction succeeds")
        .with_token(TEST_TOKEN)
}

/// A client pointed at `server` without a token
pub fn anonymous_client(server: &MockServer) -> Client {
    Client::new(&server.uri(), QIP_ORG).expect("client construction succeeds")
}

/// Path below the tenant scope, e.g. `tenant_path("v4address")`
pub fn tenant_path(resource: &str) -> String {
    format!("/api/v1/{}/{}", QIP_ORG, resource)
}

/// A record list response as QIP returns it
pub fn rr_list(records: &[serde_json::Value]) -> serde_json::Value {
    serde_json::json!({ "list": records })
}

/// An A record attached to an object, in QIP wire format
pub fn a_record_json(owner: &str, address: &str, ttl: i64) -> serde_json::Value {
    serde_json::json!({
        "owner": owner,
        "classType": "IN",
        "rrType": "A",
        "data1": address,
        "publishing": "ALWAYS",
        "ttl": ttl,
        "infraType": "OBJECT",
        "infraAddr": address,
        "tombstoned": 0,
        "isCreatingReverseZoneRR": false,
        "isDefaultRR": false
    })
}
