//! Shared helpers for the provisioning contract tests

#![allow(dead_code)]

use std::sync::Arc;

use qip_core::Client;
use wiremock::MockServer;

pub const QIP_ORG: &str = "Example";

/// An authenticated client pointed at `server`
pub fn shared_client(server: &MockServer) -> Arc<Client> {
    let client = Client::new(&server.uri(), QIP_ORG)
        .expect("client construction succeeds")
        .with_token("TEST_TOKEN");
    Arc::new(client)
}

pub fn tenant_path(resource: &str) -> String {
    format!("/api/v1/{}/{}", QIP_ORG, resource)
}

pub fn stored_address(address: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "objectAddr": address,
        "subnetAddr": "192.0.2.0",
        "objectName": name,
        "objectClass": "Virtualized Server",
        "domainName": "int.example.com"
    })
}

pub fn a_record_json(owner: &str, address: &str) -> serde_json::Value {
    serde_json::json!({
        "owner": owner,
        "classType": "IN",
        "rrType": "A",
        "data1": address,
        "publishing": "ALWAYS",
        "ttl": -1,
        "infraType": "OBJECT",
        "infraAddr": address,
        "isCreatingReverseZoneRR": false,
        "isDefaultRR": false
    })
}
