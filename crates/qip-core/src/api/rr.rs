// # Resource Records
//
// Accessors for DNS resource records attached to QIP objects.
//
// QIP assigns no identifier to a resource record. See `crate::identity` for
// how a record is identified and re-located.
//
// ## API Reference
//
// - List:   GET    `/api/v1/<org>/rr.json?address=<addr>&type=OBJECT&getDefaultRRs=false`
// - Create: POST   `/api/v1/<org>/rr` with the record
// - Update: PUT    `/api/v1/<org>/rr` with `{oldRRRec, updatedRRRec}`
// - Delete: DELETE `/api/v1/<org>/rr` with a `DeleteInfo`

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::transport::ApiRequest;

const RESOURCE: &str = "rr";
const LIST_RESOURCE: &str = "rr.json";

/// Publish the record in all cases
pub const PUBLISHING_ALWAYS: &str = "ALWAYS";

/// Record belongs to an object (address)
pub const INFRA_TYPE_OBJECT: &str = "OBJECT";

pub const CLASS_IN: &str = "IN";
pub const TYPE_A: &str = "A";

/// TTL value telling QIP to use the zone default
pub const TTL_ZONE_DEFAULT: i64 = -1;

/// A DNS resource record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// Fully qualified owner name (e.g. "*.test.int.example.com")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rr_type: String,

    /// Record data, e.g. the address of an A record
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data1: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publishing: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub infra_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub infra_addr: String,

    #[serde(default, rename = "infraFQDN", skip_serializing_if = "String::is_empty")]
    pub infra_fqdn: String,

    #[serde(default, rename = "isCreatingReverseZoneRR")]
    pub is_creating_reverse_zone_rr: bool,

    #[serde(default, rename = "isDefaultRR")]
    pub is_default_rr: bool,
}

impl ResourceRecord {
    /// An A record belonging to the object at `address`
    ///
    /// `owner` is the FQDN of the DNS entry.
    pub fn a_for_object(owner: impl Into<String>, address: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            owner: owner.into(),
            class_type: CLASS_IN.to_string(),
            rr_type: TYPE_A.to_string(),
            data1: address.clone(),
            publishing: PUBLISHING_ALWAYS.to_string(),
            ttl: Some(TTL_ZONE_DEFAULT),
            infra_type: INFRA_TYPE_OBJECT.to_string(),
            infra_addr: address,
            infra_fqdn: String::new(),
            is_creating_reverse_zone_rr: false,
            is_default_rr: false,
        }
    }
}

/// The subset of a record QIP needs to delete it
///
/// Sending a plain record to the delete endpoint makes the server fail with a
/// NullPointerException; `singleDelete` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rr_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub infra_type: String,

    #[serde(default, rename = "infraFQDN", skip_serializing_if = "String::is_empty")]
    pub infra_fqdn: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub infra_addr: String,

    pub single_delete: bool,
}

impl From<&ResourceRecord> for DeleteInfo {
    fn from(record: &ResourceRecord) -> Self {
        Self {
            owner: record.owner.clone(),
            rr_type: record.rr_type.clone(),
            infra_type: record.infra_type.clone(),
            infra_fqdn: record.infra_fqdn.clone(),
            infra_addr: record.infra_addr.clone(),
            single_delete: true,
        }
    }
}

#[derive(Deserialize)]
struct RecordList {
    #[serde(default)]
    list: Vec<ResourceRecord>,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    #[serde(rename = "oldRRRec")]
    old: &'a ResourceRecord,
    #[serde(rename = "updatedRRRec")]
    updated: &'a ResourceRecord,
}

/// Load all records attached to the object at `address`
pub async fn load_all_for_object(client: &Client, address: &str) -> Result<Vec<ResourceRecord>> {
    if address.is_empty() {
        return Err(Error::IdRequired);
    }

    let mut url = client.tenant_url(&[LIST_RESOURCE])?;
    url.query_pairs_mut()
        .append_pair("address", address)
        .append_pair("type", INFRA_TYPE_OBJECT)
        .append_pair("getDefaultRRs", "false");

    let response = client.execute(ApiRequest::get(url)).await?;
    let records: RecordList = response.json()?;

    tracing::debug!("Loaded {} RR for {}", records.list.len(), address);
    Ok(records.list)
}

/// Create a record
pub async fn create(client: &Client, record: &ResourceRecord) -> Result<()> {
    let request = ApiRequest::post(client.tenant_url(&[RESOURCE])?).json(record)?;
    client.execute(request).await?;

    tracing::debug!("Created RR {} {}", record.rr_type, record.owner);
    Ok(())
}

/// Replace `old` with `updated`
///
/// QIP locates the stored record by the old identity and replaces it, so
/// both full records travel in one request.
pub async fn update(client: &Client, old: &ResourceRecord, updated: &ResourceRecord) -> Result<()> {
    let body = UpdateRequest { old, updated };
    let request = ApiRequest::put(client.tenant_url(&[RESOURCE])?).json(&body)?;
    client.execute(request).await?;

    tracing::debug!("Updated RR {} -> {}", old.owner, updated.owner);
    Ok(())
}

/// Delete a record from the object it belongs to
pub async fn delete(client: &Client, record: &ResourceRecord) -> Result<()> {
    let request = ApiRequest::delete(client.tenant_url(&[RESOURCE])?).json(&DeleteInfo::from(record))?;
    client.execute(request).await?;

    tracing::debug!("Deleted RR {} {}", record.rr_type, record.owner);
    Ok(())
}
