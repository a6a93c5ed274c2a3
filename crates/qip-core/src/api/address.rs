// # V4 Address
//
// Accessors for v4 address objects. The identity of an object is its address;
// changing the address means deleting and re-creating the object.
//
// ## API Reference
//
// - Load:   GET    `/api/v1/<org>/v4address/<address>.json`
// - Create: POST   `/api/v1/<org>/v4address`
// - Update: PUT    `/api/v1/<org>/v4address`
// - Delete: DELETE `/api/v1/<org>/v4address/<address>/`

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::transport::ApiRequest;

const RESOURCE: &str = "v4address";

/// A v4 address object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V4Address {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub object_addr: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subnet_addr: String,

    /// Hostname of the object
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub object_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub object_desc: String,

    /// Object class, validated by the server (e.g. "Virtualized Server")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub object_class: String,

    /// DNS zone of the object
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain_name: String,
}

impl V4Address {
    /// Create an address object with the required fields
    pub fn new(
        object_addr: impl Into<String>,
        subnet_addr: impl Into<String>,
        object_name: impl Into<String>,
    ) -> Self {
        Self {
            object_addr: object_addr.into(),
            subnet_addr: subnet_addr.into(),
            object_name: object_name.into(),
            ..Self::default()
        }
    }

    /// Check the fields the server requires for create and update
    pub fn validate(&self) -> Result<()> {
        if self.object_addr.is_empty() || self.subnet_addr.is_empty() {
            return Err(Error::BothAddressesRequired);
        }
        if self.object_name.is_empty() {
            return Err(Error::NameRequired);
        }
        Ok(())
    }
}

/// Narrows where a free address may be selected from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRange {
    pub start_address: String,
    pub end_address: String,
}

impl AddressRange {
    pub fn new(start_address: impl Into<String>, end_address: impl Into<String>) -> Self {
        Self {
            start_address: start_address.into(),
            end_address: end_address.into(),
        }
    }
}

/// Load an address object
pub async fn load(client: &Client, address: &str) -> Result<V4Address> {
    if address.is_empty() {
        return Err(Error::IdRequired);
    }

    let url = client.tenant_url(&[RESOURCE, &super::json_key(address)])?;
    let response = client.execute(ApiRequest::get(url)).await?;

    response.json()
}

/// Create an address object
///
/// Required fields: `object_addr`, `subnet_addr`, `object_name`.
pub async fn create(client: &Client, address: &V4Address) -> Result<()> {
    address.validate()?;

    let request = ApiRequest::post(client.tenant_url(&[RESOURCE])?).json(address)?;
    client.execute(request).await?;

    tracing::debug!("Created V4Address {}", address.object_addr);
    Ok(())
}

/// Update an existing object, or turn a selected address into an object
///
/// All fields should be set: leaving out e.g. the domain unsets the domain
/// association on the server. Load (or select) first, then update.
pub async fn update(client: &Client, address: &V4Address) -> Result<()> {
    address.validate()?;

    let request = ApiRequest::put(client.tenant_url(&[RESOURCE])?).json(address)?;
    client.execute(request).await?;

    tracing::debug!("Updated V4Address {}", address.object_addr);
    Ok(())
}

/// Delete an object and free its address in the subnet
pub async fn delete(client: &Client, address: &str) -> Result<()> {
    if address.is_empty() {
        return Err(Error::IdRequired);
    }

    let url = client.tenant_url(&[RESOURCE, address, ""])?;
    let request = ApiRequest::delete(url).json(address)?;
    client.execute(request).await?;

    tracing::debug!("Deleted V4Address {}", address);
    Ok(())
}
