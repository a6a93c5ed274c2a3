// # V4 Subnet
//
// Read-only accessor for v4 subnets.
//
// ## API Reference
//
// - Load: GET `/api/v1/<org>/v4subnet/<address>.json`

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::transport::ApiRequest;

const RESOURCE: &str = "v4subnet";

/// A list of names, as QIP wraps them (`{"name": [...]}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameList {
    #[serde(default)]
    pub name: Vec<String>,
}

/// A v4 subnet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V4Subnet {
    #[serde(default)]
    pub subnet_address: String,

    /// Dotted-decimal network mask (e.g. "255.255.255.0")
    #[serde(default)]
    pub subnet_mask: String,

    /// Network this subnet belongs to
    #[serde(default)]
    pub network_address: String,

    #[serde(default)]
    pub subnet_name: String,

    #[serde(default)]
    pub subnet_description: String,

    #[serde(default)]
    pub domains: NameList,

    #[serde(default, rename = "preferredDNSServers")]
    pub preferred_dns_servers: NameList,

    #[serde(default)]
    pub preferred_time_servers: NameList,

    #[serde(default)]
    pub default_routers: NameList,
}

impl V4Subnet {
    /// CIDR prefix length derived from the network mask
    ///
    /// Counts the leading one bits. Non-contiguous masks are not rejected and
    /// give a meaningless value; an unparsable mask gives 0.
    pub fn prefix_length(&self) -> u8 {
        self.subnet_mask
            .parse::<Ipv4Addr>()
            .map(|mask| u32::from(mask).leading_ones() as u8)
            .unwrap_or(0)
    }

    /// Subnet address in CIDR notation (e.g. "192.0.2.0/24")
    pub fn cidr(&self) -> String {
        format!("{}/{}", self.subnet_address, self.prefix_length())
    }
}

/// Load a subnet by its address
pub async fn load(client: &Client, address: &str) -> Result<V4Subnet> {
    if address.is_empty() {
        return Err(Error::IdRequired);
    }

    let url = client.tenant_url(&[RESOURCE, &super::json_key(address)])?;
    let response = client.execute(ApiRequest::get(url)).await?;

    response.json()
}
