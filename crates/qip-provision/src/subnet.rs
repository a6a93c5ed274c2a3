//! Read-only subnet view

use std::sync::Arc;

use qip_core::api::subnet;
use qip_core::{Client, V4Subnet};
use serde::Serialize;

use crate::error::Result;

/// A subnet with its derived CIDR notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetInfo {
    pub address: String,
    /// e.g. "192.0.2.0/24"
    pub address_cidr: String,
    pub mask: String,
    pub prefix_length: u8,
    pub network_address: String,
    pub name: String,
    pub description: String,
    pub domains: Vec<String>,
    pub dns_servers: Vec<String>,
    pub ntp_servers: Vec<String>,
    pub default_routers: Vec<String>,
}

impl From<V4Subnet> for SubnetInfo {
    fn from(subnet: V4Subnet) -> Self {
        Self {
            address_cidr: subnet.cidr(),
            prefix_length: subnet.prefix_length(),
            address: subnet.subnet_address,
            mask: subnet.subnet_mask,
            network_address: subnet.network_address,
            name: subnet.subnet_name,
            description: subnet.subnet_description,
            domains: subnet.domains.name,
            dns_servers: subnet.preferred_dns_servers.name,
            ntp_servers: subnet.preferred_time_servers.name,
            default_routers: subnet.default_routers.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubnetLookup {
    client: Arc<Client>,
}

impl SubnetLookup {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub async fn lookup(&self, address: &str) -> Result<SubnetInfo> {
        let subnet = subnet::load(&self.client, address).await?;
        Ok(subnet.into())
    }
}
