//! Desired-state types
//!
//! Both specs are plain data; `validate()` checks them before any request
//! reaches the server, mirroring `ClientConfig::validate`.

use std::net::Ipv4Addr;

use qip_core::{AddressRange, V4Address};
use serde::{Deserialize, Serialize};

use crate::error::{ProvisionError, Result};

/// Object class used when none is given; it must be known by the server
pub const DEFAULT_OBJECT_CLASS: &str = "Virtualized Server";

/// QIP stores at most this many characters of an object description
pub const MAX_DESCRIPTION_LEN: usize = 32;

fn default_object_class() -> String {
    DEFAULT_OBJECT_CLASS.to_string()
}

fn require_ipv4(field: &'static str, value: &str) -> Result<()> {
    value
        .parse::<Ipv4Addr>()
        .map(|_| ())
        .map_err(|_| ProvisionError::invalid(field, format!("{:?} is not an IPv4 address", value)))
}

/// Desired state of a v4 address object
///
/// Without `address`, a free address is selected from `subnet` (narrowed to
/// `range` when given). `range` is ignored when `address` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSpec {
    #[serde(default)]
    pub address: Option<String>,

    pub subnet: String,

    /// Hostname
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_object_class")]
    pub object_class: String,

    /// DNS zone; empty lets the server pick the subnet default
    #[serde(default)]
    pub domain_name: String,

    #[serde(default)]
    pub range: Option<AddressRange>,
}

impl AddressSpec {
    pub fn new(subnet: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: None,
            subnet: subnet.into(),
            name: name.into(),
            description: String::new(),
            object_class: default_object_class(),
            domain_name: String::new(),
            range: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.range = Some(AddressRange::new(start, end));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_object_class(mut self, object_class: impl Into<String>) -> Self {
        self.object_class = object_class.into();
        self
    }

    pub fn with_domain_name(mut self, domain_name: impl Into<String>) -> Self {
        self.domain_name = domain_name.into();
        self
    }

    /// Validate the desired state
    ///
    /// Checks:
    /// - subnet and name are set
    /// - subnet, address and both range ends are IPv4 addresses
    pub fn validate(&self) -> Result<()> {
        if self.subnet.is_empty() {
            return Err(ProvisionError::invalid("subnet", "subnet must be set"));
        }
        require_ipv4("subnet", &self.subnet)?;

        if self.name.is_empty() {
            return Err(ProvisionError::invalid("name", "name must be set"));
        }

        if let Some(address) = &self.address {
            require_ipv4("address", address)?;
        }

        if let Some(range) = &self.range {
            require_ipv4("range start", &range.start_address)?;
            require_ipv4("range end", &range.end_address)?;
        }

        Ok(())
    }

    /// The object to store at `address`
    pub(crate) fn to_object(&self, address: &str) -> V4Address {
        let mut object = V4Address::new(address, self.subnet.as_str(), self.name.as_str());
        object.object_desc = self.description.clone();
        object.object_class = self.object_class.clone();
        object.domain_name = self.domain_name.clone();
        object
    }
}

/// Desired state of an extra A record attached to an address object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSpec {
    pub address: String,

    /// Host part of the owner (e.g. `entry-extra` or `*.entry-extra`)
    pub name: String,

    pub domain_name: String,
}

impl RecordSpec {
    pub fn new(
        address: impl Into<String>,
        name: impl Into<String>,
        domain_name: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
            domain_name: domain_name.into(),
        }
    }

    /// Record owner, `<name>.<domain_name>`
    pub fn owner(&self) -> String {
        format!("{}.{}", self.name, self.domain_name)
    }

    pub fn validate(&self) -> Result<()> {
        require_ipv4("address", &self.address)?;

        if self.name.is_empty() {
            return Err(ProvisionError::invalid("name", "name must be set"));
        }
        if self.domain_name.is_empty() {
            return Err(ProvisionError::invalid("domain_name", "domain name must be set"));
        }

        Ok(())
    }
}
