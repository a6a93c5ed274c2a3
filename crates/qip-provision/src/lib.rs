// # qip-provision
//
// Lifecycle management on top of `qip-core`: create, read, update and delete
// for v4 address objects and their extra A records, plus subnet lookups.
//
// ## Layering
//
// - `model`: desired-state types, validated before any request is made
// - `address`: `AddressManager`, commits selected or explicit addresses
// - `record`: `RecordManager`, addresses records through identity tokens
// - `subnet`: `SubnetLookup`, a read-only view of a subnet
//
// Every manager shares one `qip_core::Client`; the caller logs in first.

pub mod address;
pub mod error;
pub mod model;
pub mod record;
pub mod subnet;

pub use address::{AddressManager, description_in_sync};
pub use error::{ProvisionError, Result};
pub use model::{AddressSpec, DEFAULT_OBJECT_CLASS, MAX_DESCRIPTION_LEN, RecordSpec};
pub use record::RecordManager;
pub use subnet::{SubnetInfo, SubnetLookup};
