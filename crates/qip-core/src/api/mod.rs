//! Resource accessors for the QIP REST API
//!
//! - [`address`]: v4 address objects
//! - [`subnet`]: v4 subnets (read-only)
//! - [`rr`]: DNS resource records attached to objects

pub mod address;
pub mod rr;
pub mod subnet;

/// Segment for `<key>.json` style resource URLs
pub(crate) fn json_key(key: &str) -> String {
    format!("{}.json", key)
}
