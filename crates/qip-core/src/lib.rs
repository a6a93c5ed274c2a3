// # qip-core
//
// Core client library for the QIP IP address management REST API.
//
// ## Architecture Overview
//
// - **Transport** (`transport`): JSON request building, token injection,
//   response buffering and status classification
// - **Session** (`client`): base URL, organization scope and the
//   authentication token obtained by `Client::login`
// - **Accessors** (`api`): load/create/update/delete for v4 addresses,
//   v4 subnets and resource records
// - **Allocator** (`allocator`): serialized "select a free address" calls
// - **Identity** (`identity`): opaque identity tokens for resource records,
//   which the server does not assign an identifier to
//
// ## Design Principles
//
// 1. **No hidden retries**: every failure is returned to the caller with its kind
// 2. **Fail fast**: local validation runs before any network call
// 3. **No background work**: the library never spawns tasks
// 4. **No caching**: every read goes to the server

pub mod allocator;
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod transport;

// Re-export core types for convenience
pub use allocator::{AddressSelector, SelectLock};
pub use api::address::{AddressRange, V4Address};
pub use api::rr::ResourceRecord;
pub use api::subnet::V4Subnet;
pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use identity::RecordKey;
pub use transport::{ApiRequest, ApiResponse};
