// # Address Allocator
//
// Selects (reserves) a free address from a subnet.
//
// ## Serialization
//
// The QIP server misbehaves when selection requests interleave: the same
// address is handed out twice, or the server faults. The fault is global on
// the server side, so ALL selections from this process go through one lock,
// whichever subnet they target. A per-subnet lock would not close the race.
//
// The lock guard is taken right before the network call and dropped right
// after it, on success and on every error path.
//
// ## Reservations
//
// A selected address stays reserved until it is committed with
// `api::address::update` or freed with `release_selected`. Nothing releases
// it automatically.
//
// ## API Reference
//
// - Select:  PUT    `/api/v1/<org>/selectedv4address/<subnet>.json`
// - Release: DELETE `/api/v1/<org>/selectedv4address/<address>/`

use std::sync::{Arc, LazyLock};

use serde::Serialize;
use tokio::sync::Mutex;

use crate::api::address::{AddressRange, V4Address};
use crate::client::Client;
use crate::error::{Error, Result};
use crate::transport::ApiRequest;

const RESOURCE: &str = "selectedv4address";

static GLOBAL_SELECT_LOCK: LazyLock<SelectLock> = LazyLock::new(SelectLock::new);

/// Lock serializing address selections
///
/// Clones share the same underlying mutex.
#[derive(Debug, Clone, Default)]
pub struct SelectLock {
    inner: Arc<Mutex<()>>,
}

impl SelectLock {
    /// A new, independent lock
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide lock
    pub fn global() -> Self {
        GLOBAL_SELECT_LOCK.clone()
    }

    /// True when both handles guard the same mutex
    pub fn is_shared_with(&self, other: &SelectLock) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[derive(Serialize)]
struct SelectRequest<'a> {
    #[serde(rename = "addrRange")]
    addr_range: [&'a AddressRange; 1],
}

/// Selects free addresses, one request at a time per lock
#[derive(Debug, Clone)]
pub struct AddressSelector {
    lock: SelectLock,
}

impl Default for AddressSelector {
    /// A selector on the process-wide lock
    fn default() -> Self {
        Self::new(SelectLock::global())
    }
}

impl AddressSelector {
    /// Create a selector on the given lock
    ///
    /// Production code should share [`SelectLock::global`]. Independent locks
    /// are for isolated tests.
    pub fn new(lock: SelectLock) -> Self {
        Self { lock }
    }

    pub fn lock(&self) -> &SelectLock {
        &self.lock
    }

    /// Reserve a free address in `subnet`, optionally narrowed to `range`
    ///
    /// # Returns
    ///
    /// - `Ok(V4Address)`: the reserved address as returned by the server
    /// - `Err(Error::NoSelection)`: the server answered without an address
    /// - `Err(..)`: transport or HTTP-status error
    pub async fn select_free(
        &self,
        client: &Client,
        subnet: &str,
        range: Option<&AddressRange>,
    ) -> Result<V4Address> {
        if subnet.is_empty() {
            return Err(Error::IdRequired);
        }

        let url = client.tenant_url(&[RESOURCE, &crate::api::json_key(subnet)])?;
        let mut request = ApiRequest::put(url);
        if let Some(range) = range {
            request = request.json(&SelectRequest { addr_range: [range] })?;
        }

        let response = {
            let _guard = self.lock.inner.lock().await;
            client.execute(request).await
        }?;

        let address: V4Address = response.json()?;
        if address.object_addr.is_empty() {
            return Err(Error::NoSelection);
        }

        tracing::info!("Selected address {} in subnet {}", address.object_addr, subnet);
        Ok(address)
    }

    /// Free a reservation made by [`AddressSelector::select_free`]
    ///
    /// Releasing an address that has no object associated makes the server
    /// fault instead of answering with a documented error; that surfaces as
    /// `Error::Server`.
    pub async fn release_selected(&self, client: &Client, address: &str) -> Result<()> {
        if address.is_empty() {
            return Err(Error::IdRequired);
        }

        let url = client.tenant_url(&[RESOURCE, address, ""])?;
        client.execute(ApiRequest::delete(url)).await?;

        tracing::info!("Released selected address {}", address);
        Ok(())
    }
}
