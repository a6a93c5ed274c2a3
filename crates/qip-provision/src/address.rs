// # Address Lifecycle
//
// ## Create
//
// - with an explicit address: `POST v4address`
// - without: select a free address from the subnet, then commit it with
//   `PUT v4address`. When the commit fails the selection is released again
//   (best-effort) and the commit error is returned.
//
// Either way the stored object is re-read and returned, so server-side
// defaults (domain, truncated description) are visible to the caller.
//
// ## Read
//
// A 404 means the object is gone: `Ok(None)`, not an error.
//
// ## Update
//
// Name, description, object class and domain can change. The address is the
// object's identity and can not.

use std::sync::Arc;

use qip_core::api::address;
use qip_core::{AddressSelector, Client, V4Address};

use crate::error::{ProvisionError, Result};
use crate::model::{AddressSpec, MAX_DESCRIPTION_LEN};

/// True when the stored description already matches the desired one
///
/// QIP keeps only the first `MAX_DESCRIPTION_LEN` characters of a
/// description, so a longer desired value is in sync when its prefix equals
/// the stored value.
pub fn description_in_sync(stored: &str, desired: &str) -> bool {
    if stored == desired {
        return true;
    }

    desired.chars().count() > MAX_DESCRIPTION_LEN
        && desired.chars().take(MAX_DESCRIPTION_LEN).eq(stored.chars())
}

/// Manages v4 address objects
#[derive(Debug, Clone)]
pub struct AddressManager {
    client: Arc<Client>,
    selector: AddressSelector,
}

impl AddressManager {
    /// Create a manager selecting through the process-wide select lock
    pub fn new(client: Arc<Client>) -> Self {
        Self::with_selector(client, AddressSelector::default())
    }

    pub fn with_selector(client: Arc<Client>, selector: AddressSelector) -> Self {
        Self { client, selector }
    }

    /// Create the object and return it as stored
    pub async fn create(&self, spec: &AddressSpec) -> Result<V4Address> {
        spec.validate()?;

        let address = match &spec.address {
            Some(address) => {
                address::create(&self.client, &spec.to_object(address)).await?;
                address.clone()
            }
            None => {
                if spec.range.is_some() {
                    tracing::debug!("Selecting from range in subnet {}", spec.subnet);
                }
                self.commit_selected(spec).await?
            }
        };

        let stored = address::load(&self.client, &address).await?;
        tracing::info!("Created V4Address {} ({})", stored.object_addr, stored.object_name);

        Ok(stored)
    }

    async fn commit_selected(&self, spec: &AddressSpec) -> Result<String> {
        let selected = self
            .selector
            .select_free(&self.client, &spec.subnet, spec.range.as_ref())
            .await?;

        let object = spec.to_object(&selected.object_addr);

        if let Err(e) = address::update(&self.client, &object).await {
            if let Err(release_err) = self
                .selector
                .release_selected(&self.client, &selected.object_addr)
                .await
            {
                tracing::warn!(
                    "Could not release selected address {}: {}",
                    selected.object_addr,
                    release_err
                );
            }
            return Err(e.into());
        }

        Ok(selected.object_addr)
    }

    /// Read the object stored at `id`, `None` when it does not exist
    pub async fn read(&self, id: &str) -> Result<Option<V4Address>> {
        if id.is_empty() {
            return Err(qip_core::Error::IdRequired.into());
        }

        match address::load(&self.client, id).await {
            Ok(stored) => Ok(Some(stored)),
            Err(e) if e.is_not_found() => {
                tracing::debug!("V4Address {} not found", id);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Apply the mutable fields of `spec` to the object stored at `id`
    pub async fn update(&self, id: &str, spec: &AddressSpec) -> Result<V4Address> {
        spec.validate()?;

        if let Some(requested) = &spec.address {
            if requested != id {
                return Err(ProvisionError::AddressImmutable {
                    current: id.to_string(),
                    requested: requested.clone(),
                });
            }
        }

        let mut object = address::load(&self.client, id).await?;

        object.object_name = spec.name.clone();
        object.object_class = spec.object_class.clone();
        object.domain_name = spec.domain_name.clone();
        if !description_in_sync(&object.object_desc, &spec.description) {
            object.object_desc = spec.description.clone();
        }

        address::update(&self.client, &object).await?;
        tracing::info!("Updated V4Address {}", id);

        Ok(object)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        address::delete(&self.client, id).await?;
        tracing::info!("Deleted V4Address {}", id);
        Ok(())
    }
}
