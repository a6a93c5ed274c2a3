//! Extra A records attached to address objects
//!
//! Records have no server-side id; the manager hands out identity tokens
//! (see `qip_core::identity`) and resolves them again on every call.

use std::sync::Arc;

use qip_core::api::rr;
use qip_core::identity::{encode_identity, resolve};
use qip_core::{Client, ResourceRecord};

use crate::error::{ProvisionError, Result};
use crate::model::RecordSpec;

/// Manages A records by identity token
#[derive(Debug, Clone)]
pub struct RecordManager {
    client: Arc<Client>,
}

impl RecordManager {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Create the record and return its identity token
    pub async fn create(&self, spec: &RecordSpec) -> Result<String> {
        spec.validate()?;

        let record = ResourceRecord::a_for_object(spec.owner(), spec.address.as_str());
        rr::create(&self.client, &record).await?;

        tracing::info!("Created RR {} for V4Address {}", record.owner, spec.address);
        Ok(encode_identity(&record)?)
    }

    /// The stored record for `token`, `None` when it does not exist
    pub async fn read(&self, token: &str) -> Result<Option<ResourceRecord>> {
        Ok(resolve(&self.client, token).await?)
    }

    /// Rename the record and return its new identity token
    ///
    /// Only the owner changes; the record stays attached to its address.
    pub async fn update(&self, token: &str, spec: &RecordSpec) -> Result<String> {
        spec.validate()?;

        let current = resolve(&self.client, token)
            .await?
            .ok_or_else(|| ProvisionError::RecordMissing(token.to_string()))?;

        let mut updated = current.clone();
        updated.owner = spec.owner();

        rr::update(&self.client, &current, &updated).await?;

        tracing::info!("Renamed RR {} -> {}", current.owner, updated.owner);
        Ok(encode_identity(&updated)?)
    }

    /// Delete the record; a record that is already gone is not an error
    pub async fn delete(&self, token: &str) -> Result<()> {
        let Some(record) = resolve(&self.client, token).await? else {
            tracing::debug!("RR already absent, nothing to delete");
            return Ok(());
        };

        rr::delete(&self.client, &record).await?;

        tracing::info!("Deleted RR {} for V4Address {}", record.owner, record.infra_addr);
        Ok(())
    }
}
