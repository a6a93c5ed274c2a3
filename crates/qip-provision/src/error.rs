//! Error types for provisioning

use thiserror::Error;

/// Result type for provisioning operations
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Provisioning errors
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Failure reported by the QIP client
    #[error(transparent)]
    Qip(#[from] qip_core::Error),

    /// An existing object was asked to move to another address
    #[error("address can not be changed after the object was created ({current} -> {requested})")]
    AddressImmutable { current: String, requested: String },

    /// The record an identity token refers to no longer exists
    #[error("could not find a record for id: {0}")]
    RecordMissing(String),

    /// Desired state rejected before any request was made
    #[error("invalid {field}: {reason}")]
    InvalidSpec { field: &'static str, reason: String },
}

impl ProvisionError {
    /// Create an invalid-spec error
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            field,
            reason: reason.into(),
        }
    }

    /// True when the underlying QIP error is a 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Qip(e) if e.is_not_found())
    }
}
