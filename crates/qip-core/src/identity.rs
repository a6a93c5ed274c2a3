// # Resource Record Identity
//
// QIP assigns no identifier to a resource record, so the client makes one.
//
// - The identity token is the record's canonical JSON, base64 encoded with
//   the URL-safe alphabet and no padding
// - Two records are the same logical record when their `RecordKey`s match:
//   owner, class, type, infra-type, infra-address and infra-FQDN. TTL,
//   publishing and data are not part of the identity; the server may round
//   trip them differently.
//
// ## Lookup Protocol
//
// `resolve` decodes the token, loads every record attached to the decoded
// infra-address and keeps those with the same key:
//
// - no match: the record is absent (`Ok(None)`)
// - one match: `Ok(Some(record))`
// - more than one: `Error::NonUniqueRecord`

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::api::rr::{self, ResourceRecord};
use crate::client::Client;
use crate::error::{Error, Result};

const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_encode_padding(false)
    .with_decode_padding_mode(DecodePaddingMode::Indifferent);

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// The identifying fields of a resource record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub owner: String,
    pub class_type: String,
    pub rr_type: String,
    pub infra_type: String,
    pub infra_addr: String,
    pub infra_fqdn: String,
}

impl ResourceRecord {
    /// The identity of this record
    pub fn key(&self) -> RecordKey {
        RecordKey {
            owner: self.owner.clone(),
            class_type: self.class_type.clone(),
            rr_type: self.rr_type.clone(),
            infra_type: self.infra_type.clone(),
            infra_addr: self.infra_addr.clone(),
            infra_fqdn: self.infra_fqdn.clone(),
        }
    }
}

/// True when `a` and `b` refer to the same logical record
pub fn same_identity(a: &ResourceRecord, b: &ResourceRecord) -> bool {
    a.key() == b.key()
}

/// Encode a record into an opaque identity token
pub fn encode_identity(record: &ResourceRecord) -> Result<String> {
    let data = serde_json::to_vec(record)?;
    Ok(URL_SAFE_LENIENT.encode(data))
}

/// Decode an identity token back into a record
///
/// Accepts the URL-safe and the standard alphabet, padded or not.
pub fn decode_identity(token: &str) -> Result<ResourceRecord> {
    let data = URL_SAFE_LENIENT
        .decode(token)
        .or_else(|_| STANDARD_LENIENT.decode(token))
        .map_err(|e| Error::invalid_identity(format!("could not decode base64: {}", e)))?;

    serde_json::from_slice(&data)
        .map_err(|e| Error::invalid_identity(format!("could not decode JSON: {}", e)))
}

/// Find the stored record an identity token refers to
pub async fn resolve(client: &Client, token: &str) -> Result<Option<ResourceRecord>> {
    if token.is_empty() {
        return Err(Error::IdRequired);
    }

    let wanted = decode_identity(token)?;
    if wanted.infra_addr.is_empty() {
        return Err(Error::invalid_identity(
            "token does not reference an infrastructure address",
        ));
    }

    let records = rr::load_all_for_object(client, &wanted.infra_addr).await?;
    let key = wanted.key();

    let mut found: Option<ResourceRecord> = None;
    for record in records {
        if record.key() != key {
            continue;
        }
        if found.is_some() {
            tracing::warn!("RR {} {} is not unique", wanted.rr_type, wanted.owner);
            return Err(Error::NonUniqueRecord);
        }
        found = Some(record);
    }

    if found.is_none() {
        tracing::debug!("No RR found for {} {}", wanted.rr_type, wanted.owner);
    }

    Ok(found)
}
