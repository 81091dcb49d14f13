//! Strongly-typed identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::{Uuid, Version};

use crate::error::DomainError;

/// Identifier of an invoice.
///
/// Serialized as the hyphenated lowercase UUID string. Ordering follows the
/// string form, which is what the dashboard sorts the "invoice number"
/// column by.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(Uuid);

impl InvoiceId {
    /// Allocate a fresh random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse a path parameter, accepting only version-4 UUIDs.
    ///
    /// Identifiers received in JSON bodies go through serde and accept any
    /// version; this stricter form is for ids supplied by API callers.
    pub fn parse_v4(s: &str) -> Result<Self, DomainError> {
        let id: Self = s.parse()?;
        match id.0.get_version() {
            Some(Version::Random) => Ok(id),
            _ => Err(DomainError::invalid_id(format!("InvoiceId: {s} is not a v4 uuid"))),
        }
    }
}

impl Default for InvoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for InvoiceId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<InvoiceId> for Uuid {
    fn from(value: InvoiceId) -> Self {
        value.0
    }
}

impl FromStr for InvoiceId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| DomainError::invalid_id(format!("InvoiceId: {e}")))?;
        Ok(Self(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_v4() {
        let id = InvoiceId::new();
        assert_eq!(id.as_uuid().get_version(), Some(Version::Random));
        assert_eq!(InvoiceId::parse_v4(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn parse_v4_rejects_garbage_and_other_versions() {
        assert!(matches!(
            InvoiceId::parse_v4("not-a-uuid"),
            Err(DomainError::InvalidId(_))
        ));
        // v1 (time-based) uuid
        assert!(matches!(
            InvoiceId::parse_v4("6fa459ea-ee8a-11ca-8a0d-0800200c9a66"),
            Err(DomainError::InvalidId(_))
        ));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = InvoiceId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
