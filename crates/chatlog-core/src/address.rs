//! Originating-party addresses.
//!
//! A [`ServiceAddress`] identifies a remote party by service identifier,
//! by E.164 phone number, or both. Older records only ever knew the phone
//! number, newer ones may only know the service identifier, so neither half
//! is mandatory on its own, but an address with neither is rejected.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors building a [`ServiceAddress`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Neither a service identifier nor a phone number was supplied.
    #[error("address has neither a service id nor a phone number")]
    Empty,
    /// The phone number was present but blank.
    #[error("address phone number is blank")]
    BlankPhoneNumber,
}

/// Address of a remote party.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawServiceAddress")]
pub struct ServiceAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    service_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawServiceAddress {
    #[serde(default)]
    service_id: Option<Uuid>,
    #[serde(default)]
    phone_number: Option<String>,
}

impl TryFrom<RawServiceAddress> for ServiceAddress {
    type Error = AddressError;

    fn try_from(raw: RawServiceAddress) -> Result<Self, Self::Error> {
        Self::new(raw.service_id, raw.phone_number)
    }
}

impl ServiceAddress {
    /// Build an address from its optional halves.
    pub fn new(service_id: Option<Uuid>, phone_number: Option<String>) -> Result<Self, AddressError> {
        if phone_number.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(AddressError::BlankPhoneNumber);
        }
        if service_id.is_none() && phone_number.is_none() {
            return Err(AddressError::Empty);
        }
        Ok(Self {
            service_id,
            phone_number,
        })
    }

    /// Address known only by service identifier.
    #[must_use]
    pub fn from_service_id(service_id: Uuid) -> Self {
        Self {
            service_id: Some(service_id),
            phone_number: None,
        }
    }

    /// Address known only by phone number.
    pub fn from_phone_number(phone_number: impl Into<String>) -> Result<Self, AddressError> {
        Self::new(None, Some(phone_number.into()))
    }

    /// Service identifier, if known.
    #[must_use]
    pub fn service_id(&self) -> Option<Uuid> {
        self.service_id
    }

    /// E.164 phone number, if known.
    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.service_id, &self.phone_number) {
            (Some(id), _) => write!(f, "{id}"),
            (None, Some(phone)) => f.write_str(phone),
            (None, None) => f.write_str("<empty>"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
