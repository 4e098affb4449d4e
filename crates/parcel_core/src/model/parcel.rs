//! Parcel domain model.
//!
//! # Responsibility
//! - Define the insert shape (`NewParcel`) and the stored shape (`Parcel`).
//! - Validate RFC3339 timestamps before they reach storage.
//!
//! # Invariants
//! - `number` is assigned by storage exactly once and never supplied by callers.
//! - `created_at` is an RFC3339 timestamp and is never rewritten after insert.
//! - Only `registered` parcels may change address or be deleted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Storage-assigned primary key of a parcel.
pub type ParcelNumber = i64;

/// Identifier of the client that owns a parcel.
pub type ClientId = i64;

/// Initial status. The only status that permits address change and deletion.
pub const PARCEL_STATUS_REGISTERED: &str = "registered";
/// Parcel handed over to the carrier.
pub const PARCEL_STATUS_SENT: &str = "sent";
/// Terminal status.
pub const PARCEL_STATUS_DELIVERED: &str = "delivered";

/// Returns the status that follows `status` in the delivery lifecycle.
///
/// `delivered` and unknown codes have no successor.
pub fn next_status(status: &str) -> Option<&'static str> {
    match status {
        PARCEL_STATUS_REGISTERED => Some(PARCEL_STATUS_SENT),
        PARCEL_STATUS_SENT => Some(PARCEL_STATUS_DELIVERED),
        _ => None,
    }
}

/// Errors for parcel timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParcelValidationError {
    InvalidCreatedAt(String),
    TimestampFormat(String),
}

impl Display for ParcelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCreatedAt(value) => {
                write!(f, "created_at `{value}` is not an RFC3339 timestamp")
            }
            Self::TimestampFormat(message) => {
                write!(f, "failed to format current time as RFC3339: {message}")
            }
        }
    }
}

impl Error for ParcelValidationError {}

/// Insert input for a parcel. The number is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParcel {
    pub client: ClientId,
    pub status: String,
    /// Free-form; any string, including empty, is accepted.
    pub address: String,
    /// RFC3339 timestamp.
    pub created_at: String,
}

impl NewParcel {
    /// Creates a `registered` parcel stamped with the current UTC time.
    pub fn registered(
        client: ClientId,
        address: impl Into<String>,
    ) -> Result<Self, ParcelValidationError> {
        Ok(Self {
            client,
            status: PARCEL_STATUS_REGISTERED.to_string(),
            address: address.into(),
            created_at: now_rfc3339()?,
        })
    }

    /// Checks that `created_at` is RFC3339. Status and address are free-form.
    pub fn validate(&self) -> Result<(), ParcelValidationError> {
        if OffsetDateTime::parse(&self.created_at, &Rfc3339).is_err() {
            return Err(ParcelValidationError::InvalidCreatedAt(
                self.created_at.clone(),
            ));
        }
        Ok(())
    }

    /// Builds the stored representation once storage has assigned `number`.
    pub fn into_parcel(self, number: ParcelNumber) -> Parcel {
        Parcel {
            number,
            client: self.client,
            status: self.status,
            address: self.address,
            created_at: self.created_at,
        }
    }
}

/// Stored parcel row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    pub number: ParcelNumber,
    pub client: ClientId,
    pub status: String,
    pub address: String,
    pub created_at: String,
}

/// Current UTC time as RFC3339, truncated to whole seconds.
pub fn now_rfc3339() -> Result<String, ParcelValidationError> {
    let now = OffsetDateTime::now_utc();
    let now = now.replace_nanosecond(0).unwrap_or(now);
    now.format(&Rfc3339)
        .map_err(|err| ParcelValidationError::TimestampFormat(err.to_string()))
}
