//! Domain model for parcel tracking.
//!
//! # Invariants
//! - Every stored parcel is identified by a storage-assigned `ParcelNumber`.
//! - Deletion is a hard delete; there are no tombstones or history rows.

pub mod parcel;
