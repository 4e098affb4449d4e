//! Repository layer for parcel persistence.
//!
//! # Responsibility
//! - Define the parcel data access contract.
//! - Isolate SQLite statements from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   storage errors.
//! - Status-guarded writes are no-ops, never errors, when the guard fails.

pub mod parcel_repo;
