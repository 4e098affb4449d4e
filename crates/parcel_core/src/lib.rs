//! Core persistence and use-case logic for parcel tracking.
//! This crate owns the parcel table and its status guards.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::parcel::{
    ClientId, NewParcel, Parcel, ParcelNumber, ParcelValidationError, PARCEL_STATUS_DELIVERED,
    PARCEL_STATUS_REGISTERED, PARCEL_STATUS_SENT,
};
pub use repo::parcel_repo::{ParcelRepository, RepoError, RepoResult, SqliteParcelStore};
pub use service::parcel_service::ParcelService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
