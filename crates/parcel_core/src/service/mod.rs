//! Service layer for parcel use-cases.
//!
//! # Responsibility
//! - Orchestrate repository calls into lifecycle operations.
//! - Keep SQL details out of use-case code.

pub mod parcel_service;
