//! Parcel use-case service.
//!
//! # Responsibility
//! - Provide the registration and delivery lifecycle entry points.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository guards.
//! - Every failure is logged and returned; nothing is swallowed.

use crate::model::parcel::{next_status, ClientId, NewParcel, Parcel, ParcelNumber};
use crate::repo::parcel_repo::{ParcelRepository, RepoError, RepoResult};
use log::{error, info};

/// Use-case service wrapper for parcel operations.
pub struct ParcelService<R: ParcelRepository> {
    repo: R,
}

impl<R: ParcelRepository> ParcelService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new parcel for `client` stamped with the current time.
    ///
    /// # Contract
    /// - Status starts as `registered`.
    /// - Returns the stored parcel including its assigned number.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> RepoResult<Parcel> {
        let parcel = logged(
            "parcel_register",
            NewParcel::registered(client, address).map_err(RepoError::from),
        )?;
        let number = logged("parcel_register", self.repo.add(&parcel))?;
        info!("event=parcel_register module=service status=ok number={number} client={client}");
        Ok(parcel.into_parcel(number))
    }

    /// Gets one parcel by number.
    pub fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        let parcel = logged("parcel_get", self.repo.get(number))?;
        info!("event=parcel_get module=service status=ok number={number}");
        Ok(parcel)
    }

    /// Lists all parcels owned by `client`.
    pub fn client_parcels(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        let parcels = logged("parcel_list_client", self.repo.get_by_client(client))?;
        info!(
            "event=parcel_list_client module=service status=ok client={client} count={}",
            parcels.len()
        );
        Ok(parcels)
    }

    /// Advances the parcel one step along `registered -> sent -> delivered`.
    ///
    /// Returns the status after the call. Parcels with no successor status are
    /// left unchanged. This reads before writing, so concurrent advances of the
    /// same parcel may both observe the same starting status.
    pub fn next_status(&self, number: ParcelNumber) -> RepoResult<String> {
        let parcel = logged("parcel_next_status", self.repo.get(number))?;
        let Some(next) = next_status(&parcel.status) else {
            info!(
                "event=parcel_next_status module=service status=skipped number={number} current={}",
                parcel.status
            );
            return Ok(parcel.status);
        };

        logged("parcel_next_status", self.repo.set_status(number, next))?;
        info!(
            "event=parcel_next_status module=service status=ok number={number} from={} to={next}",
            parcel.status
        );
        Ok(next.to_string())
    }

    /// Changes the delivery address. No-op unless the parcel is `registered`.
    pub fn change_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        logged(
            "parcel_change_address",
            self.repo.set_address(number, address),
        )?;
        info!("event=parcel_change_address module=service status=ok number={number}");
        Ok(())
    }

    /// Deletes the parcel. No-op unless the parcel is `registered`.
    pub fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        logged("parcel_delete", self.repo.delete(number))?;
        info!("event=parcel_delete module=service status=ok number={number}");
        Ok(())
    }
}

fn logged<T>(event: &str, result: RepoResult<T>) -> RepoResult<T> {
    if let Err(err) = &result {
        error!("event={event} module=service status=error error={err}");
    }
    result
}
