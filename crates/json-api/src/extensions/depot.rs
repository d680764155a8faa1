//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};
use trolley_app::domain::owners::OwnerId;

const OWNER_KEY: &str = "trolley.owner";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the authenticated owner for downstream handlers.
    fn insert_owner(&mut self, owner: OwnerId);

    fn owner_or_401(&self) -> Result<OwnerId, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_owner(&mut self, owner: OwnerId) {
        self.insert(OWNER_KEY, owner);
    }

    fn owner_or_401(&self) -> Result<OwnerId, StatusError> {
        self.get::<OwnerId>(OWNER_KEY)
            .cloned()
            .map_err(|_ignored| StatusError::unauthorized().brief("Owner not authenticated"))
    }
}
