//! Cart Store
//!
//! Persistence for cart aggregates keyed by owner. Writes are
//! compare-and-swap on the aggregate `version`: a store never silently
//! overwrites a cart that changed since it was read.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::domain::{carts::records::CartRecord, owners::OwnerId};

mod memory;
mod postgres;

pub use memory::MemoryCartStore;
pub use postgres::PgCartStore;

/// A write lost a race with another writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VersionConflict {
    #[error("a cart already exists for this owner")]
    AlreadyExists,

    #[error("cart is no longer at version {expected}")]
    Stale { expected: u64 },
}

#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error(transparent)]
    Conflict(#[from] VersionConflict),

    #[error("SQL error")]
    Sql(#[source] sqlx::Error),
}

impl From<sqlx::Error> for CartStoreError {
    fn from(error: sqlx::Error) -> Self {
        Self::Sql(error)
    }
}

#[automock]
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Load the owner's cart, if any.
    async fn get_cart(&self, owner: &OwnerId) -> Result<Option<CartRecord>, CartStoreError>;

    /// Insert a first cart for its owner, returning it at version 1.
    ///
    /// `updated_at` is stored as given.
    ///
    /// Fails with [`VersionConflict::AlreadyExists`] when the owner already
    /// has a cart.
    async fn create_cart(&self, cart: &CartRecord) -> Result<CartRecord, CartStoreError>;

    /// Replace the owner's cart, provided it is still at `expected_version`.
    /// `updated_at` is stored as given.
    ///
    /// Returns the stored cart at `expected_version + 1`, or
    /// [`VersionConflict::Stale`] when another write got there first or the
    /// cart has since been deleted.
    async fn update_cart(
        &self,
        cart: &CartRecord,
        expected_version: u64,
    ) -> Result<CartRecord, CartStoreError>;

    /// Delete the owner's cart, returning whether one existed.
    async fn delete_cart(&self, owner: &OwnerId) -> Result<bool, CartStoreError>;
}
