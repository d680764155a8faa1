//! Carts service errors.

use std::fmt::{Display, Formatter, Result as FmtResult};

use thiserror::Error;

use crate::domain::{
    carts::store::CartStoreError, owners::EmptyOwnerId, products::ProductsServiceError,
};

/// External dependency a cart operation waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Catalog,
    CartStore,
}

impl Display for Dependency {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Catalog => "product catalog",
            Self::CartStore => "cart store",
        })
    }
}

#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// A raw owner identifier was blank.
    ///
    /// Service methods take an already parsed [`OwnerId`](crate::domain::owners::OwnerId),
    /// so this only surfaces where callers convert raw identifiers with `?`.
    #[error("owner is not authenticated")]
    Unauthenticated,

    #[error("quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),

    #[error("cart total exceeds the representable amount")]
    TotalOverflow,

    #[error("product not found")]
    ProductNotFound,

    #[error("cart not found")]
    CartNotFound,

    #[error("item not found in cart")]
    ItemNotFound,

    #[error("cart was modified concurrently, gave up after {attempts} attempts")]
    ConcurrentModification { attempts: u32 },

    #[error("timed out waiting for the {0}")]
    Timeout(Dependency),

    #[error("product catalog error")]
    Catalog(#[source] ProductsServiceError),

    #[error("cart storage error")]
    Store(#[source] CartStoreError),
}

impl From<EmptyOwnerId> for CartsServiceError {
    fn from(_: EmptyOwnerId) -> Self {
        Self::Unauthenticated
    }
}

impl From<CartStoreError> for CartsServiceError {
    fn from(error: CartStoreError) -> Self {
        Self::Store(error)
    }
}
