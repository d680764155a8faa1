//! In-memory cart store.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    carts::{
        records::CartRecord,
        store::{CartStore, CartStoreError, VersionConflict},
    },
    owners::OwnerId,
};

/// Cart store held in process memory, for tests and storage-less runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStore {
    carts: Arc<RwLock<HashMap<OwnerId, CartRecord>>>,
}

impl MemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn get_cart(&self, owner: &OwnerId) -> Result<Option<CartRecord>, CartStoreError> {
        Ok(self.carts.read().await.get(owner).cloned())
    }

    async fn create_cart(&self, cart: &CartRecord) -> Result<CartRecord, CartStoreError> {
        let mut carts = self.carts.write().await;

        if carts.contains_key(&cart.owner) {
            return Err(VersionConflict::AlreadyExists.into());
        }

        let stored = CartRecord {
            version: 1,
            ..cart.clone()
        };

        carts.insert(stored.owner.clone(), stored.clone());

        Ok(stored)
    }

    async fn update_cart(
        &self,
        cart: &CartRecord,
        expected_version: u64,
    ) -> Result<CartRecord, CartStoreError> {
        let mut carts = self.carts.write().await;

        let current = carts
            .get_mut(&cart.owner)
            .filter(|current| current.version == expected_version)
            .ok_or(VersionConflict::Stale {
                expected: expected_version,
            })?;

        *current = CartRecord {
            version: expected_version + 1,
            ..cart.clone()
        };

        Ok(current.clone())
    }

    async fn delete_cart(&self, owner: &OwnerId) -> Result<bool, CartStoreError> {
        Ok(self.carts.write().await.remove(owner).is_some())
    }
}
