//! In-memory product catalog.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;

use crate::domain::products::{
    ProductsService,
    data::NewProduct,
    errors::ProductsServiceError,
    records::{ProductRecord, ProductUuid},
};

/// Catalog held in process memory, used when running without a database.
#[derive(Debug, Clone, Default)]
pub struct MemoryProductsService {
    products: Arc<RwLock<BTreeMap<ProductUuid, ProductRecord>>>,
}

impl MemoryProductsService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a product, keeping its original creation time.
    pub async fn replace_product(&self, product: ProductRecord) {
        let mut products = self.products.write().await;

        let created_at = products
            .get(&product.uuid)
            .map_or(product.created_at, |existing| existing.created_at);

        products.insert(
            product.uuid,
            ProductRecord {
                created_at,
                updated_at: Timestamp::now(),
                ..product
            },
        );
    }

    /// Drop a product from the catalog, returning whether it existed.
    pub async fn remove_product(&self, product: ProductUuid) -> bool {
        self.products.write().await.remove(&product).is_some()
    }
}

#[async_trait]
impl ProductsService for MemoryProductsService {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut products: Vec<ProductRecord> =
            self.products.read().await.values().cloned().collect();

        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.uuid.cmp(&b.uuid)));

        Ok(products)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError> {
        self.products
            .read()
            .await
            .get(&product)
            .cloned()
            .ok_or(ProductsServiceError::NotFound)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        if product.name.trim().is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        i64::try_from(product.price)?;

        let mut products = self.products.write().await;

        if products.contains_key(&product.uuid) {
            return Err(ProductsServiceError::AlreadyExists);
        }

        let now = Timestamp::now();

        let record = ProductRecord {
            uuid: product.uuid,
            name: product.name,
            price: product.price,
            description: product.description,
            image_url: product.image_url,
            created_at: now,
            updated_at: now,
        };

        products.insert(record.uuid, record.clone());

        Ok(record)
    }
}
