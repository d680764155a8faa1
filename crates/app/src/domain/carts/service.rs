//! Carts service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::Span;

use crate::domain::{
    carts::{
        data::{AddedItem, CartSummary, ListedCartItem},
        errors::{CartsServiceError, Dependency},
        records::CartRecord,
        store::{CartStore, CartStoreError},
    },
    owners::OwnerId,
    products::{
        ProductsService, ProductsServiceError,
        records::{ProductRecord, ProductUuid},
    },
};

/// Tuning for cart writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartsSettings {
    /// Total read-modify-write attempts before giving up on a contended cart.
    pub max_attempts: u32,

    /// Upper bound on any single catalog or store call.
    pub io_timeout: Duration,
}

impl Default for CartsSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            io_timeout: Duration::from_secs(2),
        }
    }
}

/// Carts service over any [`CartStore`] and product catalog.
#[derive(Clone)]
pub struct StoreCartsService {
    store: Arc<dyn CartStore>,
    products: Arc<dyn ProductsService>,
    settings: CartsSettings,
}

impl Debug for StoreCartsService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StoreCartsService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl StoreCartsService {
    #[must_use]
    pub fn new(
        store: Arc<dyn CartStore>,
        products: Arc<dyn ProductsService>,
        settings: CartsSettings,
    ) -> Self {
        Self {
            store,
            products,
            settings,
        }
    }

    async fn timed<T>(
        &self,
        dependency: Dependency,
        future: impl Future<Output = T> + Send,
    ) -> Result<T, CartsServiceError> {
        tokio::time::timeout(self.settings.io_timeout, future)
            .await
            .map_err(|_elapsed| CartsServiceError::Timeout(dependency))
    }

    async fn load_cart(&self, owner: &OwnerId) -> Result<Option<CartRecord>, CartsServiceError> {
        Ok(self
            .timed(Dependency::CartStore, self.store.get_cart(owner))
            .await??)
    }

    /// Current catalog entry for `product`, or `None` when it no longer exists.
    async fn lookup_product(
        &self,
        product: ProductUuid,
    ) -> Result<Option<ProductRecord>, CartsServiceError> {
        match self
            .timed(Dependency::Catalog, self.products.get_product(product))
            .await?
        {
            Ok(product) => Ok(Some(product)),
            Err(ProductsServiceError::NotFound) => Ok(None),
            Err(error) => Err(CartsServiceError::Catalog(error)),
        }
    }

    /// Read the owner's cart, apply `mutate` and write it back conditionally.
    ///
    /// `mutate` sees the cart as it is at the start of each attempt, so it runs
    /// again from scratch whenever the write loses a race. A returned cart at
    /// version 0 is created; anything else is updated against its version.
    /// Returns the stored cart and whether this call created it.
    async fn write_with_retry<F>(
        &self,
        owner: &OwnerId,
        mut mutate: F,
    ) -> Result<(CartRecord, bool), CartsServiceError>
    where
        F: FnMut(Option<CartRecord>) -> Result<CartRecord, CartsServiceError> + Send,
    {
        let max_attempts = self.settings.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let current = self.load_cart(owner).await?;

            let mut cart = mutate(current)?;

            cart.updated_at = Timestamp::now();

            let created = cart.version == 0;

            let written = if created {
                self.timed(Dependency::CartStore, self.store.create_cart(&cart))
                    .await?
            } else {
                self.timed(
                    Dependency::CartStore,
                    self.store.update_cart(&cart, cart.version),
                )
                .await?
            };

            match written {
                Ok(stored) => return Ok((stored, created)),
                Err(CartStoreError::Conflict(conflict)) => {
                    tracing::debug!(
                        owner = %owner,
                        attempt,
                        max_attempts,
                        %conflict,
                        "cart write conflicted"
                    );

                    tokio::task::yield_now().await;
                }
                Err(error) => return Err(error.into()),
            }
        }

        tracing::warn!(
            owner = %owner,
            attempts = max_attempts,
            "giving up on contended cart"
        );

        Err(CartsServiceError::ConcurrentModification {
            attempts: max_attempts,
        })
    }
}

fn positive_quantity(quantity: i64) -> Result<u32, CartsServiceError> {
    u32::try_from(quantity)
        .ok()
        .filter(|quantity| *quantity > 0)
        .ok_or(CartsServiceError::InvalidQuantity(quantity))
}

#[async_trait]
impl CartsService for StoreCartsService {
    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self),
        fields(owner = %owner, product = %product, created = tracing::field::Empty),
        err
    )]
    async fn add_item(
        &self,
        owner: &OwnerId,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<AddedItem, CartsServiceError> {
        let quantity = positive_quantity(quantity)?;

        let product = self
            .lookup_product(product)
            .await?
            .ok_or(CartsServiceError::ProductNotFound)?;

        let (cart, created) = self
            .write_with_retry(owner, |current| {
                let mut cart = current.unwrap_or_else(|| CartRecord::new(owner.clone()));

                cart.merge_item(&product, quantity)?;

                Ok(cart)
            })
            .await?;

        Span::current().record("created", created);

        Ok(AddedItem { cart, created })
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(owner = %owner, product = %product),
        err
    )]
    async fn remove_item(
        &self,
        owner: &OwnerId,
        product: ProductUuid,
    ) -> Result<CartSummary, CartsServiceError> {
        let (cart, _) = self
            .write_with_retry(owner, |current| {
                let mut cart = current.ok_or(CartsServiceError::CartNotFound)?;

                cart.remove_item(product)?;

                Ok(cart)
            })
            .await?;

        Ok(cart.into())
    }

    #[tracing::instrument(
        name = "carts.service.update_quantity",
        skip(self),
        fields(owner = %owner, product = %product),
        err
    )]
    async fn update_quantity(
        &self,
        owner: &OwnerId,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<CartRecord, CartsServiceError> {
        let quantity = positive_quantity(quantity)?;

        let (cart, _) = self
            .write_with_retry(owner, |current| {
                let mut cart = current.ok_or(CartsServiceError::CartNotFound)?;

                cart.set_quantity(product, quantity)?;

                Ok(cart)
            })
            .await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.list_items",
        skip(self),
        fields(owner = %owner),
        err
    )]
    async fn list_items(&self, owner: &OwnerId) -> Result<Vec<ListedCartItem>, CartsServiceError> {
        let Some(cart) = self.load_cart(owner).await? else {
            return Ok(Vec::new());
        };

        let mut listed = Vec::with_capacity(cart.items.len());

        for item in cart.items {
            match self.lookup_product(item.product_uuid).await? {
                Some(product) => listed.push(ListedCartItem {
                    item_id: item.product_uuid,
                    product,
                    quantity: item.quantity,
                }),
                None => {
                    tracing::debug!(
                        product = %item.product_uuid,
                        "omitting cart item for a product no longer in the catalog"
                    );
                }
            }
        }

        Ok(listed)
    }

    #[tracing::instrument(
        name = "carts.service.clear_cart",
        skip(self),
        fields(owner = %owner, existed = tracing::field::Empty),
        err
    )]
    async fn clear_cart(&self, owner: &OwnerId) -> Result<(), CartsServiceError> {
        let existed = self
            .timed(Dependency::CartStore, self.store.delete_cart(owner))
            .await??;

        Span::current().record("existed", existed);

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Add `quantity` of a product to the owner's cart, creating the cart on
    /// first use. Adding a product already in the cart increases its quantity
    /// and keeps the price and name captured when it was first added.
    async fn add_item(
        &self,
        owner: &OwnerId,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<AddedItem, CartsServiceError>;

    /// Remove a product from the owner's cart. Removing the last item leaves
    /// an empty cart behind.
    async fn remove_item(
        &self,
        owner: &OwnerId,
        product: ProductUuid,
    ) -> Result<CartSummary, CartsServiceError>;

    /// Set the quantity of a product already in the owner's cart.
    async fn update_quantity(
        &self,
        owner: &OwnerId,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<CartRecord, CartsServiceError>;

    /// List the owner's items with live catalog data. Items whose product has
    /// left the catalog are omitted; an owner without a cart gets an empty
    /// list.
    async fn list_items(&self, owner: &OwnerId) -> Result<Vec<ListedCartItem>, CartsServiceError>;

    /// Delete the owner's cart. Clearing a missing cart succeeds.
    async fn clear_cart(&self, owner: &OwnerId) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use testresult::TestResult;
    use tokio::sync::Barrier;

    use crate::domain::{
        carts::store::{MemoryCartStore, MockCartStore, VersionConflict},
        products::{MemoryProductsService, data::NewProduct},
    };

    use super::*;

    struct Fixture {
        service: StoreCartsService,
        store: MemoryCartStore,
        catalog: MemoryProductsService,
    }

    fn fixture() -> Fixture {
        let store = MemoryCartStore::new();
        let catalog = MemoryProductsService::new();

        let service = StoreCartsService::new(
            Arc::new(store.clone()),
            Arc::new(catalog.clone()),
            CartsSettings::default(),
        );

        Fixture {
            service,
            store,
            catalog,
        }
    }

    fn owner(id: &str) -> OwnerId {
        OwnerId::parse(id).expect("valid owner")
    }

    async fn stock(catalog: &MemoryProductsService, name: &str, price: u64) -> ProductRecord {
        catalog
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                name: name.to_string(),
                price,
                description: String::new(),
                image_url: String::new(),
            })
            .await
            .expect("product should be created")
    }

    #[tokio::test]
    async fn first_add_creates_cart() -> TestResult {
        let Fixture {
            service, catalog, ..
        } = fixture();

        let p1 = stock(&catalog, "P1", 10_00).await;

        let added = service.add_item(&owner("U1"), p1.uuid, 2).await?;

        assert!(added.created);
        assert_eq!(added.cart.items.len(), 1);
        assert_eq!(added.cart.items[0].quantity, 2);
        assert_eq!(added.cart.items[0].unit_price, 10_00);
        assert_eq!(added.cart.items[0].name, "P1");
        assert_eq!(added.cart.total, 20_00);
        assert_eq!(added.cart.version, 1);

        Ok(())
    }

    #[tokio::test]
    async fn adding_same_product_merges() -> TestResult {
        let Fixture {
            service, catalog, ..
        } = fixture();

        let p1 = stock(&catalog, "P1", 10_00).await;

        service.add_item(&owner("U1"), p1.uuid, 2).await?;

        let added = service.add_item(&owner("U1"), p1.uuid, 3).await?;

        assert!(!added.created);
        assert_eq!(added.cart.items.len(), 1);
        assert_eq!(added.cart.items[0].quantity, 5);
        assert_eq!(added.cart.total, 50_00);

        Ok(())
    }

    #[tokio::test]
    async fn snapshot_survives_catalog_changes() -> TestResult {
        let Fixture {
            service, catalog, ..
        } = fixture();

        let p1 = stock(&catalog, "P1", 10_00).await;

        service.add_item(&owner("U1"), p1.uuid, 1).await?;

        catalog
            .replace_product(ProductRecord {
                name: "Renamed".to_string(),
                price: 15_00,
                ..p1.clone()
            })
            .await;

        let added = service.add_item(&owner("U1"), p1.uuid, 1).await?;

        assert_eq!(added.cart.items[0].unit_price, 10_00);
        assert_eq!(added.cart.items[0].name, "P1");
        assert_eq!(added.cart.total, 20_00);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_leaves_cart_unchanged() -> TestResult {
        let Fixture {
            service,
            store,
            catalog,
        } = fixture();

        let p1 = stock(&catalog, "P1", 10_00).await;

        let before = service.add_item(&owner("U1"), p1.uuid, 1).await?.cart;

        let result = service.add_item(&owner("U1"), ProductUuid::new(), 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
        assert_eq!(store.get_cart(&owner("U1")).await?, Some(before));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_does_not_create_cart() -> TestResult {
        let Fixture { service, store, .. } = fixture();

        let result = service.add_item(&owner("U1"), ProductUuid::new(), 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
        assert_eq!(store.get_cart(&owner("U1")).await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn non_positive_quantities_are_rejected() -> TestResult {
        let Fixture {
            service, catalog, ..
        } = fixture();

        let p1 = stock(&catalog, "P1", 10_00).await;

        for quantity in [0, -1, i64::from(u32::MAX) + 1] {
            let result = service.add_item(&owner("U1"), p1.uuid, quantity).await;

            assert!(
                matches!(result, Err(CartsServiceError::InvalidQuantity(q)) if q == quantity),
                "expected InvalidQuantity, got {result:?}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn overflowing_total_is_not_persisted() -> TestResult {
        let Fixture {
            service,
            store,
            catalog,
        } = fixture();

        let gold = stock(&catalog, "Gold", u64::try_from(i64::MAX)?).await;

        let result = service.add_item(&owner("U1"), gold.uuid, 3).await;

        assert!(
            matches!(result, Err(CartsServiceError::TotalOverflow)),
            "expected TotalOverflow, got {result:?}"
        );
        assert_eq!(store.get_cart(&owner("U1")).await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn removing_last_item_keeps_empty_cart() -> TestResult {
        let Fixture {
            service,
            store,
            catalog,
        } = fixture();

        let p1 = stock(&catalog, "P1", 10_00).await;

        service.add_item(&owner("U1"), p1.uuid, 2).await?;

        let summary = service.remove_item(&owner("U1"), p1.uuid).await?;

        assert_eq!(summary.owner, owner("U1"));
        assert!(summary.items.is_empty());
        assert_eq!(summary.total, 0);

        let stored = store.get_cart(&owner("U1")).await?;

        assert!(
            stored.is_some_and(|cart| cart.items.is_empty()),
            "expected an empty cart to remain"
        );

        Ok(())
    }

    #[tokio::test]
    async fn removing_keeps_other_items() -> TestResult {
        let Fixture {
            service, catalog, ..
        } = fixture();

        let p1 = stock(&catalog, "P1", 10_00).await;
        let p2 = stock(&catalog, "P2", 2_50).await;

        service.add_item(&owner("U1"), p1.uuid, 1).await?;
        service.add_item(&owner("U1"), p2.uuid, 2).await?;

        let summary = service.remove_item(&owner("U1"), p1.uuid).await?;

        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.items[0].product_uuid, p2.uuid);
        assert_eq!(summary.total, 5_00);

        Ok(())
    }

    #[tokio::test]
    async fn remove_without_cart_fails() {
        let Fixture { service, .. } = fixture();

        let result = service.remove_item(&owner("U1"), ProductUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::CartNotFound)),
            "expected CartNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn remove_missing_item_fails() -> TestResult {
        let Fixture {
            service, catalog, ..
        } = fixture();

        let p1 = stock(&catalog, "P1", 10_00).await;

        service.add_item(&owner("U1"), p1.uuid, 1).await?;

        let result = service.remove_item(&owner("U1"), ProductUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_sets_quantity() -> TestResult {
        let Fixture {
            service, catalog, ..
        } = fixture();

        let p1 = stock(&catalog, "P1", 10_00).await;

        service.add_item(&owner("U1"), p1.uuid, 5).await?;

        let cart = service.update_quantity(&owner("U1"), p1.uuid, 2).await?;

        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.total, 20_00);
        assert_eq!(cart.version, 2);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_failures() -> TestResult {
        let Fixture {
            service, catalog, ..
        } = fixture();

        let p1 = stock(&catalog, "P1", 10_00).await;

        let result = service.update_quantity(&owner("U1"), p1.uuid, 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::CartNotFound)),
            "expected CartNotFound, got {result:?}"
        );

        service.add_item(&owner("U1"), p1.uuid, 1).await?;

        let result = service
            .update_quantity(&owner("U1"), ProductUuid::new(), 1)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        let result = service.update_quantity(&owner("U1"), p1.uuid, 0).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity(0))),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_without_cart_is_empty() -> TestResult {
        let Fixture { service, .. } = fixture();

        assert!(service.list_items(&owner("U1")).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn list_uses_live_product_data() -> TestResult {
        let Fixture {
            service, catalog, ..
        } = fixture();

        let p1 = stock(&catalog, "P1", 10_00).await;

        service.add_item(&owner("U1"), p1.uuid, 2).await?;

        catalog
            .replace_product(ProductRecord {
                price: 12_00,
                ..p1.clone()
            })
            .await;

        let listed = service.list_items(&owner("U1")).await?;

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].item_id, p1.uuid);
        assert_eq!(listed[0].product.price, 12_00);
        assert_eq!(listed[0].quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn list_omits_products_gone_from_catalog() -> TestResult {
        let Fixture {
            service, catalog, ..
        } = fixture();

        let p1 = stock(&catalog, "P1", 10_00).await;
        let p2 = stock(&catalog, "P2", 5_00).await;

        service.add_item(&owner("U1"), p1.uuid, 1).await?;
        service.add_item(&owner("U1"), p2.uuid, 1).await?;

        assert!(catalog.remove_product(p1.uuid).await);

        let listed = service.list_items(&owner("U1")).await?;

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].item_id, p2.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn clear_empties_listing_and_is_idempotent() -> TestResult {
        let Fixture {
            service,
            store,
            catalog,
        } = fixture();

        let p1 = stock(&catalog, "P1", 10_00).await;

        service.add_item(&owner("U1"), p1.uuid, 1).await?;

        service.clear_cart(&owner("U1")).await?;
        service.clear_cart(&owner("U1")).await?;

        assert!(service.list_items(&owner("U1")).await?.is_empty());
        assert_eq!(store.get_cart(&owner("U1")).await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn owners_are_independent() -> TestResult {
        let Fixture {
            service, catalog, ..
        } = fixture();

        let p1 = stock(&catalog, "P1", 10_00).await;

        service.add_item(&owner("U1"), p1.uuid, 1).await?;
        service.add_item(&owner("U2"), p1.uuid, 4).await?;
        service.clear_cart(&owner("U1")).await?;

        let listed = service.list_items(&owner("U2")).await?;

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].quantity, 4);

        Ok(())
    }

    /// Store whose first two reads wait for each other, so two writers both
    /// observe the same starting state.
    struct RacingStore {
        inner: MemoryCartStore,
        barrier: Barrier,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl CartStore for RacingStore {
        async fn get_cart(&self, owner: &OwnerId) -> Result<Option<CartRecord>, CartStoreError> {
            let cart = self.inner.get_cart(owner).await;

            if self.reads.fetch_add(1, Ordering::SeqCst) < 2 {
                self.barrier.wait().await;
            }

            cart
        }

        async fn create_cart(&self, cart: &CartRecord) -> Result<CartRecord, CartStoreError> {
            self.inner.create_cart(cart).await
        }

        async fn update_cart(
            &self,
            cart: &CartRecord,
            expected_version: u64,
        ) -> Result<CartRecord, CartStoreError> {
            self.inner.update_cart(cart, expected_version).await
        }

        async fn delete_cart(&self, owner: &OwnerId) -> Result<bool, CartStoreError> {
            self.inner.delete_cart(owner).await
        }
    }

    #[tokio::test]
    async fn concurrent_first_adds_both_land() -> TestResult {
        let inner = MemoryCartStore::new();
        let catalog = MemoryProductsService::new();

        let p1 = stock(&catalog, "P1", 10_00).await;
        let p2 = stock(&catalog, "P2", 3_00).await;

        let service = StoreCartsService::new(
            Arc::new(RacingStore {
                inner: inner.clone(),
                barrier: Barrier::new(2),
                reads: AtomicUsize::new(0),
            }),
            Arc::new(catalog),
            CartsSettings::default(),
        );

        let u1 = owner("U1");

        let (first, second) = tokio::join!(
            service.add_item(&u1, p1.uuid, 1),
            service.add_item(&u1, p2.uuid, 2),
        );

        let (first, second) = (first?, second?);

        assert_ne!(
            first.created, second.created,
            "exactly one call should create the cart"
        );

        let cart = inner.get_cart(&u1).await?.expect("cart should exist");

        assert_eq!(cart.items.len(), 2);
        assert!(cart.item(p1.uuid).is_some());
        assert!(cart.item(p2.uuid).is_some());
        assert_eq!(cart.total, 16_00);
        assert_eq!(cart.version, 2);

        Ok(())
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() -> TestResult {
        let catalog = MemoryProductsService::new();
        let p1 = stock(&catalog, "P1", 10_00).await;

        let existing = CartRecord {
            version: 1,
            ..CartRecord::new(owner("U1"))
        };

        let mut store = MockCartStore::new();

        store
            .expect_get_cart()
            .times(3)
            .returning(move |_| Ok(Some(existing.clone())));

        store
            .expect_update_cart()
            .times(3)
            .returning(|_, expected| Err(VersionConflict::Stale { expected }.into()));

        store.expect_create_cart().never();
        store.expect_delete_cart().never();

        let service =
            StoreCartsService::new(Arc::new(store), Arc::new(catalog), CartsSettings::default());

        let result = service.add_item(&owner("U1"), p1.uuid, 1).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::ConcurrentModification { attempts: 3 })
            ),
            "expected ConcurrentModification, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn store_failures_are_not_retried() -> TestResult {
        let mut store = MockCartStore::new();

        store
            .expect_get_cart()
            .once()
            .returning(|_| Err(CartStoreError::Sql(sqlx::Error::PoolTimedOut)));

        let service = StoreCartsService::new(
            Arc::new(store),
            Arc::new(MemoryProductsService::new()),
            CartsSettings::default(),
        );

        let result = service
            .remove_item(&owner("U1"), ProductUuid::new())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::Store(CartStoreError::Sql(_)))),
            "expected Store error, got {result:?}"
        );

        Ok(())
    }

    /// Catalog that never answers in time.
    struct StalledCatalog;

    #[async_trait]
    impl ProductsService for StalledCatalog {
        async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError> {
            Ok(Vec::new())
        }

        async fn get_product(
            &self,
            _product: ProductUuid,
        ) -> Result<ProductRecord, ProductsServiceError> {
            tokio::time::sleep(Duration::from_secs(60)).await;

            Err(ProductsServiceError::NotFound)
        }

        async fn create_product(
            &self,
            _product: NewProduct,
        ) -> Result<ProductRecord, ProductsServiceError> {
            Err(ProductsServiceError::InvalidData)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_catalog_times_out() -> TestResult {
        let service = StoreCartsService::new(
            Arc::new(MemoryCartStore::new()),
            Arc::new(StalledCatalog),
            CartsSettings::default(),
        );

        let result = service.add_item(&owner("U1"), ProductUuid::new(), 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::Timeout(Dependency::Catalog))),
            "expected catalog Timeout, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn catalog_failures_surface_as_catalog_errors() -> TestResult {
        let mut catalog = crate::domain::products::MockProductsService::new();

        catalog
            .expect_get_product()
            .once()
            .returning(|_| Err(ProductsServiceError::InvalidData));

        let service = StoreCartsService::new(
            Arc::new(MemoryCartStore::new()),
            Arc::new(catalog),
            CartsSettings::default(),
        );

        let result = service.add_item(&owner("U1"), ProductUuid::new(), 1).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::Catalog(ProductsServiceError::InvalidData))
            ),
            "expected Catalog error, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn total_beyond_storable_range_is_not_persisted() -> TestResult {
        let Fixture {
            service,
            store,
            catalog,
        } = fixture();

        let yacht = stock(&catalog, "Yacht", crate::domain::carts::records::MAX_AMOUNT).await;

        let result = service.add_item(&owner("U1"), yacht.uuid, 2).await;

        assert!(
            matches!(result, Err(CartsServiceError::TotalOverflow)),
            "expected TotalOverflow, got {result:?}"
        );
        assert_eq!(store.get_cart(&owner("U1")).await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn writes_carry_the_service_timestamp() -> TestResult {
        let catalog = MemoryProductsService::new();
        let p1 = stock(&catalog, "P1", 10_00).await;

        let existing = CartRecord {
            updated_at: Timestamp::UNIX_EPOCH,
            version: 1,
            ..CartRecord::new(owner("U1"))
        };

        let before = Timestamp::now();

        let mut store = MockCartStore::new();

        store
            .expect_get_cart()
            .once()
            .return_once(move |_| Ok(Some(existing)));

        store
            .expect_update_cart()
            .once()
            .withf(move |cart, expected| *expected == 1 && cart.updated_at >= before)
            .return_once(|cart, expected| {
                Ok(CartRecord {
                    version: expected + 1,
                    ..cart.clone()
                })
            });

        store.expect_create_cart().never();
        store.expect_delete_cart().never();

        let service =
            StoreCartsService::new(Arc::new(store), Arc::new(catalog), CartsSettings::default());

        let added = service.add_item(&owner("U1"), p1.uuid, 1).await?;

        assert!(added.cart.updated_at >= before);
        assert_eq!(added.cart.version, 2);

        Ok(())
    }
}
