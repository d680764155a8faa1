//! Cart Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::domain::{
    carts::errors::CartsServiceError,
    owners::OwnerId,
    products::records::{ProductRecord, ProductUuid},
};

/// Largest amount, in minor units, a line or cart total may reach. Amounts are
/// persisted as signed 64-bit integers.
pub const MAX_AMOUNT: u64 = i64::MAX.unsigned_abs();

/// Cart line, carrying the product's name and price as they were when the
/// product was first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemRecord {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
}

impl CartItemRecord {
    fn snapshot(product: &ProductRecord, quantity: u32) -> Self {
        Self {
            product_uuid: product.uuid,
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
        }
    }

    /// `unit_price × quantity`, or `None` when it exceeds [`MAX_AMOUNT`].
    #[must_use]
    pub fn line_total(&self) -> Option<u64> {
        self.unit_price
            .checked_mul(u64::from(self.quantity))
            .filter(|line| *line <= MAX_AMOUNT)
    }
}

/// Cart Record
///
/// `total` always equals the sum of the item line totals and product UUIDs
/// are unique within `items`. A `version` of zero marks an aggregate that has
/// never been stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRecord {
    pub owner: OwnerId,
    pub items: Vec<CartItemRecord>,
    pub total: u64,
    pub updated_at: Timestamp,
    pub version: u64,
}

impl CartRecord {
    /// An empty, unsaved cart.
    #[must_use]
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            items: Vec::new(),
            total: 0,
            updated_at: Timestamp::now(),
            version: 0,
        }
    }

    #[must_use]
    pub fn item(&self, product: ProductUuid) -> Option<&CartItemRecord> {
        self.items.iter().find(|item| item.product_uuid == product)
    }

    /// Sum of line totals, or `None` when it exceeds [`MAX_AMOUNT`].
    #[must_use]
    pub fn computed_total(&self) -> Option<u64> {
        self.items.iter().try_fold(0_u64, |total, item| {
            item.line_total()
                .and_then(|line| total.checked_add(line))
                .filter(|total| *total <= MAX_AMOUNT)
        })
    }

    /// Add `quantity` of `product`. An existing line keeps its snapshot and
    /// only grows; otherwise a new line snapshots the product as it is now.
    pub(crate) fn merge_item(
        &mut self,
        product: &ProductRecord,
        quantity: u32,
    ) -> Result<(), CartsServiceError> {
        match self
            .items
            .iter_mut()
            .find(|item| item.product_uuid == product.uuid)
        {
            Some(item) => {
                item.quantity = item
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartsServiceError::TotalOverflow)?;
            }
            None => self.items.push(CartItemRecord::snapshot(product, quantity)),
        }

        self.recompute_total()
    }

    /// Remove the line for `product`.
    pub(crate) fn remove_item(
        &mut self,
        product: ProductUuid,
    ) -> Result<CartItemRecord, CartsServiceError> {
        let position = self
            .items
            .iter()
            .position(|item| item.product_uuid == product)
            .ok_or(CartsServiceError::ItemNotFound)?;

        let removed = self.items.remove(position);

        self.recompute_total()?;

        Ok(removed)
    }

    /// Overwrite the quantity of the line for `product`.
    pub(crate) fn set_quantity(
        &mut self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), CartsServiceError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.product_uuid == product)
            .ok_or(CartsServiceError::ItemNotFound)?;

        item.quantity = quantity;

        self.recompute_total()
    }

    fn recompute_total(&mut self) -> Result<(), CartsServiceError> {
        self.total = self
            .computed_total()
            .ok_or(CartsServiceError::TotalOverflow)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn owner() -> OwnerId {
        OwnerId::parse("U1").expect("valid owner")
    }

    fn product(name: &str, price: u64) -> ProductRecord {
        ProductRecord {
            uuid: ProductUuid::new(),
            name: name.to_string(),
            price,
            description: String::new(),
            image_url: String::new(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn new_cart_is_empty_and_unsaved() {
        let cart = CartRecord::new(owner());

        assert!(cart.items.is_empty());
        assert_eq!(cart.total, 0);
        assert_eq!(cart.version, 0);
    }

    #[test]
    fn merging_new_product_appends_snapshot() -> TestResult {
        let mug = product("Mug", 10_00);
        let mut cart = CartRecord::new(owner());

        cart.merge_item(&mug, 2)?;

        assert_eq!(
            cart.items,
            vec![CartItemRecord {
                product_uuid: mug.uuid,
                name: "Mug".to_string(),
                unit_price: 10_00,
                quantity: 2,
            }]
        );
        assert_eq!(cart.total, 20_00);

        Ok(())
    }

    #[test]
    fn merging_existing_product_increments_and_keeps_snapshot() -> TestResult {
        let mug = product("Mug", 10_00);
        let mut cart = CartRecord::new(owner());

        cart.merge_item(&mug, 2)?;

        let repriced = ProductRecord {
            name: "Large Mug".to_string(),
            price: 99_00,
            ..mug.clone()
        };

        cart.merge_item(&repriced, 3)?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.item(mug.uuid).map(|item| item.quantity), Some(5));
        assert_eq!(cart.item(mug.uuid).map(|item| item.unit_price), Some(10_00));
        assert_eq!(
            cart.item(mug.uuid).map(|item| item.name.as_str()),
            Some("Mug")
        );
        assert_eq!(cart.total, 50_00);

        Ok(())
    }

    #[test]
    fn total_covers_every_line() -> TestResult {
        let mut cart = CartRecord::new(owner());

        cart.merge_item(&product("Mug", 10_00), 2)?;
        cart.merge_item(&product("Teapot", 25_50), 1)?;
        cart.merge_item(&product("Spoon", 1_99), 4)?;

        assert_eq!(cart.total, 20_00 + 25_50 + 7_96);
        assert_eq!(cart.computed_total(), Some(cart.total));

        Ok(())
    }

    #[test]
    fn removing_last_item_leaves_empty_cart() -> TestResult {
        let mug = product("Mug", 10_00);
        let mut cart = CartRecord::new(owner());

        cart.merge_item(&mug, 2)?;

        let removed = cart.remove_item(mug.uuid)?;

        assert_eq!(removed.product_uuid, mug.uuid);
        assert!(cart.items.is_empty());
        assert_eq!(cart.total, 0);

        Ok(())
    }

    #[test]
    fn removing_unknown_item_fails() {
        let mut cart = CartRecord::new(owner());

        let result = cart.remove_item(ProductUuid::new());

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );
    }

    #[test]
    fn set_quantity_overwrites_rather_than_adds() -> TestResult {
        let mug = product("Mug", 10_00);
        let mut cart = CartRecord::new(owner());

        cart.merge_item(&mug, 5)?;
        cart.set_quantity(mug.uuid, 1)?;

        assert_eq!(cart.item(mug.uuid).map(|item| item.quantity), Some(1));
        assert_eq!(cart.total, 10_00);

        Ok(())
    }

    #[test]
    fn overflowing_total_is_rejected() -> TestResult {
        let mut cart = CartRecord::new(owner());

        cart.merge_item(&product("Gold", u64::MAX / 2), 1)?;

        let result = cart.merge_item(&product("Platinum", u64::MAX / 2 + 2), 1);

        assert!(
            matches!(result, Err(CartsServiceError::TotalOverflow)),
            "expected TotalOverflow, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn line_above_signed_range_is_rejected() {
        let mut cart = CartRecord::new(owner());

        let result = cart.merge_item(&product("Yacht", MAX_AMOUNT), 2);

        assert!(
            matches!(result, Err(CartsServiceError::TotalOverflow)),
            "expected TotalOverflow, got {result:?}"
        );
    }

    #[test]
    fn total_above_signed_range_is_rejected() -> TestResult {
        let mut cart = CartRecord::new(owner());

        cart.merge_item(&product("Yacht", MAX_AMOUNT), 1)?;

        assert_eq!(cart.total, MAX_AMOUNT);

        let result = cart.merge_item(&product("Mug", 1), 1);

        assert!(
            matches!(result, Err(CartsServiceError::TotalOverflow)),
            "expected TotalOverflow, got {result:?}"
        );

        Ok(())
    }
}
