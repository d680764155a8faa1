//! Cart Data

use crate::domain::{
    carts::records::{CartItemRecord, CartRecord},
    owners::OwnerId,
    products::records::{ProductRecord, ProductUuid},
};

/// Result of adding an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedItem {
    pub cart: CartRecord,

    /// Whether this call created the cart.
    pub created: bool,
}

/// Owner, items and total of a cart, without bookkeeping fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub owner: OwnerId,
    pub items: Vec<CartItemRecord>,
    pub total: u64,
}

impl From<CartRecord> for CartSummary {
    fn from(cart: CartRecord) -> Self {
        Self {
            owner: cart.owner,
            items: cart.items,
            total: cart.total,
        }
    }
}

/// A cart line enriched with live catalog data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedCartItem {
    pub item_id: ProductUuid,
    pub product: ProductRecord,
    pub quantity: u32,
}
