//! Cart Responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley_app::domain::carts::{
    data::CartSummary,
    records::{CartItemRecord, CartRecord},
};

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    pub product_uuid: Uuid,

    /// Product name when first added
    pub name: String,

    /// Product price in pence/cents when first added
    pub unit_price: u64,

    pub quantity: u32,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        Self {
            product_uuid: item.product_uuid.into(),
            name: item.name,
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    pub owner: String,

    pub items: Vec<CartItemResponse>,

    /// Sum of unit price × quantity over all items
    pub total: u64,

    /// The date and time the cart was last updated
    pub updated_at: String,

    pub version: u64,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        Self {
            owner: cart.owner.into(),
            items: cart.items.into_iter().map(Into::into).collect(),
            total: cart.total,
            updated_at: cart.updated_at.to_string(),
            version: cart.version,
        }
    }
}

/// Cart Summary Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartSummaryResponse {
    pub owner: String,

    pub items: Vec<CartItemResponse>,

    pub total: u64,
}

impl From<CartSummary> for CartSummaryResponse {
    fn from(summary: CartSummary) -> Self {
        Self {
            owner: summary.owner.into(),
            items: summary.items.into_iter().map(Into::into).collect(),
            total: summary.total,
        }
    }
}
