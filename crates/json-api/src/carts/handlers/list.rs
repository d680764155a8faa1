//! List Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trolley_app::domain::carts::data::ListedCartItem;

use crate::{
    carts::errors::into_status_error, extensions::*, products::get::ProductResponse,
    state::State,
};

/// Listed Cart Item
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ListedCartItemResponse {
    /// The product's UUID, which identifies the item within the cart
    pub item_id: Uuid,

    /// The product as it is in the catalog now
    pub product: ProductResponse,

    pub quantity: u32,
}

impl From<ListedCartItem> for ListedCartItemResponse {
    fn from(item: ListedCartItem) -> Self {
        Self {
            item_id: item.item_id.into(),
            product: item.product.into(),
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ListCartResponse {
    pub items: Vec<ListedCartItemResponse>,
}

/// List Cart Handler
///
/// Returns the owner's items with live product data. Products that have left
/// the catalog are omitted.
#[endpoint(
    tags("carts"),
    summary = "List Cart Items",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart items"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::GATEWAY_TIMEOUT, description = "Dependency timed out"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "carts.list", skip(depot), err)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ListCartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_or_401()?;

    let items = state
        .app
        .carts
        .list_items(&owner)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ListCartResponse {
        items: items.into_iter().map(Into::into).collect(),
    }))
}
