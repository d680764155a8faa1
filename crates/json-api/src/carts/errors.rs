//! Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use trolley_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::Unauthenticated => {
            StatusError::unauthorized().brief("Owner not authenticated")
        }
        CartsServiceError::InvalidQuantity(quantity) => StatusError::bad_request().brief(
            format!("Quantity must be a positive integer, got {quantity}"),
        ),
        CartsServiceError::TotalOverflow => {
            StatusError::bad_request().brief("Cart total is too large")
        }
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::CartNotFound => StatusError::not_found().brief("Cart not found"),
        CartsServiceError::ItemNotFound => {
            StatusError::not_found().brief("Item not found in cart")
        }
        CartsServiceError::ConcurrentModification { attempts } => {
            warn!("cart write abandoned after {attempts} conflicting attempts");

            StatusError::conflict().brief("Cart was modified concurrently, please retry")
        }
        CartsServiceError::Timeout(dependency) => {
            warn!("timed out waiting for the {dependency}");

            StatusError::gateway_timeout().brief(format!("Timed out waiting for the {dependency}"))
        }
        CartsServiceError::Catalog(source) => {
            error!("product catalog failed during cart operation: {source}");

            StatusError::internal_server_error()
        }
        CartsServiceError::Store(source) => {
            error!("cart store failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
