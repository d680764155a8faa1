//! App Router

use salvo::Router;

use crate::{auth, carts, products, users};

/// Catalog reads, registration and login are public. Everything else requires a
/// bearer token.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("login").post(users::login::handler))
        .push(Router::with_path("users").post(users::create::handler))
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(Router::with_path("products").post(products::create::handler))
                .push(Router::with_path("users").get(users::index::handler))
                .push(
                    Router::with_path("cart")
                        .get(carts::list::handler)
                        .delete(carts::clear::handler)
                        .push(
                            Router::with_path("items")
                                .post(carts::items::create::handler)
                                .push(
                                    Router::with_path("{product}")
                                        .put(carts::items::update::handler)
                                        .delete(carts::items::delete::handler),
                                ),
                        ),
                ),
        )
}
