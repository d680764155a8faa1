//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use trolley_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            records::{CartItemRecord, CartRecord},
        },
        owners::OwnerId,
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        users::{
            MockUsersService,
            records::{UserRecord, UserUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_OWNER: &str = "U1";

pub(crate) fn test_owner() -> OwnerId {
    OwnerId::parse(TEST_OWNER).expect("test owner is not blank")
}

#[salvo::handler]
pub(crate) async fn inject_owner(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_owner(test_owner());
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();
    auth.expect_issue_token().never();

    auth
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_add_item().never();
    carts.expect_remove_item().never();
    carts.expect_update_quantity().never();
    carts.expect_list_items().never();
    carts.expect_clear_cart().never();

    carts
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_create_product().never();

    products
}

fn strict_users_mock() -> MockUsersService {
    let mut users = MockUsersService::new();

    users.expect_create_user().never();
    users.expect_list_users().never();
    users.expect_authenticate().never();

    users
}

fn state(
    carts: MockCartsService,
    products: MockProductsService,
    users: MockUsersService,
    auth: MockAuthService,
) -> Arc<State> {
    State::from_app_context(AppContext::from_services(
        Arc::new(carts),
        Arc::new(products),
        Arc::new(users),
        Arc::new(auth),
    ))
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state(
        strict_carts_mock(),
        strict_products_mock(),
        strict_users_mock(),
        auth,
    )
}

pub(crate) fn state_with_products(products: MockProductsService) -> Arc<State> {
    state(
        strict_carts_mock(),
        products,
        strict_users_mock(),
        strict_auth_mock(),
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(
                carts,
                strict_products_mock(),
                strict_users_mock(),
                strict_auth_mock(),
            )))
            .hoop(inject_owner)
            .push(route),
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(
                strict_carts_mock(),
                products,
                strict_users_mock(),
                strict_auth_mock(),
            )))
            .hoop(inject_owner)
            .push(route),
    )
}

pub(crate) fn users_service(
    users: MockUsersService,
    auth: MockAuthService,
    route: Router,
) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(
                strict_carts_mock(),
                strict_products_mock(),
                users,
                auth,
            )))
            .hoop(inject_owner)
            .push(route),
    )
}

pub(crate) fn make_user(email: &str) -> UserRecord {
    UserRecord {
        uuid: UserUuid::new(),
        name: "Ana".to_string(),
        age: 30,
        email: email.to_string(),
        password_hash: "$2b$04$hashhashhashhashhashhu".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_product(uuid: ProductUuid, name: &str, price: u64) -> ProductRecord {
    ProductRecord {
        uuid,
        name: name.to_string(),
        price,
        description: String::new(),
        image_url: String::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(items: &[(&ProductRecord, u32)]) -> CartRecord {
    let items: Vec<CartItemRecord> = items
        .iter()
        .map(|(product, quantity)| CartItemRecord {
            product_uuid: product.uuid,
            name: product.name.clone(),
            unit_price: product.price,
            quantity: *quantity,
        })
        .collect();

    CartRecord {
        owner: test_owner(),
        total: items
            .iter()
            .map(|item| item.unit_price * u64::from(item.quantity))
            .sum(),
        items,
        updated_at: Timestamp::UNIX_EPOCH,
        version: 1,
    }
}
