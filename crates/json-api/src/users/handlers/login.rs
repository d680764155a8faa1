//! Login Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use trolley_app::domain::users::data::Credentials;

use crate::{extensions::*, state::State, users::errors::into_status_error};

/// Login Request
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub email: String,

    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Login Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginResponse {
    /// Bearer token for the cart routes
    pub token: String,

    /// Seconds until the token expires
    pub expires_in: u64,
}

/// Login Handler
///
/// Exchanges an email and password for a bearer token identifying the user.
#[endpoint(
    tags("users"),
    summary = "Log In",
    responses(
        (status_code = StatusCode::OK, description = "Token issued"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing or invalid credentials"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<LoginResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let LoginRequest { email, password } = json.into_inner();

    let user = state
        .app
        .users
        .authenticate(Credentials { email, password })
        .await
        .map_err(into_status_error)?;

    let token = state
        .app
        .auth
        .issue_token(&user.owner_id(), state.app.session_ttl)
        .map_err(|source| {
            error!("failed to sign session token: {source}");

            StatusError::internal_server_error()
        })?;

    Ok(Json(LoginResponse {
        token,
        expires_in: state.app.session_ttl.as_secs(),
    }))
}
