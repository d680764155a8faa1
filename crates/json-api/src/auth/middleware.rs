//! Auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use trolley_app::auth::AuthServiceError;
use tracing::{debug, error};

use crate::{extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Bearer token not provided"));
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => state,
        Err(_error) => {
            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    let owner = match state.app.auth.authenticate_bearer(token).await {
        Ok(owner) => owner,
        Err(AuthServiceError::InvalidToken(source)) => {
            debug!("rejected bearer token: {source}");

            res.render(StatusError::unauthorized().brief("Invalid token"));
            ctrl.skip_rest();

            return;
        }
        Err(AuthServiceError::MissingOwnerClaim) => {
            res.render(StatusError::unauthorized().brief("Token does not identify an owner"));
            ctrl.skip_rest();

            return;
        }
        Err(AuthServiceError::Signing(source)) => {
            error!("unexpected signing error during authentication: {source}");

            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_owner(owner);

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
