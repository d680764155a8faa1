//! Auth service errors.

use jsonwebtoken::errors::Error as JwtError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("invalid token")]
    InvalidToken(#[source] JwtError),

    #[error("token does not identify an owner")]
    MissingOwnerClaim,

    #[error("token could not be signed")]
    Signing(#[source] JwtError),
}
