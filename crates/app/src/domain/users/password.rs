//! Password hashing.
//!
//! bcrypt is deliberately slow, so both directions run on the blocking pool.

use tokio::task::spawn_blocking;

use crate::domain::users::errors::UsersServiceError;

pub(crate) async fn hash(password: String, cost: u32) -> Result<String, UsersServiceError> {
    spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(UsersServiceError::HashingTask)?
        .map_err(UsersServiceError::PasswordHash)
}

pub(crate) async fn verify(password: String, hash: String) -> Result<bool, UsersServiceError> {
    spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(UsersServiceError::HashingTask)?
        .map_err(UsersServiceError::PasswordHash)
}
