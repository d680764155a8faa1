//! Users service errors.

use std::num::TryFromIntError;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("a user with this email already exists")]
    AlreadyExists,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    /// Unknown email or wrong password; the two are not told apart.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid age value")]
    InvalidAge(#[from] TryFromIntError),

    #[error("password hashing failed")]
    PasswordHash(#[source] bcrypt::BcryptError),

    #[error("password hashing task failed")]
    HashingTask(#[source] JoinError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unclassified_sql_errors_stay_sql() {
        let error = UsersServiceError::from(Error::PoolTimedOut);

        assert!(
            matches!(error, UsersServiceError::Sql(Error::PoolTimedOut)),
            "expected Sql, got {error:?}"
        );
    }
}
