//! User Errors

use salvo::http::StatusError;
use tracing::error;

use trolley_app::domain::users::UsersServiceError;

pub(crate) fn into_status_error(error: UsersServiceError) -> StatusError {
    match error {
        UsersServiceError::AlreadyExists => {
            StatusError::conflict().brief("A user with this email already exists")
        }
        UsersServiceError::MissingRequiredData => {
            StatusError::bad_request().brief("Incomplete data (name, age, email, password)")
        }
        UsersServiceError::InvalidData | UsersServiceError::InvalidAge(_) => {
            StatusError::bad_request().brief("Invalid user payload")
        }
        UsersServiceError::InvalidCredentials => {
            StatusError::bad_request().brief("Invalid email or password")
        }
        UsersServiceError::PasswordHash(source) => {
            error!("password hashing failed: {source}");

            StatusError::internal_server_error()
        }
        UsersServiceError::HashingTask(source) => {
            error!("password hashing task failed: {source}");

            StatusError::internal_server_error()
        }
        UsersServiceError::Sql(source) => {
            error!("user query failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
