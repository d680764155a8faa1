//! Users Data

use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::domain::users::{errors::UsersServiceError, records::UserUuid};

/// Registration data. `password` is plain text and only ever hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub name: String,
    pub age: u32,
    pub email: String,
    pub password: String,
}

impl NewUser {
    /// Check required fields and normalise the email for storage.
    pub(crate) fn validated(mut self) -> Result<Self, UsersServiceError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.age == 0
        {
            return Err(UsersServiceError::MissingRequiredData);
        }

        self.email = normalise_email(&self.email);

        if !self.email.contains('@') {
            return Err(UsersServiceError::InvalidData);
        }

        Ok(self)
    }
}

impl Debug for NewUser {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("NewUser")
            .field("uuid", &self.uuid)
            .field("name", &self.name)
            .field("age", &self.age)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Email and password presented at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub(crate) fn validated(mut self) -> Result<Self, UsersServiceError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(UsersServiceError::MissingRequiredData);
        }

        self.email = normalise_email(&self.email);

        Ok(self)
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn normalise_email(email: &str) -> String {
    email.trim().to_lowercase()
}
