//! User Records

use std::fmt::{Debug, Formatter, Result as FmtResult};

use jiff::Timestamp;

use crate::{domain::owners::OwnerId, uuids::TypedUuid};

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

/// User Record
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub uuid: UserUuid,
    pub name: String,
    pub age: u32,
    /// Lower-cased login email.
    pub email: String,
    /// bcrypt hash of the user's password.
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserRecord {
    /// The cart owner this user authenticates as.
    #[must_use]
    pub fn owner_id(&self) -> OwnerId {
        OwnerId::from(self.uuid)
    }
}

impl Debug for UserRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("UserRecord")
            .field("uuid", &self.uuid)
            .field("name", &self.name)
            .field("age", &self.age)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
