//! Cart Owners

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::users::records::UserUuid;

/// Verified identifier of the party that owns a cart.
///
/// Opaque to this crate; it is whatever the identity provider put in the
/// token. An `OwnerId` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("owner identifier is empty")]
pub struct EmptyOwnerId;

impl OwnerId {
    /// Parse an owner identifier, rejecting blank values.
    pub fn parse(value: impl Into<String>) -> Result<Self, EmptyOwnerId> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(EmptyOwnerId);
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl FromStr for OwnerId {
    type Err = EmptyOwnerId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for OwnerId {
    type Error = EmptyOwnerId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UserUuid> for OwnerId {
    fn from(user: UserUuid) -> Self {
        Self(user.to_string())
    }
}

impl From<OwnerId> for String {
    fn from(value: OwnerId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_owner_ids_are_rejected() {
        assert_eq!(OwnerId::parse(""), Err(EmptyOwnerId));
        assert_eq!(OwnerId::parse("   "), Err(EmptyOwnerId));
    }

    #[test]
    fn owner_id_keeps_value_verbatim() {
        let owner = OwnerId::parse("U1").ok();

        assert_eq!(owner.as_ref().map(OwnerId::as_str), Some("U1"));
    }

    #[test]
    fn users_own_carts_by_uuid() {
        let user = UserUuid::new();

        assert_eq!(OwnerId::from(user).as_str(), user.to_string());
    }

    #[test]
    fn owner_id_deserialization_rejects_empty_strings() {
        let result = serde_json::from_str::<OwnerId>("\"\"");

        assert!(result.is_err(), "empty owner should not deserialize");
    }
}
