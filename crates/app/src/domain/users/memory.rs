//! In-memory user accounts.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;

use crate::domain::users::{
    UsersService,
    data::{Credentials, NewUser},
    errors::UsersServiceError,
    password,
    records::UserRecord,
    service::check_password,
};

/// Users held in process memory, keyed by normalised email.
#[derive(Debug, Clone)]
pub struct MemoryUsersService {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
    hash_cost: u32,
}

impl Default for MemoryUsersService {
    fn default() -> Self {
        Self {
            users: Arc::default(),
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl MemoryUsersService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the bcrypt cost used for new passwords.
    #[must_use]
    pub fn with_hash_cost(self, hash_cost: u32) -> Self {
        Self { hash_cost, ..self }
    }
}

#[async_trait]
impl UsersService for MemoryUsersService {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        let user = user.validated()?;

        if self.users.read().await.contains_key(&user.email) {
            return Err(UsersServiceError::AlreadyExists);
        }

        let password_hash = password::hash(user.password, self.hash_cost).await?;

        let now = Timestamp::now();

        let record = UserRecord {
            uuid: user.uuid,
            name: user.name,
            age: user.age,
            email: user.email,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let mut users = self.users.write().await;

        // Re-checked: another registration may have landed while hashing.
        if users.contains_key(&record.email) || users.values().any(|u| u.uuid == record.uuid) {
            return Err(UsersServiceError::AlreadyExists);
        }

        users.insert(record.email.clone(), record.clone());

        Ok(record)
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, UsersServiceError> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();

        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.uuid.cmp(&b.uuid)));

        Ok(users)
    }

    async fn authenticate(&self, credentials: Credentials) -> Result<UserRecord, UsersServiceError> {
        let credentials = credentials.validated()?;

        let user = self.users.read().await.get(&credentials.email).cloned();

        check_password(user, credentials.password).await
    }
}
