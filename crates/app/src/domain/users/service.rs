//! Users service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::users::{
        data::{Credentials, NewUser},
        errors::UsersServiceError,
        password,
        records::UserRecord,
        repository::{PgUsersRepository, UserRow},
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
    hash_cost: u32,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Override the bcrypt cost used for new passwords.
    #[must_use]
    pub fn with_hash_cost(self, hash_cost: u32) -> Self {
        Self { hash_cost, ..self }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    #[tracing::instrument(name = "users.service.create_user", skip_all, err)]
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        let user = user.validated()?;

        i32::try_from(user.age)?;

        let password_hash = password::hash(user.password, self.hash_cost).await?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_user(
                &mut tx,
                UserRow {
                    uuid: user.uuid,
                    name: &user.name,
                    age: user.age,
                    email: &user.email,
                    password_hash: &password_hash,
                },
            )
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let users = self.repository.list_users(&mut tx).await?;

        tx.commit().await?;

        Ok(users)
    }

    #[tracing::instrument(name = "users.service.authenticate", skip_all, err(level = "debug"))]
    async fn authenticate(&self, credentials: Credentials) -> Result<UserRecord, UsersServiceError> {
        let credentials = credentials.validated()?;

        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .find_user_by_email(&mut tx, &credentials.email)
            .await?;

        tx.commit().await?;

        check_password(user, credentials.password).await
    }
}

/// Accept `user` only when it exists and `password` matches its hash.
pub(crate) async fn check_password(
    user: Option<UserRecord>,
    password: String,
) -> Result<UserRecord, UsersServiceError> {
    let Some(user) = user else {
        return Err(UsersServiceError::InvalidCredentials);
    };

    if password::verify(password, user.password_hash.clone()).await? {
        Ok(user)
    } else {
        Err(UsersServiceError::InvalidCredentials)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Register a user, hashing their password.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// All registered users, oldest first.
    async fn list_users(&self) -> Result<Vec<UserRecord>, UsersServiceError>;

    /// Look a user up by email and check their password.
    async fn authenticate(&self, credentials: Credentials) -> Result<UserRecord, UsersServiceError>;
}
