//! App Context

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
    time::Duration,
};

use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::{
    auth::{AuthService, DEFAULT_SESSION_TTL, JwtAuthService, JwtConfig},
    database::{self, Db},
    domain::{
        carts::{
            CartsService, CartsSettings, StoreCartsService,
            store::{CartStore, MemoryCartStore, PgCartStore},
        },
        products::{MemoryProductsService, PgProductsService, ProductsService},
        users::{MemoryUsersService, PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] MigrateError),
}

/// Where carts, products and users live.
#[derive(Clone)]
pub enum StorageBackend {
    Postgres { database_url: String },
    Memory,
}

impl Debug for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Postgres { .. } => f.write_str("Postgres"),
            Self::Memory => f.write_str("Memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub jwt: JwtConfig,
    pub carts: CartsSettings,
}

#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub products: Arc<dyn ProductsService>,
    pub users: Arc<dyn UsersService>,
    pub auth: Arc<dyn AuthService>,
    /// Lifetime of tokens issued at login.
    pub session_ttl: Duration,
    db: Option<Db>,
}

impl Debug for AppContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AppContext")
            .field("session_ttl", &self.session_ttl)
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Assemble a context from already-built services.
    #[must_use]
    pub fn from_services(
        carts: Arc<dyn CartsService>,
        products: Arc<dyn ProductsService>,
        users: Arc<dyn UsersService>,
        auth: Arc<dyn AuthService>,
    ) -> Self {
        Self {
            carts,
            products,
            users,
            auth,
            session_ttl: DEFAULT_SESSION_TTL,
            db: None,
        }
    }

    #[must_use]
    pub fn with_session_ttl(self, session_ttl: Duration) -> Self {
        Self {
            session_ttl,
            ..self
        }
    }

    /// Build the application context, connecting to and migrating the
    /// database when Postgres storage is selected.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let session_ttl = config.jwt.session_ttl;
        let auth: Arc<dyn AuthService> = Arc::new(JwtAuthService::new(config.jwt));

        match config.storage {
            StorageBackend::Postgres { database_url } => {
                let db = database::connect(&database_url)
                    .await
                    .map_err(AppInitError::Database)?;

                db.migrate().await.map_err(AppInitError::Migrate)?;

                let products: Arc<dyn ProductsService> =
                    Arc::new(PgProductsService::new(db.clone()));
                let store: Arc<dyn CartStore> = Arc::new(PgCartStore::new(db.clone()));

                Ok(Self {
                    carts: Arc::new(StoreCartsService::new(
                        store,
                        Arc::clone(&products),
                        config.carts,
                    )),
                    products,
                    users: Arc::new(PgUsersService::new(db.clone())),
                    auth,
                    session_ttl,
                    db: Some(db),
                })
            }
            StorageBackend::Memory => {
                Ok(Self::in_memory(auth, config.carts).with_session_ttl(session_ttl))
            }
        }
    }

    /// Context backed entirely by process memory.
    #[must_use]
    pub fn in_memory(auth: Arc<dyn AuthService>, settings: CartsSettings) -> Self {
        let products: Arc<dyn ProductsService> = Arc::new(MemoryProductsService::new());

        let carts = Arc::new(StoreCartsService::new(
            Arc::new(MemoryCartStore::new()),
            Arc::clone(&products),
            settings,
        ));

        Self::from_services(carts, products, Arc::new(MemoryUsersService::new()), auth)
    }

    /// Release held resources. Safe to call on memory-backed contexts.
    pub async fn shutdown(&self) {
        if let Some(db) = &self.db {
            db.close().await;
        }
    }
}
