//! Server configuration module

use clap::Parser;
use trolley_app::context::AppConfig;

use crate::config::{
    auth::AuthConfig,
    carts::CartsConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
    storage::StorageConfig,
};

pub(crate) mod auth;
pub(crate) mod carts;
pub(crate) mod observability;
pub(crate) mod server;
pub(crate) mod storage;

/// Trolley JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "trolley-json", about = "Trolley JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request logging and metrics settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Cart and product storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Bearer token verification settings.
    #[command(flatten)]
    pub auth: AuthConfig,

    /// Cart write settings.
    #[command(flatten)]
    pub carts: CartsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Application settings for building the [`AppContext`](trolley_app::context::AppContext).
    ///
    /// # Errors
    ///
    /// Returns an error when Postgres storage is selected without a database URL.
    pub fn app_config(&self) -> Result<AppConfig, clap::Error> {
        Ok(AppConfig {
            storage: self.storage.backend()?,
            jwt: self.auth.jwt_config(),
            carts: self.carts.settings(),
        })
    }
}
