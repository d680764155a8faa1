//! Storage Config

use clap::{Args, CommandFactory, ValueEnum, error::ErrorKind};
use trolley_app::context::StorageBackend;

use crate::config::ServerConfig;

/// Storage backend selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    /// `PostgreSQL`, requires `DATABASE_URL`.
    Postgres,

    /// Process memory; everything is lost on restart.
    Memory,
}

/// Storage settings.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Storage backend (postgres, memory)
    #[arg(long, env = "STORAGE", value_enum, default_value_t = StorageKind::Postgres)]
    pub storage: StorageKind,

    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

impl StorageConfig {
    /// Resolve the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error when Postgres is selected without a database URL.
    pub fn backend(&self) -> Result<StorageBackend, clap::Error> {
        match (self.storage, &self.database_url) {
            (StorageKind::Memory, _) => Ok(StorageBackend::Memory),
            (StorageKind::Postgres, Some(database_url)) => Ok(StorageBackend::Postgres {
                database_url: database_url.clone(),
            }),
            (StorageKind::Postgres, None) => Err(ServerConfig::command().error(
                ErrorKind::MissingRequiredArgument,
                "--database-url (or DATABASE_URL) is required with --storage postgres",
            )),
        }
    }
}
