//! Database plumbing for the curriculum workspace.
//!
//! This crate owns everything between a configuration section and a live
//! `SeaORM` connection:
//! - `config`: serde-friendly connection and pool settings
//! - `options`: engine detection, `SQLite` path preparation and `connect`
//! - `migrate`: thin, logged wrappers around a module's `MigratorTrait`
//!
//! Modules receive a `DatabaseConnection` and never build DSNs themselves.
//!
//! # Features
//! - `sqlite` (default), `pg`: enable the matching `SQLx` backend in `SeaORM`

pub use sea_orm::ConnectionTrait as DbConnTrait;
pub use sea_orm::DatabaseConnection;

pub mod config;
pub mod migrate;
pub mod options;

pub use config::{DbConnConfig, PoolCfg};
pub use migrate::{MigrationReport, MigrationStatus, migration_status, rollback, run_migrations};
pub use options::{connect, redact_credentials_in_dsn};

use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Typed error for connection setup and migrations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unknown DSN: {0}")]
    UnknownDsn(String),

    #[error("Feature not enabled: {0}")]
    FeatureDisabled(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error(transparent)]
    Sea(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Supported engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    Sqlite,
}

impl DbEngine {
    /// Infer the engine from a DSN scheme.
    ///
    /// # Errors
    /// Returns `DbError::UnknownDsn` for unsupported schemes.
    pub fn from_dsn(dsn: &str) -> Result<Self> {
        if dsn.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else if dsn.starts_with("postgres://") || dsn.starts_with("postgresql://") {
            Ok(Self::Postgres)
        } else {
            Err(DbError::UnknownDsn(redact_credentials_in_dsn(Some(dsn))))
        }
    }

    /// Fail early when the binary was built without the engine's driver.
    ///
    /// # Errors
    /// Returns `DbError::FeatureDisabled` when the matching cargo feature is off.
    pub fn ensure_enabled(self) -> Result<()> {
        match self {
            Self::Sqlite if cfg!(feature = "sqlite") => Ok(()),
            Self::Sqlite => Err(DbError::FeatureDisabled("sqlite")),
            Self::Postgres if cfg!(feature = "pg") => Ok(()),
            Self::Postgres => Err(DbError::FeatureDisabled("pg")),
        }
    }
}
