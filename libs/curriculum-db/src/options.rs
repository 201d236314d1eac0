//! Turning a `DbConnConfig` into a live connection.

use std::path::{Path, PathBuf};

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::DbConnConfig;
use crate::{DbEngine, DbError, Result};

/// Connect using the configured DSN and pool settings.
///
/// In-memory `SQLite` is pinned to a single pooled connection, otherwise every
/// pooled connection would see its own empty database. For `SQLite` files the
/// parent directory is created and `mode=rwc` is appended when no mode is given.
///
/// # Errors
/// Returns an error if the DSN is unsupported, the engine feature is disabled,
/// the `SQLite` directory cannot be created, or the connection fails.
pub async fn connect(cfg: &DbConnConfig) -> Result<DatabaseConnection> {
    let engine = DbEngine::from_dsn(&cfg.dsn)?;
    engine.ensure_enabled()?;

    let mut dsn = cfg.dsn.clone();
    let memory = engine == DbEngine::Sqlite && is_memory_dsn(&dsn);

    if engine == DbEngine::Sqlite && !memory && cfg.create_sqlite_dirs {
        dsn = prepare_sqlite_path(&dsn)?;
    }

    let mut opts = ConnectOptions::new(dsn);
    opts.sqlx_logging(cfg.sqlx_logging);

    if memory {
        opts.max_connections(1).min_connections(1);
    } else {
        if let Some(n) = cfg.pool.max_conns {
            opts.max_connections(n);
        }
        if let Some(n) = cfg.pool.min_conns {
            opts.min_connections(n);
        }
    }
    if let Some(t) = cfg.pool.acquire_timeout {
        opts.acquire_timeout(t);
    }
    if let Some(t) = cfg.pool.idle_timeout {
        opts.idle_timeout(t);
    }
    if let Some(t) = cfg.pool.max_lifetime {
        opts.max_lifetime(t);
    }

    tracing::info!(
        dsn = %redact_credentials_in_dsn(Some(&cfg.dsn)),
        ?engine,
        "Connecting to database"
    );
    let conn = Database::connect(opts).await?;
    Ok(conn)
}

/// `true` for DSNs that open a private in-memory `SQLite` database.
#[must_use]
pub fn is_memory_dsn(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

/// Extract the filesystem path from a `SQLite` DSN (`sqlite://path?..` or `sqlite:path`).
fn sqlite_file_path(dsn: &str) -> Option<PathBuf> {
    let rest = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

fn prepare_sqlite_path(dsn: &str) -> Result<String> {
    let path = sqlite_file_path(dsn)
        .ok_or_else(|| DbError::InvalidConfig(format!("SQLite DSN has no file path: {dsn}")))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    if dsn.contains("mode=") {
        return Ok(dsn.to_owned());
    }
    let sep = if dsn.contains('?') { '&' } else { '?' };
    Ok(format!("{dsn}{sep}mode=rwc"))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "Creating SQLite data directory");
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Redact the password of a DSN for logging.
#[must_use]
pub fn redact_credentials_in_dsn(dsn: Option<&str>) -> String {
    match dsn {
        Some(dsn) if dsn.contains('@') => {
            if let Ok(mut parsed) = url::Url::parse(dsn) {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("***"));
                }
                parsed.to_string()
            } else {
                "***".to_owned()
            }
        }
        Some(dsn) => dsn.to_owned(),
        None => "none".to_owned(),
    }
}
