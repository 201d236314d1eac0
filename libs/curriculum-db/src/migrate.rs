//! Logged wrappers around a module's `MigratorTrait`.
//!
//! Modules own their migration lists; the host only decides *when* to run them.

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::Result;

/// Result of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Names of the migrations applied (or rolled back) by this call, in order.
    pub names: Vec<String>,
}

impl MigrationReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Applied and pending migration names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied: Vec<String>,
    pub pending: Vec<String>,
}

/// Apply all pending migrations.
///
/// # Errors
/// Returns an error if reading the history table or any migration fails.
pub async fn run_migrations<M: MigratorTrait>(db: &DatabaseConnection) -> Result<MigrationReport> {
    let pending: Vec<String> = M::get_pending_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_owned())
        .collect();

    if pending.is_empty() {
        debug!("No pending migrations");
        return Ok(MigrationReport::default());
    }

    for name in &pending {
        debug!(migration = %name, "Applying migration");
    }
    M::up(db, None).await?;
    info!(count = pending.len(), "Applied migrations");

    Ok(MigrationReport { names: pending })
}

/// Roll back the last `steps` applied migrations.
///
/// # Errors
/// Returns an error if reading the history table or any `down` step fails.
pub async fn rollback<M: MigratorTrait>(
    db: &DatabaseConnection,
    steps: u32,
) -> Result<MigrationReport> {
    let applied: Vec<String> = M::get_applied_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_owned())
        .collect();

    let take = usize::try_from(steps).unwrap_or(usize::MAX).min(applied.len());
    let names: Vec<String> = applied.iter().rev().take(take).cloned().collect();

    if names.is_empty() {
        debug!("Nothing to roll back");
        return Ok(MigrationReport::default());
    }

    M::down(db, Some(steps)).await?;
    info!(count = names.len(), "Rolled back migrations");

    Ok(MigrationReport { names })
}

/// Report which migrations are applied and which are pending.
///
/// # Errors
/// Returns an error if the history table cannot be read.
pub async fn migration_status<M: MigratorTrait>(db: &DatabaseConnection) -> Result<MigrationStatus> {
    let applied = M::get_applied_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_owned())
        .collect();
    let pending = M::get_pending_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_owned())
        .collect();
    Ok(MigrationStatus { applied, pending })
}
