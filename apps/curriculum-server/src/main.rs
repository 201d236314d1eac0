mod config;
mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use curriculum::Migrator;
use curriculum_db::{
    DatabaseConnection, connect, migration_status, redact_credentials_in_dsn, rollback,
    run_migrations,
};

use crate::config::{AppConfig, CliOverrides, LogFormat};

/// Curriculum Server - operator tooling for the curriculum database
#[derive(Parser)]
#[command(name = "curriculum-server")]
#[command(about = "Curriculum Server - operator tooling for the curriculum database")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database DSN override (overrides config)
    #[arg(long)]
    dsn: Option<String>,

    /// Emit logs as JSON (overrides config)
    #[arg(long)]
    json_logs: bool,

    /// Print effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Commands {
    /// Apply all pending migrations
    Migrate,
    /// Roll back the most recent migrations
    Rollback {
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// List applied and pending migrations
    Status,
    /// Validate configuration and database connectivity, then exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref().filter(|p| !p.is_file()) {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    let overrides = CliOverrides {
        dsn: cli.dsn.clone(),
        log_format: cli.json_logs.then_some(LogFormat::Json),
    };
    let config = AppConfig::load(cli.config.as_deref(), &overrides)?;

    if cli.print_config {
        println!("{}", config.to_pretty_json()?);
        return Ok(());
    }

    logging::init(&config.logging, cli.verbose)?;
    tracing::info!(
        dsn = %redact_credentials_in_dsn(Some(&config.database.dsn)),
        "Curriculum Server starting"
    );

    execute(&config, cli.command.unwrap_or(Commands::Status), cli.config.as_deref()).await
}

async fn open(config: &AppConfig) -> Result<DatabaseConnection> {
    connect(&config.database).await.with_context(|| {
        format!(
            "failed to connect to {}",
            redact_credentials_in_dsn(Some(&config.database.dsn))
        )
    })
}

async fn execute(config: &AppConfig, command: Commands, source: Option<&Path>) -> Result<()> {
    let db = open(config).await?;

    match command {
        Commands::Migrate => {
            let report = run_migrations::<Migrator>(&db)
                .await
                .context("migration failed")?;
            if report.is_empty() {
                println!("Database is up to date");
            }
            for name in &report.names {
                println!("applied   {name}");
            }
        }
        Commands::Rollback { steps } => {
            let report = rollback::<Migrator>(&db, steps)
                .await
                .context("rollback failed")?;
            if report.is_empty() {
                println!("Nothing to roll back");
            }
            for name in &report.names {
                println!("reverted  {name}");
            }
        }
        Commands::Status => {
            let status = migration_status::<Migrator>(&db).await?;
            for name in &status.applied {
                println!("applied   {name}");
            }
            for name in &status.pending {
                println!("pending   {name}");
            }
        }
        Commands::Check => check(config, db, source).await?,
    }
    Ok(())
}

async fn check(config: &AppConfig, db: DatabaseConnection, source: Option<&Path>) -> Result<()> {
    tracing::info!("Checking configuration...");

    let status = migration_status::<Migrator>(&db).await?;
    if !status.pending.is_empty() {
        tracing::warn!(pending = status.pending.len(), "Database has pending migrations");
    }

    // Wire the services once so a broken service section fails here.
    let _client = curriculum::build_local_client(db, config.curriculum.clone());

    match source {
        Some(path) => println!("Configuration {} is valid", path.display()),
        None => println!("Configuration is valid"),
    }
    println!(
        "{} applied, {} pending migrations",
        status.applied.len(),
        status.pending.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use clap::CommandFactory;

    fn file_config(dir: &tempfile::TempDir) -> AppConfig {
        let mut config = AppConfig::default();
        let path = dir.path().join("data").join("curriculum.db");
        config.database.dsn = format!("sqlite://{}", path.display());
        config
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rollback_defaults_to_one_step() {
        let cli = Cli::try_parse_from(["curriculum-server", "-vv", "rollback"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.command, Some(Commands::Rollback { steps: 1 }));

        let cli = Cli::try_parse_from(["curriculum-server", "rollback", "--steps", "2"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Rollback { steps: 2 }));
    }

    #[tokio::test]
    async fn migrate_status_and_rollback_on_a_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir);

        execute(&config, Commands::Migrate, None).await.unwrap();
        let db = open(&config).await.unwrap();
        let status = migration_status::<Migrator>(&db).await.unwrap();
        assert_eq!(status.applied.len(), 2);
        assert!(status.pending.is_empty());
        drop(db);

        execute(&config, Commands::Rollback { steps: 1 }, None)
            .await
            .unwrap();
        let db = open(&config).await.unwrap();
        let status = migration_status::<Migrator>(&db).await.unwrap();
        assert_eq!(status.applied.len(), 1);
        assert_eq!(status.pending.len(), 1);
        drop(db);

        execute(&config, Commands::Check, None).await.unwrap();
    }
}
