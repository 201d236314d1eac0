//! Layered application configuration.
//!
//! Precedence, lowest first: built-in defaults, the YAML file passed with
//! `--config`, `CURRICULUM__*` environment variables, then CLI flags.

use std::path::Path;

use anyhow::{Context, Result};
use curriculum::ServiceConfig;
use curriculum_db::DbConnConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment prefix; `__` separates nested keys, e.g. `CURRICULUM__DATABASE__DSN`.
pub const ENV_PREFIX: &str = "CURRICULUM__";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Base level when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DbConnConfig,
    pub logging: LoggingConfig,
    pub curriculum: ServiceConfig,
}

/// Overrides coming from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dsn: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl AppConfig {
    /// Defaults, then the optional YAML file, then the environment.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load every layer and apply CLI overrides last.
    pub fn load(path: Option<&Path>, cli: &CliOverrides) -> Result<Self> {
        let mut figment = Self::figment(path);
        if let Some(dsn) = &cli.dsn {
            figment = figment.merge(("database.dsn", dsn));
        }
        if let Some(format) = cli.log_format {
            figment = figment.merge(("logging.format", format));
        }

        let config: Self = figment
            .extract()
            .context("failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.dsn.trim().is_empty() {
            anyhow::bail!("database.dsn must not be empty");
        }
        if self.curriculum.default_page_size > self.curriculum.max_page_size {
            anyhow::bail!(
                "curriculum.default_page_size ({}) exceeds curriculum.max_page_size ({})",
                self.curriculum.default_page_size,
                self.curriculum.max_page_size
            );
        }
        Ok(())
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to render configuration")
    }
}
