use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Raise `base` by one level per `-v`, saturating at `trace`.
/// Unknown level names fall back to `info`.
pub fn effective_level(base: &str, verbose: u8) -> &'static str {
    let start = LEVELS
        .iter()
        .position(|l| l.eq_ignore_ascii_case(base.trim()))
        .unwrap_or(2);
    let idx = (start + usize::from(verbose)).min(LEVELS.len() - 1);
    LEVELS[idx]
}

fn filter_for(cfg: &LoggingConfig, verbose: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = effective_level(&cfg.level, verbose);
    // sqlx statement logs only show up at trace
    let directives = if level == "trace" {
        level.to_owned()
    } else {
        format!("{level},sqlx=warn")
    };
    EnvFilter::new(directives)
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(cfg: &LoggingConfig, verbose: u8) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_for(cfg, verbose))
        .with_target(true);

    let res = match cfg.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    res.map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))
}
