use serde::{Deserialize, Serialize};

/// Configuration for the domain services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 1000,
        }
    }
}

impl ServiceConfig {
    /// Resolve a requested page size against the configured default and ceiling.
    #[must_use]
    pub fn effective_limit(&self, requested: Option<u64>) -> u64 {
        let max = u64::from(self.max_page_size.max(1));
        requested
            .unwrap_or_else(|| u64::from(self.default_page_size))
            .clamp(1, max)
    }
}
