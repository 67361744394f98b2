//! Analytics configuration

use serde::{Deserialize, Serialize};

/// Pageview analytics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Salt mixed into visitor address hashes
    #[serde(default = "default_salt")]
    pub salt: String,
    /// Number of pageviews retained in memory
    #[serde(default = "default_max_events")]
    pub max_events: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            salt: default_salt(),
            max_events: default_max_events(),
        }
    }
}

fn default_salt() -> String {
    "folio-analytics".to_string()
}

fn default_max_events() -> usize {
    10_000
}
