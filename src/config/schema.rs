//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the console.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::qc::rules::{default_rules, Rule};
use crate::ui::theme::ThemeConfig;

/// Root configuration for the QC console.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Listener configuration (bind address, body limits, CORS).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Palette and utility-class content globs.
    pub theme: ThemeConfig,

    /// Quality-control rules.
    pub qc: QcConfig,

    /// Dataset exploration settings.
    pub data: DataConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8000").
    pub bind_address: String,

    /// Largest accepted request body (uploads).
    pub max_body_bytes: usize,

    /// Origins allowed to call the API from a browser.
    pub cors_origins: Vec<String>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            max_body_bytes: 64 * 1024 * 1024,
            cors_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// QC rule set.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QcConfig {
    /// Rules evaluated in order against every uploaded dataset.
    pub rules: Vec<Rule>,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

/// Dataset exploration settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// Page size when the client does not ask for one.
    pub default_page_limit: usize,

    /// Upper bound on requested page sizes.
    pub max_page_limit: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            default_page_limit: 50,
            max_page_limit: 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter directive used when RUST_LOG is unset.
    pub log_filter: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "qc_console=debug,tower_http=debug".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}
