//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, page limits ordered)
//! - Check palette colors and content globs
//! - Check QC rules (unique ids, sane ranges)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ConsoleConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ConsoleConfig;
use crate::qc::rules::Check;
use crate::ui::theme::is_hex_color;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("listener.max_body_bytes must be greater than zero")]
    BodyLimit,

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("theme.palette.{name} {value:?} is not a hex color")]
    PaletteColor { name: &'static str, value: String },

    #[error("theme.content must list at least one glob")]
    NoContentGlobs,

    #[error("theme.content glob {glob:?} is invalid: {reason}")]
    ContentGlob { glob: String, reason: String },

    #[error("qc rule id {0:?} is used more than once")]
    DuplicateRule(String),

    #[error("qc rule {0:?} has an empty variable")]
    EmptyVariable(String),

    #[error("qc rule {0:?} range bounds must be finite numbers")]
    NonFiniteRange(String),

    #[error("qc rule {id:?} range min {min} exceeds max {max}")]
    InvertedRange { id: String, min: f64, max: f64 },

    #[error("qc rule {0:?} allows no values")]
    EmptyAllowedValues(String),

    #[error("data page limits must satisfy 0 < default_page_limit <= max_page_limit")]
    PageLimits,

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ConsoleConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::BodyLimit);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    for (name, value) in config.theme.palette.colors() {
        if !is_hex_color(value) {
            errors.push(ValidationError::PaletteColor {
                name,
                value: value.to_string(),
            });
        }
    }
    if config.theme.content.is_empty() {
        errors.push(ValidationError::NoContentGlobs);
    }
    for glob in &config.theme.content {
        if let Err(e) = glob::Pattern::new(glob) {
            errors.push(ValidationError::ContentGlob {
                glob: glob.clone(),
                reason: e.msg.to_string(),
            });
        }
    }

    let mut seen = HashSet::new();
    for rule in &config.qc.rules {
        if !seen.insert(rule.id.as_str()) {
            errors.push(ValidationError::DuplicateRule(rule.id.clone()));
        }
        if rule.variable.trim().is_empty() {
            errors.push(ValidationError::EmptyVariable(rule.id.clone()));
        }
        match &rule.check {
            Check::Range { min, max } if !min.is_finite() || !max.is_finite() => {
                errors.push(ValidationError::NonFiniteRange(rule.id.clone()));
            }
            Check::Range { min, max } if min > max => {
                errors.push(ValidationError::InvertedRange {
                    id: rule.id.clone(),
                    min: *min,
                    max: *max,
                });
            }
            Check::Allowed { values } if values.is_empty() => {
                errors.push(ValidationError::EmptyAllowedValues(rule.id.clone()));
            }
            _ => {}
        }
    }

    if config.data.default_page_limit == 0
        || config.data.default_page_limit > config.data.max_page_limit
    {
        errors.push(ValidationError::PageLimits);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
