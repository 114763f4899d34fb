//! Quality-control subsystem.
//!
//! # Data Flow
//! ```text
//! QcConfig.rules (TOML) ─► QcEngine
//! Dataset ─► QcEngine::run ─► Vec<Finding> ─► QcEngine::stats ─► QcStats
//! ```
//!
//! # Design Decisions
//! - Rules are data (check kind + parameters), not code
//! - A rule whose column is absent is skipped, never an error
//! - Findings are recomputed whenever the dataset or the rules change

pub mod engine;
pub mod rules;

pub use engine::{Finding, QcEngine, QcStats};
pub use rules::{default_rules, Check, Rule, Severity};
