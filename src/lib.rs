//! COPD QC console library.
//!
//! A small web console over one in-memory clinical dataset: a two-page
//! router (dashboard, data exploration) under a shared layout, a JSON API
//! for uploads and exploration, and a rule-based QC engine.

// Navigation
pub mod routing;
pub mod ui;

// Data and checks
pub mod data;
pub mod qc;

// Serving
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::ConsoleConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Navigator, Router, RouteTable};
