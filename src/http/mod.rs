//! HTTP surface of the console.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID header)
//!     → /api/*      → api.rs (JSON handlers over the data store and QC engine)
//!     → /theme.css  → pages.rs (palette stylesheet)
//!     → anything else → pages.rs (page router: render or redirect)
//!     → error.rs (failures as {"detail": ...})
//! ```

pub mod api;
pub mod error;
pub mod pages;
pub mod request;
pub mod server;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
