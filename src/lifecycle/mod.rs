//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging/metrics → Watch config → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or Shutdown::trigger → stop accepting → drain in-flight requests → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

pub mod shutdown;

pub use shutdown::{shutdown_signal, Shutdown};
