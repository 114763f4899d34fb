//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation path (string)
//!     → router.rs (resolve)
//!     → table.rs (first matching entry)
//!     → matcher.rs (exact or wildcard)
//!     → Render(page) | Redirect(to) → Resolution
//!
//! Session (navigator.rs):
//!     navigate(path) → resolve → history push/replace → state
//! ```
//!
//! # Design Decisions
//! - Route table is static and validated once, immutable at runtime
//! - First match wins, wildcard last
//! - No unmatched state: unknown paths redirect to `/`

pub mod matcher;
pub mod navigator;
pub mod router;
pub mod table;

pub use matcher::{Matcher, PathPattern};
pub use navigator::{Navigator, RouterState};
pub use router::{Resolution, Router};
pub use table::{Page, RouteAction, RouteEntry, RouteTable, RouteTableError};
