//! Dataset subsystem.
//!
//! # Data Flow
//! ```text
//! Upload bytes (CSV / JSON)
//!     → dataset.rs (parse, normalize columns, type cells)
//!     → store.rs (QC run, atomic swap of the current snapshot)
//!
//! Reads (per request, from one snapshot):
//!     → summary.rs (counts, status/enrollment/visit distributions)
//!     → explore.rs (record pages, column stats, variable stats, filters)
//! ```

pub mod dataset;
pub mod explore;
pub mod store;
pub mod summary;

pub use dataset::{Cell, DataError, Dataset};
pub use store::{DataStore, Snapshot};
pub use summary::{summarize, CountEntry, DatasetSummary};
