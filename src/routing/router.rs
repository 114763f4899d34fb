//! Route resolution.
//!
//! # Responsibilities
//! - Resolve any navigation path to exactly one page
//! - Follow the wildcard redirect and report it
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - Total: the table's invariants guarantee one redirect hop at most
//! - Resolution is a pure function of the path

use serde::Serialize;

use crate::observability::metrics;
use crate::routing::table::{Page, RouteAction, RouteTable};

/// Outcome of resolving a navigation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Path as requested.
    pub requested: String,
    /// Path after following any redirect.
    pub path: String,
    /// Page rendered at `path`.
    pub page: Page,
    /// True when the wildcard redirect was taken.
    pub redirected: bool,
    /// True when the redirect replaces the history entry.
    pub replace: bool,
}

/// Resolves paths against a validated route table.
#[derive(Debug, Clone)]
pub struct Router {
    table: RouteTable,
}

impl Router {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Resolve `path` to the page that ends up rendered.
    pub fn resolve(&self, path: &str) -> Resolution {
        let entry = self.table.match_path(path);

        let resolution = match &entry.action {
            RouteAction::Render { page } => Resolution {
                requested: path.to_string(),
                path: path.to_string(),
                page: *page,
                redirected: false,
                replace: false,
            },
            RouteAction::Redirect { to, replace } => {
                tracing::debug!(from = %path, to = %to, "Redirecting unmatched path");
                let page = self
                    .table
                    .page_at(to)
                    .unwrap_or_else(|| self.table.index_page());
                Resolution {
                    requested: path.to_string(),
                    path: to.clone(),
                    page,
                    redirected: true,
                    replace: *replace,
                }
            }
        };

        metrics::record_resolution(resolution.redirected);
        resolution
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RouteTable::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_index() {
        let router = Router::default();
        let res = router.resolve("/");
        assert_eq!(res.page, Page::Dashboard);
        assert_eq!(res.path, "/");
        assert!(!res.redirected);
    }

    #[test]
    fn test_resolve_data_exploration() {
        let router = Router::default();
        let res = router.resolve("/data-exploration");
        assert_eq!(res.page, Page::DataExploration);
        assert_eq!(res.path, "/data-exploration");
        assert!(!res.redirected);
    }

    #[test]
    fn test_resolve_unmatched_redirects_home() {
        let router = Router::default();
        for path in ["/nope", "", "data-exploration", "/data-exploration/", "/?q=1", "//", "/\u{0}", "*"] {
            let res = router.resolve(path);
            assert_eq!(res.path, "/", "path {path:?}");
            assert_eq!(res.page, Page::Dashboard, "path {path:?}");
            assert!(res.redirected);
            assert!(res.replace);
            assert_eq!(res.requested, path);
        }
    }

    #[test]
    fn test_resolve_index_is_idempotent() {
        let router = Router::default();
        let first = router.resolve("/bogus");
        let again = router.resolve(&first.path);
        assert_eq!(again.path, first.path);
        assert_eq!(again.page, first.page);
        assert!(!again.redirected);
    }
}
