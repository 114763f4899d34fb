//! Navigation session: current location and history.
//!
//! # States
//! - AtIndex: Dashboard rendered at `/`
//! - AtDataExploration: DataExploration rendered at `/data-exploration`
//!
//! # State Transitions
//! ```text
//! any --navigate(known path)--> At<page>
//! any --navigate(unknown)--> [Redirecting] --> AtIndex   (synchronous, history replaced)
//! any --back()/forward()--> state of the history entry under the cursor
//! ```
//!
//! `navigate` is the only way to change the current location. A session
//! is owned by one caller and processes one event at a time.

use std::sync::Arc;

use serde::Serialize;

use crate::routing::router::{Resolution, Router};
use crate::routing::table::Page;

/// Observable router states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouterState {
    AtIndex,
    AtDataExploration,
}

impl From<Page> for RouterState {
    fn from(page: Page) -> Self {
        match page {
            Page::Dashboard => RouterState::AtIndex,
            Page::DataExploration => RouterState::AtDataExploration,
        }
    }
}

/// A single navigation session.
#[derive(Debug, Clone)]
pub struct Navigator {
    router: Arc<Router>,
    history: Vec<String>,
    cursor: usize,
    state: RouterState,
}

impl Navigator {
    /// Start a session at `initial_path`, normalized through resolution.
    pub fn new(router: Arc<Router>, initial_path: &str) -> Self {
        let resolution = router.resolve(initial_path);
        Self {
            state: resolution.page.into(),
            history: vec![resolution.path],
            cursor: 0,
            router,
        }
    }

    /// Navigate to `path`, updating location, history and state.
    pub fn navigate(&mut self, path: &str) -> Resolution {
        let resolution = self.router.resolve(path);

        self.history.truncate(self.cursor + 1);
        if resolution.redirected && !resolution.replace {
            self.history.push(resolution.requested.clone());
        }
        // A replacing redirect overwrites the entry it would have pushed.
        self.history.push(resolution.path.clone());
        self.cursor = self.history.len() - 1;

        self.transition(resolution.page);
        resolution
    }

    /// Step back one history entry. `None` at the start of history.
    pub fn back(&mut self) -> Option<Resolution> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.settle())
    }

    /// Step forward one history entry. `None` at the end of history.
    pub fn forward(&mut self) -> Option<Resolution> {
        if self.cursor + 1 >= self.history.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.settle())
    }

    pub fn current_path(&self) -> &str {
        &self.history[self.cursor]
    }

    pub fn state(&self) -> RouterState {
        self.state
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    fn settle(&mut self) -> Resolution {
        let resolution = self.router.resolve(&self.history[self.cursor]);
        if resolution.redirected {
            self.history[self.cursor] = resolution.path.clone();
        }
        self.transition(resolution.page);
        resolution
    }

    fn transition(&mut self, page: Page) {
        let next = RouterState::from(page);
        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, "Router state changed");
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{PathPattern, RouteAction, RouteEntry, RouteTable};

    fn session(initial: &str) -> Navigator {
        Navigator::new(Arc::new(Router::default()), initial)
    }

    #[test]
    fn test_initial_state_is_normalized() {
        let nav = session("/bogus");
        assert_eq!(nav.current_path(), "/");
        assert_eq!(nav.state(), RouterState::AtIndex);

        let nav = session("/data-exploration");
        assert_eq!(nav.state(), RouterState::AtDataExploration);
    }

    #[test]
    fn test_unmatched_path_lands_on_index() {
        let mut nav = session("/");
        let res = nav.navigate("/nope");
        assert_eq!(res.path, "/");
        assert_eq!(res.page, Page::Dashboard);
        assert_eq!(nav.current_path(), "/");
        assert_eq!(nav.state(), RouterState::AtIndex);
    }

    #[test]
    fn test_sequential_navigation() {
        let mut nav = session("/");
        nav.navigate("/data-exploration");
        assert_eq!(nav.state(), RouterState::AtDataExploration);
        nav.navigate("/bogus");

        assert_eq!(nav.current_path(), "/");
        assert_eq!(nav.state(), RouterState::AtIndex);
        assert_eq!(nav.history(), ["/", "/data-exploration", "/"]);
    }

    #[test]
    fn test_redirect_replaces_history_entry() {
        let mut nav = session("/data-exploration");
        nav.navigate("/nope");

        assert!(!nav.history().iter().any(|p| p == "/nope"));
        let back = nav.back().unwrap();
        assert_eq!(back.path, "/data-exploration");
        assert_eq!(nav.state(), RouterState::AtDataExploration);
    }

    #[test]
    fn test_pushing_redirect_keeps_requested_entry() {
        let table = RouteTable::new(vec![
            RouteEntry::index(Page::Dashboard),
            RouteEntry::page("/data-exploration", Page::DataExploration),
            RouteEntry {
                pattern: PathPattern::Wildcard,
                is_index: false,
                action: RouteAction::Redirect {
                    to: "/".into(),
                    replace: false,
                },
            },
        ])
        .unwrap();
        let mut nav = Navigator::new(Arc::new(Router::new(table)), "/");

        let res = nav.navigate("/bogus");
        assert!(res.redirected);
        assert!(!res.replace);
        assert_eq!(nav.history(), ["/", "/bogus", "/"]);
        assert_eq!(nav.current_path(), "/");
        assert_eq!(nav.state(), RouterState::AtIndex);

        // Stepping back onto the unmatched entry settles it on the index.
        let back = nav.back().unwrap();
        assert_eq!(back.path, "/");
        assert_eq!(nav.history(), ["/", "/", "/"]);
        assert_eq!(nav.state(), RouterState::AtIndex);
    }

    #[test]
    fn test_back_and_forward_bounds() {
        let mut nav = session("/");
        assert!(nav.back().is_none());
        assert!(nav.forward().is_none());

        nav.navigate("/data-exploration");
        assert_eq!(nav.back().unwrap().page, Page::Dashboard);
        assert_eq!(nav.forward().unwrap().page, Page::DataExploration);
        assert!(nav.forward().is_none());
    }

    #[test]
    fn test_navigate_truncates_forward_history() {
        let mut nav = session("/");
        nav.navigate("/data-exploration");
        nav.back();
        nav.navigate("/");

        assert_eq!(nav.history(), ["/", "/"]);
        assert!(nav.forward().is_none());
    }
}
