//! Route table definition and validation.
//!
//! # Responsibilities
//! - Hold the ordered list of route entries under the layout wrapper
//! - Reject tables that would make resolution partial or cyclic
//! - Find the first entry matching a path
//!
//! # Invariants (checked in `RouteTable::new`)
//! - Exactly one wildcard entry, and it is the last one
//! - Exactly one index entry: pattern `/`, renders a page
//! - Every redirect target is matched by a rendering, non-wildcard entry

use serde::Serialize;
use thiserror::Error;

use crate::routing::matcher::{Matcher, PathPattern};

/// Renderable units addressable by the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Dashboard,
    DataExploration,
}

/// What happens when an entry matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteAction {
    /// Render the page inside the layout.
    Render { page: Page },
    /// Send the navigation somewhere else.
    Redirect {
        to: String,
        /// Replace the current history entry instead of pushing one.
        replace: bool,
    },
}

/// A single row of the route table.
#[derive(Debug, Clone, Serialize)]
pub struct RouteEntry {
    pub pattern: PathPattern,
    pub is_index: bool,
    pub action: RouteAction,
}

impl RouteEntry {
    /// The index entry: renders `page` at `/`.
    pub fn index(page: Page) -> Self {
        Self {
            pattern: PathPattern::parse("/"),
            is_index: true,
            action: RouteAction::Render { page },
        }
    }

    /// A page entry at an exact path.
    pub fn page(path: &str, page: Page) -> Self {
        Self {
            pattern: PathPattern::parse(path),
            is_index: false,
            action: RouteAction::Render { page },
        }
    }

    /// The catch-all entry, redirecting with history replacement.
    pub fn fallback(to: &str) -> Self {
        Self {
            pattern: PathPattern::Wildcard,
            is_index: false,
            action: RouteAction::Redirect {
                to: to.to_string(),
                replace: true,
            },
        }
    }

    /// The page this entry renders, if it renders one.
    pub fn page_rendered(&self) -> Option<Page> {
        match self.action {
            RouteAction::Render { page } => Some(page),
            RouteAction::Redirect { .. } => None,
        }
    }
}

/// Errors detected while building a route table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route table has no wildcard entry")]
    MissingWildcard,

    #[error("route table has {0} wildcard entries, expected exactly one")]
    DuplicateWildcard(usize),

    #[error("wildcard entry must be last, found at position {0}")]
    WildcardNotLast(usize),

    #[error("route table has {0} index entries, expected exactly one")]
    IndexCount(usize),

    #[error("index entry must render a page at \"/\"")]
    InvalidIndex,

    #[error("redirect target {0:?} does not resolve to a page")]
    DanglingRedirect(String),
}

/// Ordered route table, rooted under the layout wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    #[serde(skip)]
    index_page: Page,
}

impl RouteTable {
    /// Validate and freeze a list of entries.
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, RouteTableError> {
        let wildcards: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.pattern.is_wildcard())
            .map(|(i, _)| i)
            .collect();

        match wildcards.as_slice() {
            [] => return Err(RouteTableError::MissingWildcard),
            [pos] if *pos != entries.len() - 1 => {
                return Err(RouteTableError::WildcardNotLast(*pos))
            }
            [_] => {}
            many => return Err(RouteTableError::DuplicateWildcard(many.len())),
        }

        let indexes: Vec<&RouteEntry> = entries.iter().filter(|e| e.is_index).collect();
        if indexes.len() != 1 {
            return Err(RouteTableError::IndexCount(indexes.len()));
        }
        let index = indexes[0];
        let index_page = match (&index.pattern, index.page_rendered()) {
            (PathPattern::Exact(path), Some(page)) if path == "/" => page,
            _ => return Err(RouteTableError::InvalidIndex),
        };

        for entry in &entries {
            if let RouteAction::Redirect { to, .. } = &entry.action {
                let resolves = entries
                    .iter()
                    .any(|e| !e.pattern.is_wildcard() && e.pattern.matches(to) && e.page_rendered().is_some());
                if !resolves {
                    return Err(RouteTableError::DanglingRedirect(to.clone()));
                }
            }
        }

        Ok(Self { entries, index_page })
    }

    /// The console's route table.
    pub fn standard() -> Self {
        Self {
            entries: vec![
                RouteEntry::index(Page::Dashboard),
                RouteEntry::page("/data-exploration", Page::DataExploration),
                RouteEntry::fallback("/"),
            ],
            index_page: Page::Dashboard,
        }
    }

    /// First entry matching `path`. Never fails: the wildcard is last.
    pub fn match_path(&self, path: &str) -> &RouteEntry {
        self.entries
            .iter()
            .find(|e| e.pattern.matches(path))
            .unwrap_or(&self.entries[self.entries.len() - 1])
    }

    /// The page rendered for `path` without following redirects.
    pub fn page_at(&self, path: &str) -> Option<Page> {
        self.match_path(path).page_rendered()
    }

    pub fn index_page(&self) -> Page {
        self.index_page
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// `(path, page)` for every entry that renders, in table order.
    pub fn pages(&self) -> impl Iterator<Item = (&str, Page)> {
        self.entries
            .iter()
            .filter_map(|e| e.page_rendered().map(|page| (e.pattern.as_str(), page)))
    }
}
