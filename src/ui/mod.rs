//! Server-rendered console UI.
//!
//! Every page is a `Renderable` drawn into the shared `Layout` frame.
//! Styling comes from the palette in `theme`, exposed as CSS custom
//! properties and `text-*` / `bg-*` / `border-*` utility classes.

pub mod layout;
pub mod pages;
pub mod theme;

use maud::Markup;

use crate::data::Snapshot;
use crate::qc::Rule;
use crate::routing::Page;
use crate::ui::theme::ThemeConfig;

pub use layout::Layout;
pub use pages::{Dashboard, DataExploration};

/// Inputs a page may read. Nothing here depends on the current path.
pub struct PageContext<'a> {
    pub theme: &'a ThemeConfig,
    pub snapshot: Option<&'a Snapshot>,
    pub rules: &'a [Rule],
    pub page_limit: usize,
}

/// A page that renders into the layout outlet.
pub trait Renderable: Send + Sync {
    fn title(&self) -> &'static str;

    /// Fragment placed inside `<main>`.
    fn render(&self, ctx: &PageContext<'_>) -> Markup;
}

impl Page {
    pub fn component(&self) -> &'static dyn Renderable {
        match self {
            Page::Dashboard => &Dashboard,
            Page::DataExploration => &DataExploration,
        }
    }
}
