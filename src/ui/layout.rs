//! Layout frame shared by every page.
//!
//! The frame (head, navigation, footer) is the same for all routes; the
//! matched page renders into the `<main>` outlet.

use maud::{html, Markup, DOCTYPE};

use crate::routing::{Page, RouteTable};
use crate::ui::PageContext;

pub const APP_NAME: &str = "COPD QC System";

/// Layout wrapper around the routed pages.
#[derive(Debug, Clone)]
pub struct Layout {
    nav: Vec<(String, Page)>,
}

impl Layout {
    /// Build the frame from the rendering entries of the route table.
    pub fn new(table: &RouteTable) -> Self {
        Self {
            nav: table
                .pages()
                .map(|(path, page)| (path.to_string(), page))
                .collect(),
        }
    }

    /// Full HTML document with `page` rendered in the outlet.
    pub fn render(&self, page: Page, ctx: &PageContext<'_>) -> Markup {
        let component = page.component();

        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (component.title()) " - " (APP_NAME) }
                    link rel="stylesheet" href="/theme.css";
                }
                body {
                    header class="border-primary" {
                        (self.nav(page))
                    }
                    main id="outlet" {
                        (component.render(ctx))
                    }
                    footer {
                        small { (APP_NAME) " - Quality Control Console" }
                    }
                }
            }
        }
    }

    fn nav(&self, active: Page) -> Markup {
        html! {
            nav {
                ul { li { strong { (APP_NAME) } } }
                ul {
                    @for (href, page) in &self.nav {
                        li {
                            @if *page == active {
                                a href=(href) class="text-primary" aria-current="page" {
                                    strong { (page.component().title()) }
                                }
                            } @else {
                                a href=(href) { (page.component().title()) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::ThemeConfig;

    fn render(page: Page) -> String {
        let theme = ThemeConfig::default();
        let ctx = PageContext {
            theme: &theme,
            snapshot: None,
            rules: &[],
            page_limit: 50,
        };
        Layout::new(&RouteTable::standard()).render(page, &ctx).into_string()
    }

    #[test]
    fn test_layout_frames_page() {
        let html = render(Page::Dashboard);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Dashboard - COPD QC System</title>"));
        assert!(html.contains(r#"href="/theme.css""#));
        assert!(html.contains(r#"<main id="outlet">"#));
        assert!(html.contains("<h1>Dashboard</h1>"));
    }

    #[test]
    fn test_nav_marks_active_link() {
        let html = render(Page::DataExploration);
        assert!(html.contains(r#"<a href="/data-exploration" class="text-primary" aria-current="page">"#));
        assert!(html.contains(r#"<li><a href="/">Dashboard</a></li>"#));
        assert!(!html.contains(r#"href="*""#));
    }
}
