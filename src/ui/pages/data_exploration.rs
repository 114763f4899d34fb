//! Data exploration: filters, column statistics and the first rows.

use maud::{html, Markup};

use crate::data::explore::{column_stats, filter_options};
use crate::ui::{PageContext, Renderable};

pub struct DataExploration;

impl Renderable for DataExploration {
    fn title(&self) -> &'static str {
        "Data Exploration"
    }

    fn render(&self, ctx: &PageContext<'_>) -> Markup {
        let Some(snapshot) = ctx.snapshot else {
            return html! {
                h1 { "Data Exploration" }
                article class="border-info" {
                    p { "No dataset loaded. Upload a file to explore its records." }
                }
            };
        };
        let dataset = &snapshot.dataset;
        let options = filter_options(Some(dataset));
        let shown = dataset.len().min(ctx.page_limit);

        html! {
            h1 { "Data Exploration" }
            section id="filters" {
                h2 { "Filters" }
                (option_list("Institutions", &options.institutions))
                (option_list("Visits", &options.visits))
                (option_list("Domains", &options.domains))
            }
            section id="columns" {
                h2 { "Columns" }
                table {
                    thead {
                        tr { th { "Column" } th { "Type" } th { "Missing" } th { "Unique" } th { "Top values" } }
                    }
                    tbody {
                        @for stat in column_stats(dataset) {
                            tr {
                                td { (stat.column) }
                                td { (stat.dtype) }
                                td class=(if stat.missing > 0 { "text-warning" } else { "text-success" }) {
                                    (format!("{} ({:.1}%)", stat.missing, stat.missing_pct))
                                }
                                td { (stat.unique) }
                                td { (stat.top_values) }
                            }
                        }
                    }
                }
            }
            section id="records" {
                h2 { "Records" }
                p { "Showing " (shown) " of " (dataset.len()) }
                table {
                    thead {
                        tr {
                            @for column in dataset.columns() {
                                th { (column) }
                            }
                        }
                    }
                    tbody {
                        @for row in dataset.rows().iter().take(shown) {
                            tr {
                                @for cell in row {
                                    td { (cell.display()) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn option_list(label: &str, values: &[String]) -> Markup {
    html! {
        h3 { (label) }
        ul {
            @for value in values {
                li { (value) }
            }
        }
    }
}
