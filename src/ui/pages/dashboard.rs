//! Dashboard: dataset overview and QC totals.

use maud::{html, Markup};

use crate::data::summary::{summarize, CountEntry};
use crate::qc::{QcEngine, Severity};
use crate::ui::{PageContext, Renderable};

pub struct Dashboard;

impl Renderable for Dashboard {
    fn title(&self) -> &'static str {
        "Dashboard"
    }

    fn render(&self, ctx: &PageContext<'_>) -> Markup {
        html! {
            h1 { "Dashboard" }
            @match ctx.snapshot {
                None => {
                    article class="border-info" {
                        p {
                            "No dataset loaded. Upload a CSV or JSON file with "
                            code { "POST /api/upload?filename=..." } "."
                        }
                    }
                }
                Some(snapshot) => {
                    @let summary = summarize(&snapshot.dataset);
                    @let stats = QcEngine::stats(&snapshot.findings, snapshot.dataset.len());
                    section id="overview" {
                        hgroup { h2 { "Overview" } p { (snapshot.source) } }
                        table {
                            tr { th { "Records" } td { (summary.record_count) } }
                            tr { th { "Columns" } td { (summary.columns) } }
                            tr { th { "Institutions" } td { (summary.institutions) } }
                            tr { th { "Subjects" } td { (summary.subjects) } }
                            tr {
                                th { "QC errors" }
                                td class=(if stats.total_errors == 0 { "text-success" } else { "text-error" }) {
                                    (stats.total_errors)
                                }
                            }
                            tr { th { "Error rate" } td { (format!("{:.2}%", stats.error_rate * 100.0)) } }
                        }
                    }
                    (count_table("Subject status", &summary.distributions.subj_status))
                    (count_table("Enrollment type", &summary.distributions.enroll_copd))
                    (count_table("Visits", &summary.distributions.visit_nm))
                    (severity_table(&stats.severity_counts))
                    (count_table("Errors by domain", &stats.domain_counts))
                }
            }
            section id="rules" {
                h2 { "QC rules" }
                table {
                    thead {
                        tr { th { "ID" } th { "Type" } th { "Severity" } th { "Variable" } th { "Description" } }
                    }
                    tbody {
                        @for rule in ctx.rules {
                            tr {
                                td { (rule.id) }
                                td { (rule.rule_type()) }
                                td class=(format!("text-{}", rule.severity.palette_color())) { (rule.severity) }
                                td { (rule.variable) }
                                td { (rule.description) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn count_table(title: &str, entries: &[CountEntry]) -> Markup {
    html! {
        @if !entries.is_empty() {
            section {
                h2 { (title) }
                table {
                    @for entry in entries {
                        tr { td { (entry.name) } td { (entry.value) } }
                    }
                }
            }
        }
    }
}

fn severity_table(entries: &[CountEntry]) -> Markup {
    html! {
        @if !entries.is_empty() {
            section {
                h2 { "Errors by severity" }
                table {
                    @for entry in entries {
                        @let color = Severity::from_name(&entry.name)
                            .map(|s| s.palette_color())
                            .unwrap_or("primary");
                        tr {
                            td class=(format!("text-{color}")) { (entry.name) }
                            td { (entry.value) }
                        }
                    }
                }
            }
        }
    }
}
