//! Rule evaluation over a dataset.

use serde::Serialize;

use crate::data::dataset::{Cell, Dataset, LOCATION_NAME, SUBJ_ID, VISIT_NM};
use crate::data::explore::round_to;
use crate::data::summary::{counts_as_map, value_counts, CountEntry};
use crate::qc::rules::{Check, Rule, Severity};

/// One rule violation on one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    #[serde(rename = "LOCATION_NAME")]
    pub location_name: String,
    #[serde(rename = "SUBJ_ID")]
    pub subj_id: String,
    #[serde(rename = "VISIT_NM")]
    pub visit_nm: String,
    pub rule_id: String,
    pub domain: String,
    pub rule_type: &'static str,
    pub severity: Severity,
    pub variable: String,
    pub current_value: String,
    pub rule_description: String,
}

/// Aggregate view of a finding list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QcStats {
    pub total_errors: usize,
    pub error_rate: f64,
    #[serde(serialize_with = "counts_as_map")]
    pub severity_counts: Vec<CountEntry>,
    #[serde(serialize_with = "counts_as_map")]
    pub domain_counts: Vec<CountEntry>,
}

/// Evaluates an ordered rule set.
#[derive(Debug, Clone)]
pub struct QcEngine {
    rules: Vec<Rule>,
}

impl QcEngine {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Findings for every rule, in rule order then row order.
    pub fn run(&self, dataset: &Dataset) -> Vec<Finding> {
        let mut findings = Vec::new();

        for rule in &self.rules {
            let Some(idx) = dataset.column_index(&rule.variable) else {
                if matches!(rule.check, Check::Missing) {
                    tracing::warn!(rule = %rule.id, variable = %rule.variable, "Column missing, rule skipped");
                } else {
                    tracing::debug!(rule = %rule.id, variable = %rule.variable, "Column missing, rule skipped");
                }
                continue;
            };

            let before = findings.len();
            for (row_idx, row) in dataset.rows().iter().enumerate() {
                let cell = &row[idx];
                if !rule.violated_by(cell) {
                    continue;
                }
                findings.push(Finding {
                    location_name: identity(dataset, row_idx, LOCATION_NAME),
                    subj_id: identity(dataset, row_idx, SUBJ_ID),
                    visit_nm: identity(dataset, row_idx, VISIT_NM),
                    rule_id: rule.id.clone(),
                    domain: rule.domain.clone(),
                    rule_type: rule.rule_type(),
                    severity: rule.severity,
                    variable: rule.variable.clone(),
                    current_value: match cell {
                        Cell::Null => "Missing".to_string(),
                        other => other.display(),
                    },
                    rule_description: rule.description.clone(),
                });
            }
            tracing::debug!(rule = %rule.id, findings = findings.len() - before, "Rule evaluated");
        }

        findings
    }

    /// Totals by severity and domain.
    pub fn stats(findings: &[Finding], record_count: usize) -> QcStats {
        let error_rate = if record_count == 0 {
            0.0
        } else {
            round_to(findings.len() as f64 / record_count as f64, 4)
        };
        QcStats {
            total_errors: findings.len(),
            error_rate,
            severity_counts: value_counts(findings.iter().map(|f| f.severity.to_string())),
            domain_counts: value_counts(findings.iter().map(|f| f.domain.clone())),
        }
    }
}

impl Default for QcEngine {
    fn default() -> Self {
        Self::new(crate::qc::rules::default_rules())
    }
}

fn identity(dataset: &Dataset, row: usize, column: &str) -> String {
    match dataset.cell(row, column) {
        Some(cell) if !cell.is_null() => cell.display(),
        _ => "Unknown".to_string(),
    }
}
