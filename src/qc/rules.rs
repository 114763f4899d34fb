//! QC rule definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::dataset::Cell;

/// How serious a rule violation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        [Severity::Critical, Severity::High, Severity::Medium, Severity::Low]
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// CSS palette color used when rendering the severity.
    pub fn palette_color(&self) -> &'static str {
        match self {
            Severity::Critical => "error",
            Severity::High => "warning",
            Severity::Medium => "info",
            Severity::Low => "primary",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The condition a rule checks on every cell of its variable.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    /// Value must be present.
    Missing,
    /// Numeric value must lie in `[min, max]`.
    Range { min: f64, max: f64 },
    /// Present value must be one of `values`.
    Allowed { values: Vec<f64> },
}

/// A configured QC rule.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Rule {
    pub id: String,
    pub domain: String,
    pub severity: Severity,
    pub variable: String,
    #[serde(default)]
    pub description: String,
    pub check: Check,
}

impl Rule {
    /// Short type code reported with findings.
    pub fn rule_type(&self) -> &'static str {
        match self.check {
            Check::Missing => "MISS",
            Check::Range { .. } => "RANGE",
            Check::Allowed { .. } => "VALUE",
        }
    }

    /// True when `cell` breaks this rule.
    pub fn violated_by(&self, cell: &Cell) -> bool {
        match &self.check {
            Check::Missing => cell.is_null(),
            Check::Range { min, max } => match cell.as_number() {
                Some(v) => v < *min || v > *max,
                None => false,
            },
            Check::Allowed { values } => {
                if cell.is_null() {
                    return false;
                }
                match cell.as_number() {
                    Some(v) => !values.iter().any(|allowed| *allowed == v),
                    None => true,
                }
            }
        }
    }
}

/// Rules shipped with the console.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "SUBJ-MISS-001".into(),
            domain: "subject".into(),
            severity: Severity::Critical,
            variable: "SUBJ_ID".into(),
            description: "Subject ID must be present".into(),
            check: Check::Missing,
        },
        Rule {
            id: "SUBJ-MISS-002".into(),
            domain: "subject".into(),
            severity: Severity::Critical,
            variable: "LOCATION_NAME".into(),
            description: "Location Name must be present".into(),
            check: Check::Missing,
        },
        Rule {
            id: "AGE-RANGE-001".into(),
            domain: "subject".into(),
            severity: Severity::Medium,
            variable: "AGE".into(),
            description: "Age should be between 40 and 100".into(),
            check: Check::Range {
                min: 40.0,
                max: 100.0,
            },
        },
        Rule {
            id: "ENROLL-VAL-001".into(),
            domain: "function".into(),
            severity: Severity::High,
            variable: "ENROLL_COPDNOTCOPD".into(),
            description: "Enrollment status must be 1, 2, or 3".into(),
            check: Check::Allowed {
                values: vec![1.0, 2.0, 3.0],
            },
        },
    ]
}
