//! Dataset overview: counts and categorical distributions.

use std::collections::{HashMap, HashSet};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::data::dataset::{
    Cell, Dataset, ENROLL_COPDNOTCOPD, LOCATION_NAME, SUBJ_ID, SUBJ_STATUS, VISIT_NM,
};

/// Subject status groups, in report order.
pub const STATUS_GROUPS: [&str; 4] = ["Enrolled", "Study Off", "Death", "Screening Failure"];

/// Enrollment categories keyed by code, in report order.
pub const ENROLL_GROUPS: [(&str, &str); 4] = [
    ("1", "COPD"),
    ("2", "Non-COPD"),
    ("3", "COPD in young age"),
    ("4", "PRISm"),
];

/// A named count, as consumed by chart widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub name: String,
    pub value: u64,
}

impl CountEntry {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Serialize counts as a `{name: value}` object, keeping entry order.
pub fn counts_as_map<S>(entries: &[CountEntry], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for entry in entries {
        map.serialize_entry(&entry.name, &entry.value)?;
    }
    map.end()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distributions {
    #[serde(serialize_with = "counts_as_map")]
    pub subj_status: Vec<CountEntry>,
    #[serde(serialize_with = "counts_as_map")]
    pub enroll_copd: Vec<CountEntry>,
    #[serde(serialize_with = "counts_as_map")]
    pub visit_nm: Vec<CountEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub record_count: usize,
    pub columns: usize,
    pub institutions: usize,
    pub subjects: usize,
    pub distributions: Distributions,
}

/// Count occurrences, most frequent first; ties keep first-seen order.
pub fn value_counts<I>(values: I) -> Vec<CountEntry>
where
    I: IntoIterator<Item = String>,
{
    let mut order: Vec<CountEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for value in values {
        match index.get(&value) {
            Some(&i) => order[i].value += 1,
            None => {
                index.insert(value.clone(), order.len());
                order.push(CountEntry::new(value, 1));
            }
        }
    }
    order.sort_by(|a, b| b.value.cmp(&a.value));
    order
}

/// Number of distinct non-null values in a column.
pub fn distinct_count(dataset: &Dataset, column: &str) -> usize {
    dataset
        .column_index(column)
        .map(|idx| {
            dataset
                .column(idx)
                .filter(|c| !c.is_null())
                .map(Cell::display)
                .collect::<HashSet<_>>()
                .len()
        })
        .unwrap_or(0)
}

/// Map a raw subject status onto its report group.
pub fn status_group(raw: &str) -> &str {
    match raw {
        "Screening" | "Enrolled" => "Enrolled",
        "Drop Out" | "Study Off + Lock" | "Study Off" => "Study Off",
        other => other,
    }
}

/// Enrollment code as an integer string: `1.0`, `"1"` and `1` all give `"1"`.
pub fn enrollment_code(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Null => None,
        other => Some(match other.as_number() {
            Some(n) => format!("{}", n.trunc() as i64),
            None => other.display().trim().to_string(),
        }),
    }
}

pub fn summarize(dataset: &Dataset) -> DatasetSummary {
    DatasetSummary {
        record_count: dataset.len(),
        columns: dataset.columns().len(),
        institutions: distinct_count(dataset, LOCATION_NAME),
        subjects: distinct_count(dataset, SUBJ_ID),
        distributions: Distributions {
            subj_status: subject_status_counts(dataset),
            enroll_copd: enrollment_counts(dataset),
            visit_nm: visit_counts(dataset),
        },
    }
}

/// One status per subject (first row wins), grouped and zero-filled.
fn subject_status_counts(dataset: &Dataset) -> Vec<CountEntry> {
    let (Some(subj_idx), Some(status_idx)) = (
        dataset.column_index(SUBJ_ID),
        dataset.column_index(SUBJ_STATUS),
    ) else {
        return Vec::new();
    };

    let mut seen: HashSet<Option<String>> = HashSet::new();
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for row in dataset.rows() {
        let subject = match &row[subj_idx] {
            Cell::Null => None,
            cell => Some(cell.display()),
        };
        if !seen.insert(subject) {
            continue;
        }
        let status = &row[status_idx];
        if status.is_null() {
            continue;
        }
        let raw = status.display();
        let group = status_group(raw.trim());
        if let Some(target) = STATUS_GROUPS.iter().find(|g| **g == group) {
            *counts.entry(*target).or_default() += 1;
        }
    }

    STATUS_GROUPS
        .iter()
        .map(|g| CountEntry::new(*g, counts.get(g).copied().unwrap_or(0)))
        .collect()
}

fn enrollment_counts(dataset: &Dataset) -> Vec<CountEntry> {
    let Some(idx) = dataset.column_index(ENROLL_COPDNOTCOPD) else {
        return Vec::new();
    };

    let codes: Vec<String> = dataset.column(idx).filter_map(enrollment_code).collect();
    ENROLL_GROUPS
        .iter()
        .map(|(code, label)| {
            let n = codes.iter().filter(|c| c.as_str() == *code).count();
            CountEntry::new(*label, n as u64)
        })
        .collect()
}

fn visit_counts(dataset: &Dataset) -> Vec<CountEntry> {
    let Some(idx) = dataset.column_index(VISIT_NM) else {
        return Vec::new();
    };
    value_counts(
        dataset
            .column(idx)
            .filter(|c| !c.is_null())
            .map(|c| c.display().trim().to_string()),
    )
}
