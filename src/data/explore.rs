//! Dataset exploration: record pages, column and variable statistics.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::data::dataset::{Cell, Dataset, LOCATION_NAME, VISIT_NM};
use crate::data::summary::{value_counts, CountEntry};

/// Filter value meaning "no filter".
pub const ALL: &str = "전체";

/// Domains offered in the exploration filters.
pub const DOMAINS: [&str; 5] = ["대상자관리", "임상정보", "설문", "검사항목", "약물"];

const HISTOGRAM_BINS: usize = 10;
const TOP_CATEGORIES: usize = 20;

/// One page of records.
#[derive(Debug, Clone, Serialize)]
pub struct RecordPage {
    pub data: Vec<Map<String, Value>>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub dtype: &'static str,
    pub missing: usize,
    pub missing_pct: f64,
    pub unique: usize,
    pub top_values: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumericStats {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatDetail {
    Numeric(NumericStats),
    Categorical { unique_count: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatBlock {
    pub n: usize,
    pub missing: usize,
    pub missing_pct: f64,
    #[serde(flatten)]
    pub detail: StatDetail,
}

/// Five-number summary for one institution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstitutionStats {
    pub name: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableStats {
    pub variable: String,
    pub is_numeric: bool,
    pub stats: StatBlock,
    pub distribution: Vec<CountEntry>,
    pub institution_stats: Vec<InstitutionStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub institutions: Vec<String>,
    pub visits: Vec<String>,
    pub domains: Vec<String>,
    pub variables: Vec<String>,
}

/// Round half away from zero to `digits` decimals.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_to(part as f64 / total as f64 * 100.0, 1)
    }
}

/// Linear-interpolated quantile of sorted values.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Sample standard deviation; None below two values.
fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// Equal-width bin edges; the lowest edge is pushed down by 0.1% of the
/// range so the minimum falls inside the first right-closed bin.
pub fn bin_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    let (lo, hi) = if min == max {
        let adj = if min != 0.0 { min.abs() * 0.001 } else { 0.001 };
        (min - adj, max + adj)
    } else {
        (min, max)
    };

    let step = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| lo + step * i as f64).collect();
    edges[bins] = hi;
    if min != max {
        edges[0] -= (max - min) * 0.001;
    }
    edges
}

/// Ten-bin histogram, labelled `"lo - hi"`.
pub fn histogram(values: &[f64]) -> Vec<CountEntry> {
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    let max = values.iter().copied().fold(min, f64::max);

    let edges = bin_edges(min, max, HISTOGRAM_BINS);
    let mut counts = vec![0u64; HISTOGRAM_BINS];
    for v in values {
        if let Some(bin) = edges.windows(2).position(|w| *v > w[0] && *v <= w[1]) {
            counts[bin] += 1;
        }
    }

    edges
        .windows(2)
        .zip(counts)
        .map(|(w, n)| CountEntry::new(format!("{:.1} - {:.1}", w[0], w[1]), n))
        .collect()
}

fn numeric_stats(values: &[f64]) -> NumericStats {
    if values.is_empty() {
        return NumericStats::default();
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let sorted = sorted(values.to_vec());
    NumericStats {
        mean: Some(round_to(mean, 2)),
        std: sample_std(values, mean).map(|s| round_to(s, 2)),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
    }
}

fn record(dataset: &Dataset, row: &[Cell]) -> Map<String, Value> {
    dataset
        .columns()
        .iter()
        .zip(row)
        .map(|(name, cell)| (name.clone(), cell.to_json()))
        .collect()
}

/// A filter resolved against the dataset once, before the row scan.
enum RowFilter {
    /// Numeric equality. `None` when the wanted value is not a number,
    /// which matches no row.
    Number(usize, Option<f64>),
    /// Case-insensitive substring, lowercased needle.
    Text(usize, String),
}

impl RowFilter {
    /// Case-insensitive substring on text columns, numeric equality on
    /// numeric columns. Unknown columns and empty values are dropped.
    fn resolve(dataset: &Dataset, filters: &[(String, String)]) -> Vec<Self> {
        filters
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .filter_map(|(column, value)| {
                let idx = dataset.column_index(column)?;
                Some(if dataset.is_numeric(idx) {
                    RowFilter::Number(idx, value.trim().parse::<f64>().ok())
                } else {
                    RowFilter::Text(idx, value.to_lowercase())
                })
            })
            .collect()
    }

    fn matches(&self, row: &[Cell]) -> bool {
        match self {
            RowFilter::Number(idx, wanted) => {
                wanted.is_some() && row[*idx].as_number() == *wanted
            }
            RowFilter::Text(idx, needle) => {
                let cell = &row[*idx];
                !cell.is_null() && cell.display().to_lowercase().contains(needle.as_str())
            }
        }
    }
}

/// Page through the rows that pass `filters`. Pages are 1-based.
pub fn records(
    dataset: &Dataset,
    page: usize,
    limit: usize,
    filters: &[(String, String)],
) -> RecordPage {
    let page = page.max(1);
    let limit = limit.max(1);
    let filters = RowFilter::resolve(dataset, filters);
    let matching: Vec<&Vec<Cell>> = dataset
        .rows()
        .iter()
        .filter(|row| filters.iter().all(|f| f.matches(row)))
        .collect();

    let data = matching
        .iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .map(|row| record(dataset, row))
        .collect();

    RecordPage {
        data,
        total: matching.len(),
        page,
        limit,
    }
}

pub fn column_stats(dataset: &Dataset) -> Vec<ColumnStats> {
    let total = dataset.len();
    dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let present: Vec<String> = dataset
                .column(idx)
                .filter(|c| !c.is_null())
                .map(Cell::display)
                .collect();
            let missing = total - present.len();
            let unique = present.iter().collect::<HashSet<_>>().len();
            let top = value_counts(present);
            let top_values = if top.is_empty() {
                "-".to_string()
            } else {
                top.iter()
                    .take(3)
                    .map(|e| format!("{} ({})", e.name, e.value))
                    .collect::<Vec<_>>()
                    .join(", ")
            };

            ColumnStats {
                column: column.clone(),
                dtype: if dataset.is_numeric(idx) { "numeric" } else { "text" },
                missing,
                missing_pct: percent(missing, total),
                unique,
                top_values,
            }
        })
        .collect()
}

/// Statistics for one variable over rows matching exact-value filters.
/// Returns None when the variable is not a column.
pub fn variable_stats(
    dataset: &Dataset,
    variable: &str,
    filters: &[(String, String)],
) -> Option<VariableStats> {
    let var_idx = dataset.column_index(variable)?;
    let is_numeric = dataset.is_numeric(var_idx);

    let active: Vec<(usize, &str)> = filters
        .iter()
        .filter(|(_, v)| !v.is_empty() && v != ALL)
        .filter_map(|(c, v)| dataset.column_index(c).map(|idx| (idx, v.as_str())))
        .collect();
    let rows: Vec<&Vec<Cell>> = dataset
        .rows()
        .iter()
        .filter(|row| active.iter().all(|(idx, v)| row[*idx].display() == *v))
        .collect();

    let total = rows.len();
    let present: Vec<&Cell> = rows.iter().map(|r| &r[var_idx]).filter(|c| !c.is_null()).collect();
    let missing = total - present.len();

    let (detail, distribution) = if is_numeric {
        let values: Vec<f64> = present.iter().filter_map(|c| c.as_number()).collect();
        (StatDetail::Numeric(numeric_stats(&values)), histogram(&values))
    } else {
        let labels: Vec<String> = present.iter().map(|c| c.display()).collect();
        let unique_count = labels.iter().collect::<HashSet<_>>().len();
        let mut counts = value_counts(labels);
        counts.truncate(TOP_CATEGORIES);
        (StatDetail::Categorical { unique_count }, counts)
    };

    let mut institution_stats = Vec::new();
    if let (true, Some(loc_idx)) = (is_numeric, dataset.column_index(LOCATION_NAME)) {
        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for row in &rows {
            if row[loc_idx].is_null() {
                continue;
            }
            let entry = groups.entry(row[loc_idx].display()).or_default();
            if let Some(v) = row[var_idx].as_number() {
                entry.push(v);
            }
        }
        for (name, values) in groups {
            if values.is_empty() {
                continue;
            }
            let count = values.len();
            let sorted = sorted(values);
            let q = |p| quantile(&sorted, p).unwrap_or(f64::NAN);
            institution_stats.push(InstitutionStats {
                name,
                min: sorted[0],
                q1: q(0.25),
                median: q(0.5),
                q3: q(0.75),
                max: sorted[count - 1],
                count,
            });
        }
    }

    Some(VariableStats {
        variable: dataset.columns()[var_idx].clone(),
        is_numeric,
        stats: StatBlock {
            n: present.len(),
            missing,
            missing_pct: percent(missing, total),
            detail,
        },
        distribution,
        institution_stats,
    })
}

fn sorted_distinct(dataset: &Dataset, column: &str) -> Vec<String> {
    dataset
        .column_index(column)
        .map(|idx| {
            dataset
                .column(idx)
                .filter(|c| !c.is_null())
                .map(Cell::display)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        })
        .unwrap_or_default()
}

pub fn filter_options(dataset: Option<&Dataset>) -> FilterOptions {
    let Some(dataset) = dataset else {
        return FilterOptions::default();
    };
    let mut variables = dataset.columns().to_vec();
    variables.sort();

    FilterOptions {
        institutions: sorted_distinct(dataset, LOCATION_NAME),
        visits: sorted_distinct(dataset, VISIT_NM),
        domains: DOMAINS.iter().map(|d| d.to_string()).collect(),
        variables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_csv(
            b"SUBJ_ID,LOCATION_NAME,VISIT_NM,AGE,SEX\n\
              S01,Seoul,V1,40,M\n\
              S02,Seoul,V1,50,F\n\
              S03,Busan,V1,60,M\n\
              S04,Busan,V2,,M\n\
              S10,Daegu,V2,80,\n",
        )
        .unwrap()
    }

    fn filters(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(c, v)| (c.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_records_pagination() {
        let ds = sample();
        let page = records(&ds, 2, 2, &[]);
        assert_eq!(page.total, 5);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0]["SUBJ_ID"], "S03");

        let last = records(&ds, 3, 2, &[]);
        assert_eq!(last.data.len(), 1);
        assert!(records(&ds, 9, 2, &[]).data.is_empty());

        let clamped = records(&ds, 0, 0, &[]);
        assert_eq!((clamped.page, clamped.limit), (1, 1));
    }

    #[test]
    fn test_records_keep_column_order_and_blank_nulls() {
        let ds = sample();
        let page = records(&ds, 1, 10, &filters(&[("SUBJ_ID", "s04")]));
        assert_eq!(page.total, 1);
        let keys: Vec<_> = page.data[0].keys().cloned().collect();
        assert_eq!(keys, ["SUBJ_ID", "LOCATION_NAME", "VISIT_NM", "AGE", "SEX"]);
        assert_eq!(page.data[0]["AGE"], "");
    }

    #[test]
    fn test_records_filters() {
        let ds = sample();
        assert_eq!(records(&ds, 1, 10, &filters(&[("SUBJ_ID", "S0")])).total, 4);
        assert_eq!(records(&ds, 1, 10, &filters(&[("AGE", "50")])).total, 1);
        assert_eq!(records(&ds, 1, 10, &filters(&[("AGE", "abc")])).total, 0);
        assert_eq!(records(&ds, 1, 10, &filters(&[("NOPE", "x")])).total, 5);
    }

    #[test]
    fn test_numeric_search_scans_rows_once() {
        let mut csv = String::from("SUBJ_ID,AGE\n");
        for i in 0..40_000 {
            csv.push_str(&format!("{},{}\n", 1000 + i, 40 + i % 50));
        }
        let ds = Dataset::from_csv(csv.as_bytes()).unwrap();

        let started = std::time::Instant::now();
        let page = records(&ds, 1, 50, &filters(&[("SUBJ_ID", "1001")]));
        let elapsed = started.elapsed();

        assert_eq!(page.total, 1);
        assert_eq!(page.data[0]["SUBJ_ID"], 1001.0);
        assert!(elapsed < std::time::Duration::from_secs(1), "search took {elapsed:?}");
    }

    #[test]
    fn test_column_stats() {
        let stats = column_stats(&sample());
        let age = stats.iter().find(|s| s.column == "AGE").unwrap();
        assert_eq!(age.dtype, "numeric");
        assert_eq!(age.missing, 1);
        assert_eq!(age.missing_pct, 20.0);
        assert_eq!(age.unique, 4);

        let sex = stats.iter().find(|s| s.column == "SEX").unwrap();
        assert_eq!(sex.dtype, "text");
        assert_eq!(sex.top_values, "M (3), F (1)");
    }

    #[test]
    fn test_quantiles_interpolate() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.5), Some(2.5));
        assert_eq!(quantile(&values, 0.25), Some(1.75));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_bin_edges() {
        let edges = bin_edges(0.0, 10.0, 10);
        assert_eq!(edges.len(), 11);
        assert!((edges[0] - -0.01).abs() < 1e-12);
        assert_eq!(edges[10], 10.0);

        let flat = bin_edges(5.0, 5.0, 10);
        assert!((flat[0] - 4.995).abs() < 1e-12);
        assert!((flat[10] - 5.005).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [0.0, 1.0, 1.0, 5.5, 10.0];
        let hist = histogram(&values);
        assert_eq!(hist.len(), 10);
        assert_eq!(hist.iter().map(|e| e.value).sum::<u64>(), 5);
        assert_eq!(hist[0].value, 3);
        assert_eq!(hist[9].value, 1);
        assert_eq!(hist[0].name, "-0.0 - 1.0");
    }

    #[test]
    fn test_numeric_variable_stats() {
        let stats = variable_stats(&sample(), "age", &[]).unwrap();
        assert!(stats.is_numeric);
        assert_eq!(stats.stats.n, 4);
        assert_eq!(stats.stats.missing, 1);
        match &stats.stats.detail {
            StatDetail::Numeric(n) => {
                assert_eq!(n.mean, Some(57.5));
                assert_eq!(n.std, Some(17.08));
                assert_eq!(n.min, Some(40.0));
                assert_eq!(n.median, Some(55.0));
                assert_eq!(n.max, Some(80.0));
            }
            other => panic!("unexpected detail {other:?}"),
        }
        let names: Vec<_> = stats.institution_stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Busan", "Daegu", "Seoul"]);
        assert_eq!(stats.institution_stats[2].count, 2);
        assert_eq!(stats.institution_stats[2].median, 45.0);
    }

    #[test]
    fn test_categorical_variable_stats_with_filters() {
        let f = filters(&[("LOCATION_NAME", "Busan"), ("VISIT_NM", ALL)]);
        let stats = variable_stats(&sample(), "SEX", &f).unwrap();
        assert!(!stats.is_numeric);
        assert_eq!(stats.stats.n, 2);
        assert_eq!(stats.stats.detail, StatDetail::Categorical { unique_count: 1 });
        assert_eq!(stats.distribution, vec![CountEntry::new("M", 2)]);
        assert!(stats.institution_stats.is_empty());
    }

    #[test]
    fn test_unknown_variable() {
        assert!(variable_stats(&sample(), "WEIGHT", &[]).is_none());
    }

    #[test]
    fn test_filter_options() {
        let ds = sample();
        let options = filter_options(Some(&ds));
        assert_eq!(options.institutions, ["Busan", "Daegu", "Seoul"]);
        assert_eq!(options.visits, ["V1", "V2"]);
        assert_eq!(options.domains.len(), 5);
        assert_eq!(options.variables, ["AGE", "LOCATION_NAME", "SEX", "SUBJ_ID", "VISIT_NM"]);

        assert_eq!(filter_options(None), FilterOptions::default());
    }
}
