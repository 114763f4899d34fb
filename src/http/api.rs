//! JSON API handlers mounted under `/api`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::data::explore::{
    column_stats, filter_options, records, variable_stats, ColumnStats, FilterOptions,
    RecordPage, VariableStats, ALL,
};
use crate::data::dataset::{DataError, LOCATION_NAME, SUBJ_ID, VISIT_NM};
use crate::data::{summarize, Dataset, DatasetSummary, Snapshot};
use crate::http::error::ApiError;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::qc::{Finding, QcEngine, QcStats, Rule, Severity};
use crate::routing::{Resolution, RouteTable};
use crate::ui::theme::ThemeConfig;

const NO_DATASET: &str = "No dataset loaded";

/// Dataset summary merged with the QC totals.
#[derive(Debug, Serialize)]
pub struct UploadSummary {
    #[serde(flatten)]
    pub dataset: DatasetSummary,
    #[serde(flatten)]
    pub qc: QcStats,
}

impl UploadSummary {
    fn of(snapshot: &Snapshot) -> Self {
        Self {
            dataset: summarize(&snapshot.dataset),
            qc: QcEngine::stats(&snapshot.findings, snapshot.dataset.len()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub status: &'static str,
    pub summary: UploadSummary,
}

#[derive(Debug, Serialize)]
pub struct RuleView {
    #[serde(flatten)]
    pub rule: Rule,
    pub rule_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct DataParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VariableParams {
    pub variable: String,
    pub institution: Option<String>,
    pub visit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FindingsParams {
    pub severity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    #[serde(default)]
    pub path: String,
}

pub async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to COPD QC System API" }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".into())
}

/// Parse the uploaded file, run QC and make it the current dataset.
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<UploadResponse>, ApiError> {
    let request_id = request_id(&headers).to_string();
    tracing::info!(
        request_id = %request_id,
        filename = %params.filename,
        bytes = body.len(),
        "Upload received"
    );

    let inner = state.inner.load_full();
    let shared = state.inner.clone();
    let store = state.store.clone();
    let filename = params.filename.clone();

    // Parsing and QC are CPU bound.
    let result = tokio::task::spawn_blocking(move || -> Result<Arc<Snapshot>, DataError> {
        let dataset = Dataset::from_upload(&filename, &body)?;
        let snapshot = store.replace(&filename, dataset, &inner.engine);

        // Rules reloaded while this upload was being checked.
        let latest = shared.load_full();
        if !Arc::ptr_eq(&latest, &inner) && latest.config.qc.rules != inner.config.qc.rules {
            if let Some(rechecked) = store.recheck(&latest.engine) {
                return Ok(rechecked);
            }
        }
        Ok(snapshot)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Upload task failed: {e}")))?;

    let snapshot = match result {
        Ok(snapshot) => {
            metrics::record_upload(true);
            snapshot
        }
        Err(e) => {
            metrics::record_upload(false);
            tracing::warn!(request_id = %request_id, error = %e, "Upload rejected");
            return Err(e.into());
        }
    };

    Ok(Json(UploadResponse {
        filename: params.filename,
        status: "success",
        summary: UploadSummary::of(&snapshot),
    }))
}

pub async fn summary(State(state): State<AppState>) -> Result<Json<UploadSummary>, ApiError> {
    let snapshot = state
        .store
        .current()
        .ok_or_else(|| ApiError::NotFound(NO_DATASET.into()))?;
    Ok(Json(UploadSummary::of(&snapshot)))
}

pub async fn data(
    State(state): State<AppState>,
    Query(params): Query<DataParams>,
) -> Json<RecordPage> {
    let inner = state.inner.load();
    let limits = &inner.config.data;
    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(limits.default_page_limit)
        .clamp(1, limits.max_page_limit);

    let filters: Vec<(String, String)> = params
        .search
        .map(|s| vec![(SUBJ_ID.to_string(), s)])
        .unwrap_or_default();

    let result = match state.store.current() {
        Some(snapshot) => records(&snapshot.dataset, page, limit, &filters),
        None => RecordPage {
            data: Vec::new(),
            total: 0,
            page,
            limit,
        },
    };
    Json(result)
}

pub async fn filters(State(state): State<AppState>) -> Json<FilterOptions> {
    let snapshot = state.store.current();
    Json(filter_options(snapshot.as_deref().map(|s| &s.dataset)))
}

pub async fn columns(State(state): State<AppState>) -> Json<Vec<ColumnStats>> {
    let stats = state
        .store
        .current()
        .map(|s| column_stats(&s.dataset))
        .unwrap_or_default();
    Json(stats)
}

pub async fn variable(
    State(state): State<AppState>,
    Query(params): Query<VariableParams>,
) -> Result<Json<VariableStats>, ApiError> {
    let snapshot = state
        .store
        .current()
        .ok_or_else(|| ApiError::NotFound(NO_DATASET.into()))?;

    let mut filters = Vec::new();
    if let Some(institution) = params.institution {
        filters.push((LOCATION_NAME.to_string(), institution));
    }
    if let Some(visit) = params.visit {
        filters.push((VISIT_NM.to_string(), visit));
    }

    variable_stats(&snapshot.dataset, &params.variable, &filters)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Variable {} not found", params.variable)))
}

pub async fn rules(State(state): State<AppState>) -> Json<Vec<RuleView>> {
    let views = state
        .inner
        .load()
        .engine
        .rules()
        .iter()
        .map(|rule| RuleView {
            rule: rule.clone(),
            rule_type: rule.rule_type(),
        })
        .collect();
    Json(views)
}

pub async fn findings(
    State(state): State<AppState>,
    Query(params): Query<FindingsParams>,
) -> Result<Json<Vec<Finding>>, ApiError> {
    let severity = match params.severity.as_deref().map(str::trim) {
        None | Some("") | Some(ALL) => None,
        Some(name) => Some(
            Severity::from_name(name)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown severity: {name}")))?,
        ),
    };

    let findings = state
        .store
        .current()
        .map(|snapshot| {
            snapshot
                .findings
                .iter()
                .filter(|f| severity.map_or(true, |s| f.severity == s))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Ok(Json(findings))
}

pub async fn routes(State(state): State<AppState>) -> Json<RouteTable> {
    Json(state.router.table().clone())
}

pub async fn resolve(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Json<Resolution> {
    Json(state.router.resolve(&params.path))
}

pub async fn theme(State(state): State<AppState>) -> Json<ThemeConfig> {
    Json(state.inner.load().config.theme.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;
    use crate::qc::default_rules;

    #[test]
    fn test_upload_summary_flattens_qc_totals() {
        let store = crate::data::DataStore::new();
        let ds = Dataset::from_csv(b"SUBJ_ID,LOCATION_NAME,AGE\nS1,Seoul,30\nS2,Busan,50\n").unwrap();
        let snapshot = store.replace("a.csv", ds, &QcEngine::default());

        let value = serde_json::to_value(UploadSummary::of(&snapshot)).unwrap();
        assert_eq!(value["record_count"], 2);
        assert_eq!(value["institutions"], 2);
        assert_eq!(value["total_errors"], 1);
        assert_eq!(value["error_rate"], 0.5);
        assert!(value["distributions"].is_object());
    }

    #[test]
    fn test_rule_view_carries_type() {
        let rules = default_rules();
        let view = RuleView {
            rule: rules[2].clone(),
            rule_type: rules[2].rule_type(),
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["id"], "AGE-RANGE-001");
        assert_eq!(value["rule_type"], "RANGE");
        assert_eq!(value["check"]["kind"], "range");
    }
}
