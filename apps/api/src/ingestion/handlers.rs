use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::filtering::{apply_filters, JobFilters};
use crate::ingestion::adzuna::{normalize_adzuna_job, AdzunaFetcher};
use crate::ingestion::jooble::{normalize_jooble_job, JoobleFetcher};
use crate::ingestion::store;
use crate::models::job::{JobPosting, JobRow};
use crate::processing::dedupe;
use crate::state::AppState;

const MAX_PAGES: u32 = 20;
const MAX_RESULTS_PER_PAGE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardSelect {
    Adzuna,
    Jooble,
    #[default]
    All,
}

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    #[serde(default)]
    pub source: BoardSelect,
    pub what: Option<String>,
    #[serde(rename = "where")]
    pub location: Option<String>,
    #[serde(default = "default_pages")]
    pub pages: u32,
    #[serde(default = "default_results_per_page")]
    pub results_per_page: u32,
}

fn default_pages() -> u32 {
    1
}

fn default_results_per_page() -> u32 {
    10
}

#[derive(Debug, Serialize)]
pub struct SourceCount {
    pub source: &'static str,
    pub fetched: usize,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub fetched: usize,
    pub inserted: u64,
    pub duplicates_skipped: u64,
    pub per_source: Vec<SourceCount>,
}

/// POST /api/v1/jobs/ingest
///
/// Fetches postings from the selected board(s), normalizes them to the
/// common schema, categorizes, and persists them.
pub async fn handle_ingest(
    State(state): State<AppState>,
    Json(req): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, AppError> {
    if req.pages == 0 || req.pages > MAX_PAGES {
        return Err(AppError::Validation(format!(
            "pages must be between 1 and {MAX_PAGES}"
        )));
    }
    if req.results_per_page == 0 || req.results_per_page > MAX_RESULTS_PER_PAGE {
        return Err(AppError::Validation(format!(
            "results_per_page must be between 1 and {MAX_RESULTS_PER_PAGE}"
        )));
    }

    let mut postings: Vec<JobPosting> = Vec::new();
    let mut per_source = Vec::new();

    if matches!(req.source, BoardSelect::Adzuna | BoardSelect::All) {
        let fetcher = AdzunaFetcher::new(
            state.config.adzuna_app_id.clone(),
            state.config.adzuna_app_key.clone(),
            "us",
        );
        let raw = fetcher
            .fetch_jobs(
                req.pages,
                req.results_per_page,
                req.what.as_deref(),
                req.location.as_deref(),
            )
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        per_source.push(SourceCount {
            source: "adzuna",
            fetched: raw.len(),
        });
        postings.extend(raw.iter().map(normalize_adzuna_job));
    }

    if matches!(req.source, BoardSelect::Jooble | BoardSelect::All) {
        let fetcher = JoobleFetcher::new(state.config.jooble_api_key.clone());
        let raw = fetcher
            .fetch_jobs(
                req.pages,
                req.results_per_page,
                req.what.as_deref(),
                req.location.as_deref(),
            )
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        per_source.push(SourceCount {
            source: "jooble",
            fetched: raw.len(),
        });
        postings.extend(raw.iter().map(normalize_jooble_job));
    }

    let outcome = store::insert_postings(&state.db, &postings)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(IngestResponse {
        fetched: postings.len(),
        inserted: outcome.inserted,
        duplicates_skipped: outcome.duplicates_skipped,
        per_source,
    }))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(filters): Query<JobFilters>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let jobs = store::list_jobs(&state.db)
        .await
        .map_err(AppError::Internal)?;
    if filters.is_empty() {
        return Ok(Json(jobs));
    }
    Ok(Json(apply_filters(jobs, &filters)))
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub read: usize,
    pub unique: usize,
    pub duplicates_removed: usize,
    pub inserted: u64,
    pub already_stored: u64,
}

/// POST /api/v1/jobs/import
///
/// Accepts CSV text of postings, cleans and deduplicates it, then persists
/// the surviving rows.
pub async fn handle_import_csv(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>, AppError> {
    let mut records = dedupe::read_records(&body)
        .map_err(|e| AppError::Validation(format!("Invalid CSV: {e}")))?;
    dedupe::clean_records(&mut records);
    let (unique, summary) = dedupe::remove_duplicates(records);

    let postings: Vec<JobPosting> = unique
        .into_iter()
        .map(dedupe::CsvJobRecord::into_posting)
        .collect();
    let outcome = store::insert_postings(&state.db, &postings)
        .await
        .map_err(AppError::Internal)?;

    info!(
        "CSV import: {} read, {} unique, {} inserted",
        summary.read, summary.unique, outcome.inserted
    );

    Ok(Json(ImportResponse {
        read: summary.read,
        unique: summary.unique,
        duplicates_removed: summary.duplicates_removed,
        inserted: outcome.inserted,
        already_stored: outcome.duplicates_skipped,
    }))
}

/// GET /api/v1/jobs/export
///
/// Streams all stored postings as CSV with every field quoted.
pub async fn handle_export_csv(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let jobs = store::list_jobs(&state.db)
        .await
        .map_err(AppError::Internal)?;

    let records: Vec<dedupe::CsvJobRecord> = jobs
        .into_iter()
        .map(|job| dedupe::CsvJobRecord {
            title: job.title.unwrap_or_default(),
            company: job.company.unwrap_or_default(),
            location: job.location.unwrap_or_default(),
            description: job.description.unwrap_or_default(),
            url: job.url.unwrap_or_default(),
            source: job.source,
        })
        .collect();

    let csv_text = dedupe::write_records(&records).map_err(AppError::Internal)?;
    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        csv_text,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_request_defaults() {
        let req: IngestRequest = serde_json::from_str(r#"{"what": "data engineer"}"#).unwrap();
        assert_eq!(req.source, BoardSelect::All);
        assert_eq!(req.pages, 1);
        assert_eq!(req.results_per_page, 10);
        assert!(req.location.is_none());
    }

    #[test]
    fn test_ingest_request_where_field_maps_to_location() {
        let req: IngestRequest =
            serde_json::from_str(r#"{"source": "adzuna", "where": "New York"}"#).unwrap();
        assert_eq!(req.source, BoardSelect::Adzuna);
        assert_eq!(req.location.as_deref(), Some("New York"));
    }
}
