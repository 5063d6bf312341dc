use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingestion::store as job_store;
use crate::matching::{JobScore, DEFAULT_TOP_N};
use crate::resume::store as resume_store;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_id: Uuid,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Recompute even when cached scores exist.
    #[serde(default)]
    pub refresh: bool,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub resume_id: Uuid,
    pub backend: &'static str,
    pub cached: bool,
    pub total_jobs_scored: usize,
    pub matches: Vec<JobScore>,
}

/// POST /api/v1/match
///
/// Ranks all stored postings against a stored resume. The full sorted score
/// list is cached per resume; `top_n` only trims the response.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    if req.top_n == 0 {
        return Err(AppError::Validation("top_n must be at least 1".into()));
    }

    if !req.refresh {
        if let Some(scores) = state.cache.get(req.resume_id).await? {
            let total = scores.len();
            return Ok(Json(MatchResponse {
                resume_id: req.resume_id,
                backend: state.matcher.backend(),
                cached: true,
                total_jobs_scored: total,
                matches: scores.into_iter().take(req.top_n).collect(),
            }));
        }
    }

    let resume = resume_store::get_resume(&state.db, req.resume_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", req.resume_id)))?;

    let jobs = job_store::list_jobs(&state.db)
        .await
        .map_err(AppError::Internal)?;
    let job_texts: Vec<(Uuid, String)> = jobs
        .iter()
        .map(|job| (job.id, job.match_text()))
        .collect();

    let scores = state.matcher.rank(&resume.raw_text, &job_texts).await?;
    state.cache.put(req.resume_id, &scores).await?;

    info!(
        "Matched resume {} against {} postings ({} backend)",
        req.resume_id,
        scores.len(),
        state.matcher.backend()
    );

    let total = scores.len();
    Ok(Json(MatchResponse {
        resume_id: req.resume_id,
        backend: state.matcher.backend(),
        cached: false,
        total_jobs_scored: total,
        matches: scores.into_iter().take(req.top_n).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_request_defaults() {
        let id = Uuid::new_v4();
        let req: MatchRequest =
            serde_json::from_str(&format!(r#"{{"resume_id": "{id}"}}"#)).unwrap();
        assert_eq!(req.top_n, DEFAULT_TOP_N);
        assert!(!req.refresh);
    }

    #[test]
    fn test_match_request_explicit_fields() {
        let id = Uuid::new_v4();
        let req: MatchRequest = serde_json::from_str(&format!(
            r#"{{"resume_id": "{id}", "top_n": 10, "refresh": true}}"#
        ))
        .unwrap();
        assert_eq!(req.top_n, 10);
        assert!(req.refresh);
    }
}
