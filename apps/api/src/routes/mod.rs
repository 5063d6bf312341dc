pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ingestion::handlers as job_handlers;
use crate::matching::handlers as match_handlers;
use crate::resume::handlers as resume_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job ingestion & listing
        .route("/api/v1/jobs/ingest", post(job_handlers::handle_ingest))
        .route("/api/v1/jobs", get(job_handlers::handle_list_jobs))
        .route("/api/v1/jobs/import", post(job_handlers::handle_import_csv))
        .route("/api/v1/jobs/export", get(job_handlers::handle_export_csv))
        // Resume upload & retrieval
        .route("/api/v1/resumes", post(resume_handlers::handle_upload))
        .route(
            "/api/v1/resumes/:id",
            get(resume_handlers::handle_get_resume),
        )
        // Matching
        .route("/api/v1/match", post(match_handlers::handle_match))
        .with_state(state)
}
