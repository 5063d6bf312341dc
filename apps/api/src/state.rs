use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::matching::cache::ScoreCache;
use crate::matching::JobMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Redis-backed cache of match score lists.
    pub cache: ScoreCache,
    pub s3: S3Client,
    pub config: Config,
    /// Pluggable matching backend. Default: TfidfMatcher. Swap via
    /// ENABLE_EMBEDDING_MATCHING env.
    pub matcher: Arc<dyn JobMatcher>,
}
