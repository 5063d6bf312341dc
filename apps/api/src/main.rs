mod config;
mod db;
mod embedding;
mod errors;
mod filtering;
mod ingestion;
mod manifest;
mod matching;
mod models;
mod processing;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::embedding::EmbeddingClient;
use crate::manifest::{Manifest, EMBEDDED_MANIFEST};
use crate::matching::cache::ScoreCache;
use crate::matching::{EmbeddingMatcher, JobMatcher, TfidfMatcher};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume-search API v{}", env!("CARGO_PKG_VERSION"));

    // Validate the sidecar manifest and pick the language model resource
    let manifest =
        Manifest::parse(EMBEDDED_MANIFEST).context("Invalid embedded sidecar manifest")?;
    let model = manifest
        .select_model(config.nlp_model_size)?
        .to_string();
    info!(
        "Sidecar manifest OK: {} dependencies, model {}",
        manifest.dependencies.len(),
        model
    );

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis-backed score cache
    let redis = redis::Client::open(config.redis_url.clone())?;
    let cache = ScoreCache::new(redis, config.match_cache_ttl_secs);
    info!(
        "Redis score cache initialized (ttl {}s)",
        config.match_cache_ttl_secs
    );

    // Initialize S3 / MinIO for raw resume storage
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize matching backend (TfidfMatcher by default — swap via
    // ENABLE_EMBEDDING_MATCHING)
    let matcher: Arc<dyn JobMatcher> = if config.enable_embedding_matching {
        let base_url = config
            .embedding_api_url
            .clone()
            .context("EMBEDDING_API_URL is required when ENABLE_EMBEDDING_MATCHING is set")?;
        Arc::new(EmbeddingMatcher::new(EmbeddingClient::new(base_url, model)))
    } else {
        Arc::new(TfidfMatcher::default())
    };
    info!("Matching backend: {}", matcher.backend());

    // Build app state
    let state = AppState {
        db,
        cache,
        s3,
        config: config.clone(),
        matcher,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "resume-search-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
