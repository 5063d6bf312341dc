use anyhow::{Context, Result};

use crate::manifest::ModelSize;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub adzuna_app_id: String,
    pub adzuna_app_key: String,
    pub jooble_api_key: String,
    pub nlp_model_size: ModelSize,
    pub enable_embedding_matching: bool,
    pub embedding_api_url: Option<String>,
    pub match_cache_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let nlp_model_size = match std::env::var("NLP_MODEL_SIZE") {
            Ok(v) => v
                .parse::<ModelSize>()
                .context("NLP_MODEL_SIZE must be small, medium, or large")?,
            Err(_) => ModelSize::Medium,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            // Board credentials fall back to placeholders so the service can
            // boot without them; requests against a board then fail upstream.
            adzuna_app_id: env_or("ADZUNA_APP_ID", "YOUR_ADZUNA_APP_ID"),
            adzuna_app_key: env_or("ADZUNA_APP_KEY", "YOUR_ADZUNA_APP_KEY"),
            jooble_api_key: env_or("JOOBLE_API_KEY", "YOUR_JOOBLE_API_KEY"),
            nlp_model_size,
            enable_embedding_matching: std::env::var("ENABLE_EMBEDDING_MATCHING")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            embedding_api_url: std::env::var("EMBEDDING_API_URL").ok(),
            match_cache_ttl_secs: std::env::var("MATCH_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse::<u64>()
                .context("MATCH_CACHE_TTL_SECS must be a number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
