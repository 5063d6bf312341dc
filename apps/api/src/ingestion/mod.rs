//! Job board ingestion: fetchers for the supported boards plus the
//! normalization into the common posting schema.

pub mod adzuna;
pub mod handlers;
pub mod jooble;
pub mod store;

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Initial backoff after a retryable response; doubles on each retry.
pub(crate) const INITIAL_BACKOFF: Duration = Duration::from_secs(30);
pub(crate) const MAX_RETRIES: u32 = 3;

/// Statuses worth retrying: rate limits and transient server errors. A page
/// that keeps failing is skipped, never fatal to the whole run.
pub(crate) fn retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Extracts a string field from a raw board payload.
pub(crate) fn str_field(job: &Value, key: &str) -> Option<String> {
    job.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Extracts a nested `field.display_name` string (Adzuna's shape for
/// company and location).
pub(crate) fn display_name(job: &Value, key: &str) -> Option<String> {
    job.get(key)
        .and_then(|v| v.get("display_name"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_and_server_errors_are_retryable() {
        assert!(retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(retryable_status(StatusCode::BAD_GATEWAY));
        assert!(retryable_status(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn test_success_and_client_errors_are_not_retryable() {
        assert!(!retryable_status(StatusCode::OK));
        assert!(!retryable_status(StatusCode::UNAUTHORIZED));
        assert!(!retryable_status(StatusCode::NOT_FOUND));
    }
}
