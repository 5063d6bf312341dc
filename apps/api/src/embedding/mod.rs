//! Embedding client — the single point of entry for calls to the NLP
//! sidecar's embedding endpoint.
//!
//! The model name is not free-form: it is one of the three alternatives the
//! sidecar manifest declares, selected at startup.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("embedding count mismatch: sent {sent} texts, got {got} vectors")]
    CountMismatch { sent: usize, got: usize },
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
}

/// HTTP client for the sidecar's `/embeddings` endpoint, with retry on 429
/// and 5xx responses.
#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    base_url: String,
    model: String,
}

impl EmbeddingClient {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
            model,
        }
    }

    /// Embeds a batch of texts, returning one vector per input text in order.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, EmbeddingError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };
        let url = format!("{}/embeddings", self.base_url.trim_end_matches('/'));

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&url).json(&request_body).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Embedding API returned {}: {}", status, body);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: EmbeddingResponse = response.json().await?;
            if parsed.data.len() != texts.len() {
                return Err(EmbeddingError::CountMismatch {
                    sent: texts.len(),
                    got: parsed.data.len(),
                });
            }

            debug!("Embedded {} texts with model {}", texts.len(), self.model);
            return Ok(parsed.data.into_iter().map(|d| d.embedding).collect());
        }

        Err(last_error.unwrap_or(EmbeddingError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_response_deserializes() {
        let json = r#"{"data": [{"embedding": [0.1, 0.2]}, {"embedding": [0.3, 0.4]}]}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2]);
    }

    #[test]
    fn test_request_serializes_model_and_input() {
        let input = vec!["hello".to_string()];
        let req = EmbeddingRequest {
            model: "en_core_web_md",
            input: &input,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "en_core_web_md");
        assert_eq!(json["input"][0], "hello");
    }
}
