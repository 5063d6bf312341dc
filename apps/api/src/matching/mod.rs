//! Cosine-similarity matching of a resume against stored job postings.
//!
//! Backends are pluggable behind `JobMatcher`: `TfidfMatcher` is the default
//! (deterministic, no external calls); `EmbeddingMatcher` delegates
//! vectorization to the NLP sidecar. `AppState` holds an
//! `Arc<dyn JobMatcher>`, swapped at startup via config.

pub mod cache;
pub mod handlers;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::embedding::EmbeddingClient;
use crate::errors::AppError;
use crate::processing::clean::clean_text;
use crate::processing::tfidf::TfidfVectorizer;

pub const DEFAULT_TOP_N: usize = 5;

/// One scored posting in a match result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobScore {
    pub job_id: Uuid,
    pub score: f64,
}

/// Cosine similarity between two vectors; 0.0 when either has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let norm_a = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (norm_a * norm_b)
}

/// Scores a resume vector against job vectors, sorted by descending score.
pub fn rank_jobs(resume_vector: &[f64], job_vectors: &[(Uuid, Vec<f64>)]) -> Vec<JobScore> {
    let mut scores: Vec<JobScore> = job_vectors
        .iter()
        .map(|(job_id, vector)| JobScore {
            job_id: *job_id,
            score: cosine_similarity(resume_vector, vector),
        })
        .collect();
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores
}

/// The matching backend. Implement this to swap vectorization strategies
/// without touching the endpoint or handler code.
#[async_trait]
pub trait JobMatcher: Send + Sync {
    /// Scores every `(job_id, text)` pair against the resume text and
    /// returns the full list, sorted by descending similarity.
    async fn rank(
        &self,
        resume_text: &str,
        jobs: &[(Uuid, String)],
    ) -> Result<Vec<JobScore>, AppError>;

    /// Label reported to callers for transparency.
    fn backend(&self) -> &'static str;
}

/// Default backend: TF-IDF fitted on the resume plus the job corpus.
pub struct TfidfMatcher {
    lemmatize: bool,
}

impl Default for TfidfMatcher {
    fn default() -> Self {
        Self { lemmatize: true }
    }
}

#[async_trait]
impl JobMatcher for TfidfMatcher {
    async fn rank(
        &self,
        resume_text: &str,
        jobs: &[(Uuid, String)],
    ) -> Result<Vec<JobScore>, AppError> {
        let mut corpus = Vec::with_capacity(jobs.len() + 1);
        corpus.push(clean_text(resume_text, self.lemmatize));
        for (_, text) in jobs {
            corpus.push(clean_text(text, self.lemmatize));
        }

        let vectorizer = TfidfVectorizer::fit(&corpus);
        tracing::debug!(
            "Fitted TF-IDF vocabulary of {} terms over {} documents",
            vectorizer.vocabulary_len(),
            corpus.len()
        );
        let mut vectors = vectorizer.transform(&corpus).into_iter();
        let resume_vector = vectors.next().unwrap_or_default();
        let job_vectors: Vec<(Uuid, Vec<f64>)> =
            jobs.iter().map(|(id, _)| *id).zip(vectors).collect();

        Ok(rank_jobs(&resume_vector, &job_vectors))
    }

    fn backend(&self) -> &'static str {
        "tfidf"
    }
}

/// Embedding-backed matcher: vectors come from the NLP sidecar.
pub struct EmbeddingMatcher {
    client: EmbeddingClient,
}

impl EmbeddingMatcher {
    pub fn new(client: EmbeddingClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobMatcher for EmbeddingMatcher {
    async fn rank(
        &self,
        resume_text: &str,
        jobs: &[(Uuid, String)],
    ) -> Result<Vec<JobScore>, AppError> {
        let mut texts = Vec::with_capacity(jobs.len() + 1);
        texts.push(clean_text(resume_text, false));
        for (_, text) in jobs {
            texts.push(clean_text(text, false));
        }

        let mut vectors = self
            .client
            .embed(&texts)
            .await
            .map_err(|e| AppError::Embedding(e.to_string()))?
            .into_iter();

        let resume_vector = vectors.next().unwrap_or_default();
        let job_vectors: Vec<(Uuid, Vec<f64>)> =
            jobs.iter().map(|(id, _)| *id).zip(vectors).collect();

        Ok(rank_jobs(&resume_vector, &job_vectors))
    }

    fn backend(&self) -> &'static str {
        "embedding"
    }
}
