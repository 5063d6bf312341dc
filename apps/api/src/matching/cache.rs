//! Redis-backed cache of full match score lists, keyed by resume id.
//!
//! The whole sorted list is cached, not just the requested top-N, so a later
//! request with a different `top_n` is still a cache hit. Entries expire
//! after a configurable TTL so newly ingested postings eventually show up
//! without an explicit `refresh`.

use redis::AsyncCommands;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::JobScore;

const KEY_PREFIX: &str = "match:scores:";

#[derive(Clone)]
pub struct ScoreCache {
    client: redis::Client,
    ttl_secs: u64,
}

impl ScoreCache {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    fn key(resume_id: Uuid) -> String {
        format!("{KEY_PREFIX}{resume_id}")
    }

    /// Returns the cached score list for a resume, if any.
    pub async fn get(&self, resume_id: Uuid) -> Result<Option<Vec<JobScore>>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(Self::key(resume_id)).await?;
        match raw {
            Some(json) => {
                let scores = serde_json::from_str(&json)
                    .map_err(|e| AppError::Internal(anyhow::anyhow!("corrupt cache entry: {e}")))?;
                debug!("Cache hit for resume {resume_id}");
                Ok(Some(scores))
            }
            None => Ok(None),
        }
    }

    /// Stores the full score list for a resume, replacing any previous entry.
    /// The entry expires after the configured TTL.
    pub async fn put(&self, resume_id: Uuid, scores: &[JobScore]) -> Result<(), AppError> {
        let json = serde_json::to_string(scores)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode scores: {e}")))?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(Self::key(resume_id), json, self.ttl_secs)
            .await?;
        debug!(
            "Cached {} scores for resume {resume_id} (ttl {}s)",
            scores.len(),
            self.ttl_secs
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keeps_configured_ttl() {
        let client = redis::Client::open("redis://127.0.0.1/").unwrap();
        let cache = ScoreCache::new(client, 900);
        assert_eq!(cache.ttl_secs, 900);
    }

    #[test]
    fn test_key_includes_resume_id() {
        let id = Uuid::new_v4();
        let key = ScoreCache::key(id);
        assert!(key.starts_with(KEY_PREFIX));
        assert!(key.ends_with(&id.to_string()));
    }

    #[test]
    fn test_score_list_round_trips_through_json() {
        let scores = vec![
            JobScore {
                job_id: Uuid::new_v4(),
                score: 0.92,
            },
            JobScore {
                job_id: Uuid::new_v4(),
                score: 0.15,
            },
        ];
        let json = serde_json::to_string(&scores).unwrap();
        let back: Vec<JobScore> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scores);
    }
}
