//! Fetches jobs from Jooble's public API.

use reqwest::Client;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::ingestion::{retryable_status, str_field, FetchError, INITIAL_BACKOFF, MAX_RETRIES};
use crate::models::job::JobPosting;

const JOOBLE_API_URL: &str = "https://jooble.org/api";

pub struct JoobleFetcher {
    client: Client,
    api_key: String,
}

impl JoobleFetcher {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Fetches up to `pages` pages of raw postings. Jooble paginates through
    /// an offset that advances by `results_per_page`.
    pub async fn fetch_jobs(
        &self,
        pages: u32,
        results_per_page: u32,
        keywords: Option<&str>,
        location: Option<&str>,
    ) -> Result<Vec<Value>, FetchError> {
        let mut all_jobs = Vec::new();
        let mut offset = 0u32;

        for _ in 0..pages {
            let mut backoff = INITIAL_BACKOFF;
            let mut retries = 0;

            let payload = json!({
                "keywords": keywords.unwrap_or(""),
                "location": location.unwrap_or(""),
                "page": offset,
                "limit": results_per_page,
            });

            loop {
                let url = format!("{JOOBLE_API_URL}/{}", self.api_key);
                info!("[Jooble] offset={offset} attempt={}", retries + 1);

                let response = match self.client.post(&url).json(&payload).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        warn!("[Jooble] transport error at offset {offset}: {e}");
                        if retries < MAX_RETRIES {
                            tokio::time::sleep(backoff).await;
                            backoff *= 2;
                            retries += 1;
                            continue;
                        }
                        warn!("[Jooble] max retries reached, skipping offset {offset}");
                        break;
                    }
                };

                let status = response.status();
                if retryable_status(status) {
                    warn!(
                        "[Jooble] got {status} at offset {offset}, sleeping {}s",
                        backoff.as_secs()
                    );
                    if retries < MAX_RETRIES {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                        retries += 1;
                        continue;
                    }
                    warn!("[Jooble] max retries reached, skipping offset {offset}");
                    break;
                }

                if !status.is_success() {
                    let message = response.text().await.unwrap_or_default();
                    return Err(FetchError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }

                let data: Value = response.json().await?;
                let jobs = data
                    .get("jobs")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                info!("[Jooble] got {} jobs at offset={offset}", jobs.len());
                all_jobs.extend(jobs);
                break;
            }

            offset += results_per_page;
        }

        Ok(all_jobs)
    }
}

/// Converts a Jooble job to the common posting schema.
pub fn normalize_jooble_job(job: &Value) -> JobPosting {
    JobPosting {
        title: str_field(job, "title"),
        company: str_field(job, "company"),
        location: str_field(job, "location"),
        description: str_field(job, "snippet"),
        url: str_field(job, "link"),
        salary_range: str_field(job, "salary").filter(|s| !s.trim().is_empty()),
        industry: None,
        source: "jooble".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_full_jooble_job() {
        let raw = json!({
            "title": "Backend Engineer",
            "company": "Beta LLC",
            "location": "Remote",
            "snippet": "Work on APIs",
            "link": "https://jooble.example/job/2",
            "salary": "€50k - €70k"
        });

        let posting = normalize_jooble_job(&raw);
        assert_eq!(posting.title.as_deref(), Some("Backend Engineer"));
        assert_eq!(posting.company.as_deref(), Some("Beta LLC"));
        assert_eq!(posting.description.as_deref(), Some("Work on APIs"));
        assert_eq!(posting.url.as_deref(), Some("https://jooble.example/job/2"));
        assert_eq!(posting.salary_range.as_deref(), Some("€50k - €70k"));
        assert_eq!(posting.source, "jooble");
    }

    #[test]
    fn test_normalize_blank_salary_becomes_none() {
        let raw = json!({"title": "Engineer", "salary": "  "});
        let posting = normalize_jooble_job(&raw);
        assert!(posting.salary_range.is_none());
    }
}
