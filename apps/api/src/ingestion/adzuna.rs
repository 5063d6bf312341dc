//! Fetches jobs from Adzuna's public search API.

use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};

use crate::ingestion::{
    display_name, retryable_status, str_field, FetchError, INITIAL_BACKOFF, MAX_RETRIES,
};
use crate::models::job::JobPosting;

const ADZUNA_API_URL: &str = "https://api.adzuna.com/v1/api/jobs";

pub struct AdzunaFetcher {
    client: Client,
    app_id: String,
    app_key: String,
    country_code: String,
    base_url: String,
}

impl AdzunaFetcher {
    pub fn new(app_id: String, app_key: String, country_code: &str) -> Self {
        Self {
            client: Client::new(),
            app_id,
            app_key,
            base_url: format!("{ADZUNA_API_URL}/{country_code}/search"),
            country_code: country_code.to_string(),
        }
    }

    /// Fetches up to `pages` pages of raw postings. Retries on 429, 5xx, and
    /// transport errors with exponential backoff; a page that exhausts its
    /// retries is skipped rather than failing the whole run.
    pub async fn fetch_jobs(
        &self,
        pages: u32,
        results_per_page: u32,
        what: Option<&str>,
        where_: Option<&str>,
    ) -> Result<Vec<Value>, FetchError> {
        let mut all_jobs = Vec::new();

        for page_num in 1..=pages {
            let mut backoff = INITIAL_BACKOFF;
            let mut retries = 0;

            loop {
                let url = format!("{}/{page_num}", self.base_url);
                let mut params: Vec<(&str, String)> = vec![
                    ("app_id", self.app_id.clone()),
                    ("app_key", self.app_key.clone()),
                    ("results_per_page", results_per_page.to_string()),
                ];
                if let Some(what) = what {
                    params.push(("what", what.to_string()));
                }
                if let Some(where_) = where_ {
                    params.push(("where", where_.to_string()));
                }

                info!(
                    "[Adzuna] country={} page={} attempt={}",
                    self.country_code,
                    page_num,
                    retries + 1
                );

                let response = match self.client.get(&url).query(&params).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        warn!("[Adzuna] transport error on page {page_num}: {e}");
                        if retries < MAX_RETRIES {
                            tokio::time::sleep(backoff).await;
                            backoff *= 2;
                            retries += 1;
                            continue;
                        }
                        warn!("[Adzuna] max retries reached, skipping page {page_num}");
                        break;
                    }
                };

                let status = response.status();
                if retryable_status(status) {
                    warn!(
                        "[Adzuna] got {status} on page {page_num}, sleeping {}s",
                        backoff.as_secs()
                    );
                    if retries < MAX_RETRIES {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                        retries += 1;
                        continue;
                    }
                    warn!("[Adzuna] max retries reached, skipping page {page_num}");
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
                    .get("results")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                info!("[Adzuna] got {} jobs from page {page_num}", jobs.len());
                all_jobs.extend(jobs);
                break;
            }
        }

        Ok(all_jobs)
    }
}

/// Converts an Adzuna job to the common posting schema.
pub fn normalize_adzuna_job(job: &Value) -> JobPosting {
    let salary_range = match (
        job.get("salary_min").and_then(Value::as_f64),
        job.get("salary_max").and_then(Value::as_f64),
    ) {
        (Some(min), Some(max)) => Some(format!("{}-{}", min as i64, max as i64)),
        _ => None,
    };

    JobPosting {
        title: str_field(job, "title"),
        company: display_name(job, "company"),
        location: display_name(job, "location"),
        description: str_field(job, "description"),
        url: str_field(job, "redirect_url"),
        salary_range,
        industry: job
            .get("category")
            .and_then(|c| c.get("label"))
            .and_then(Value::as_str)
            .map(str::to_string),
        source: "adzuna".to_string(),
    }
}
