use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting normalized to the common schema shared by all boards.
/// Fields are optional because boards routinely omit them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub salary_range: Option<String>,
    pub industry: Option<String>,
    pub source: String,
}

/// A stored posting, including the categorized fields derived at ingest time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source: String,
    pub is_remote: bool,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub standardized_location: Option<String>,
    pub standardized_industry: Option<String>,
    pub row_hash: String,
    pub created_at: DateTime<Utc>,
}

impl JobRow {
    /// Text used when vectorizing this posting for matching.
    pub fn match_text(&self) -> String {
        let title = self.title.as_deref().unwrap_or("");
        let description = self.description.as_deref().unwrap_or("");
        format!("{title} {description}").trim().to_string()
    }
}
