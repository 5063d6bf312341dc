use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A parsed resume as stored in Postgres.
/// `sections` holds the education/experience/skills/other split as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub raw_text: String,
    pub tokens: Vec<String>,
    pub sections: Value,
    pub s3_key: String,
    pub created_at: DateTime<Utc>,
}
