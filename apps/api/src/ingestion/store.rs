use anyhow::Result;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::filtering::categorize;
use crate::models::job::{JobPosting, JobRow};
use crate::processing::dedupe::posting_hash;

/// Result of persisting a batch of normalized postings.
#[derive(Debug, Default, Serialize)]
pub struct InsertOutcome {
    pub inserted: u64,
    pub duplicates_skipped: u64,
}

/// Persists normalized postings, categorizing each and skipping rows whose
/// identity hash is already stored.
pub async fn insert_postings(pool: &PgPool, postings: &[JobPosting]) -> Result<InsertOutcome> {
    let mut outcome = InsertOutcome::default();

    for posting in postings {
        let fields = categorize(posting);
        let hash = posting_hash(posting);

        let result = sqlx::query(
            r#"
            INSERT INTO jobs
                (id, title, company, location, description, url, source,
                 is_remote, min_salary, max_salary,
                 standardized_location, standardized_industry, row_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (row_hash) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&posting.title)
        .bind(&posting.company)
        .bind(&posting.location)
        .bind(&posting.description)
        .bind(&posting.url)
        .bind(&posting.source)
        .bind(fields.is_remote)
        .bind(fields.min_salary)
        .bind(fields.max_salary)
        .bind(&fields.standardized_location)
        .bind(&fields.standardized_industry)
        .bind(&hash)
        .execute(pool)
        .await?;

        if result.rows_affected() == 1 {
            outcome.inserted += 1;
        } else {
            outcome.duplicates_skipped += 1;
        }
    }

    info!(
        "Stored postings: {} inserted, {} duplicates skipped",
        outcome.inserted, outcome.duplicates_skipped
    );
    Ok(outcome)
}

/// Returns all stored postings, newest first.
pub async fn list_jobs(pool: &PgPool) -> Result<Vec<JobRow>> {
    Ok(
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?,
    )
}
