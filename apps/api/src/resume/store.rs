use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::ResumeRow;
use crate::resume::parser::ParsedResume;

/// Persists a parsed resume and returns its row.
pub async fn insert_resume(
    pool: &PgPool,
    id: Uuid,
    parsed: &ParsedResume,
    s3_key: &str,
) -> Result<ResumeRow> {
    let sections = serde_json::to_value(&parsed.sections)?;

    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, file_name, file_type, raw_text, tokens, sections, s3_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&parsed.file_name)
    .bind(parsed.file_type.as_str())
    .bind(&parsed.raw_text)
    .bind(&parsed.tokens)
    .bind(&sections)
    .bind(s3_key)
    .fetch_one(pool)
    .await?;

    info!(
        "Stored resume {id} ({}, {} tokens)",
        parsed.file_type.as_str(),
        parsed.tokens.len()
    );
    Ok(row)
}

/// Fetches a resume by id.
pub async fn get_resume(pool: &PgPool, id: Uuid) -> Result<Option<ResumeRow>> {
    Ok(
        sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}
