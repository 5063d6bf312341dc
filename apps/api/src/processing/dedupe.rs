//! CSV import/export and duplicate removal for job postings.
//!
//! Duplicates are detected by hashing the title/company/location/description
//! fields (lowercased and trimmed, joined with `||`); the first occurrence
//! wins.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::job::JobPosting;
use crate::processing::clean::clean_multiline_description;

/// One CSV row in the interchange format for job postings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CsvJobRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
}

impl CsvJobRecord {
    pub fn into_posting(self) -> JobPosting {
        let source = if self.source.is_empty() {
            "csv".to_string()
        } else {
            self.source
        };
        JobPosting {
            title: non_empty(self.title),
            company: non_empty(self.company),
            location: non_empty(self.location),
            description: non_empty(self.description),
            url: non_empty(self.url),
            salary_range: None,
            industry: None,
            source,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Outcome of a clean-and-dedup pass.
#[derive(Debug, Serialize)]
pub struct DedupSummary {
    pub read: usize,
    pub unique: usize,
    pub duplicates_removed: usize,
}

/// Reads records from CSV text. The reader is configured to tolerate
/// multiline quoted fields, which job descriptions routinely contain.
pub fn read_records(csv_text: &str) -> Result<Vec<CsvJobRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: CsvJobRecord = result.context("Failed to parse CSV record")?;
        records.push(record);
    }
    Ok(records)
}

/// Writes records as CSV with every field quoted, preserving punctuation and
/// embedded commas in text fields.
pub fn write_records(records: &[CsvJobRecord]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {e}"))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Standardizes fields: trims, title-cases job titles, and flattens
/// multiline/HTML descriptions.
pub fn clean_records(records: &mut [CsvJobRecord]) {
    for record in records.iter_mut() {
        record.title = title_case(record.title.trim());
        record.company = record.company.trim().to_string();
        record.location = record.location.trim().to_string();
        record.description = clean_multiline_description(&record.description);
    }
}

/// Hash over the identity fields of a record. Stable across runs.
pub fn row_hash(record: &CsvJobRecord) -> String {
    let concat = [
        &record.title,
        &record.company,
        &record.location,
        &record.description,
    ]
    .iter()
    .map(|field| field.trim().to_lowercase())
    .collect::<Vec<_>>()
    .join("||");

    format!("{:x}", Sha256::digest(concat.as_bytes()))
}

/// Hash over a normalized posting, used for insert-time deduplication.
pub fn posting_hash(posting: &JobPosting) -> String {
    let concat = [
        posting.title.as_deref().unwrap_or(""),
        posting.company.as_deref().unwrap_or(""),
        posting.location.as_deref().unwrap_or(""),
        posting.description.as_deref().unwrap_or(""),
    ]
    .iter()
    .map(|field| field.trim().to_lowercase())
    .collect::<Vec<_>>()
    .join("||");

    format!("{:x}", Sha256::digest(concat.as_bytes()))
}

/// Removes duplicate records, keeping the first occurrence of each hash.
pub fn remove_duplicates(records: Vec<CsvJobRecord>) -> (Vec<CsvJobRecord>, DedupSummary) {
    let read = records.len();
    let mut seen = std::collections::HashSet::new();
    let mut unique = Vec::with_capacity(records.len());

    for record in records {
        if seen.insert(row_hash(&record)) {
            unique.push(record);
        }
    }

    let summary = DedupSummary {
        read,
        unique: unique.len(),
        duplicates_removed: read - unique.len(),
    };
    (unique, summary)
}

/// Capitalizes the first letter of each word, lowercasing the rest.
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().to_string() + chars.as_str().to_lowercase().as_str()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, company: &str, location: &str, description: &str) -> CsvJobRecord {
        CsvJobRecord {
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_row_hash_is_case_and_whitespace_insensitive() {
        let a = record("Data Engineer", "Acme", "NYC", "Build pipelines");
        let b = record("  data engineer ", "ACME", " nyc", "build pipelines  ");
        assert_eq!(row_hash(&a), row_hash(&b));
    }

    #[test]
    fn test_row_hash_differs_on_content() {
        let a = record("Data Engineer", "Acme", "NYC", "Build pipelines");
        let b = record("Data Scientist", "Acme", "NYC", "Build pipelines");
        assert_ne!(row_hash(&a), row_hash(&b));
    }

    #[test]
    fn test_remove_duplicates_keeps_first() {
        let first = record("Engineer", "Acme", "NYC", "first copy");
        let mut dup = first.clone();
        dup.url = "https://example.com/other".to_string(); // url not hashed
        let other = record("Engineer", "Beta", "NYC", "different");

        let (unique, summary) = remove_duplicates(vec![first.clone(), dup, other]);
        assert_eq!(summary.read, 3);
        assert_eq!(summary.unique, 2);
        assert_eq!(summary.duplicates_removed, 1);
        assert_eq!(unique[0].url, first.url);
    }

    #[test]
    fn test_clean_records_title_cases_and_flattens() {
        let mut records = vec![record(
            "  senior DATA engineer ",
            " Acme ",
            " New York ",
            "<p>Great&nbsp;role</p>\nRemote friendly",
        )];
        clean_records(&mut records);
        assert_eq!(records[0].title, "Senior Data Engineer");
        assert_eq!(records[0].company, "Acme");
        assert_eq!(records[0].location, "New York");
        assert_eq!(records[0].description, "Great role Remote friendly");
    }

    #[test]
    fn test_csv_round_trip_quotes_all_fields() {
        let records = vec![record(
            "Engineer",
            "Acme, Inc.",
            "NYC",
            "Line one\nline two, with comma",
        )];
        let csv_text = write_records(&records).unwrap();
        assert!(csv_text.starts_with("\"title\""));

        let parsed = read_records(&csv_text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].company, "Acme, Inc.");
        assert_eq!(parsed[0].description, "Line one\nline two, with comma");
    }

    #[test]
    fn test_into_posting_maps_empty_fields_to_none() {
        let posting = record("Engineer", "", "  ", "desc").into_posting();
        assert_eq!(posting.title.as_deref(), Some("Engineer"));
        assert!(posting.company.is_none());
        assert!(posting.location.is_none());
        assert_eq!(posting.source, "csv");
    }

    #[test]
    fn test_posting_hash_matches_row_hash_for_same_fields() {
        let rec = record("Engineer", "Acme", "NYC", "desc");
        let posting = rec.clone().into_posting();
        assert_eq!(row_hash(&rec), posting_hash(&posting));
    }
}
