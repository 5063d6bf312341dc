//! Categorization of normalized postings into typed, filterable fields, and
//! the in-memory filters applied by the job listing endpoint.

use serde::Deserialize;

use crate::models::job::{JobPosting, JobRow};

/// Typed fields derived from a posting's free-text location/salary/industry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorizedFields {
    pub is_remote: bool,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub standardized_location: Option<String>,
    pub standardized_industry: Option<String>,
}

/// Derives standardized fields from a normalized posting.
pub fn categorize(posting: &JobPosting) -> CategorizedFields {
    let location = posting
        .location
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    let is_remote = location.contains("remote");

    let (min_salary, max_salary) = posting
        .salary_range
        .as_deref()
        .and_then(parse_salary_range)
        .map_or((None, None), |(min, max)| (Some(min), Some(max)));

    let standardized_location = if location.is_empty() {
        None
    } else {
        Some(parse_location(&location))
    };

    let standardized_industry = posting
        .industry
        .as_deref()
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty());

    CategorizedFields {
        is_remote,
        min_salary,
        max_salary,
        standardized_location,
        standardized_industry,
    }
}

/// Extracts `(min, max)` annual figures from strings like "€50k - €70k" or
/// "50000-70000". Returns None when two numbers cannot be recovered.
pub fn parse_salary_range(salary: &str) -> Option<(i64, i64)> {
    let expanded = salary.to_lowercase().replace('k', "000");
    let digits_only: String = expanded
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();

    let parts: Vec<&str> = digits_only.split('-').filter(|p| !p.is_empty()).collect();
    if parts.len() != 2 {
        return None;
    }
    let min = parts[0].parse::<i64>().ok()?;
    let max = parts[1].parse::<i64>().ok()?;
    Some((min, max))
}

/// Very basic location standardization: "remote" wins, otherwise the part
/// before the first comma.
pub fn parse_location(location: &str) -> String {
    if location.contains("remote") {
        return "remote".to_string();
    }
    location
        .split(',')
        .next()
        .unwrap_or(location)
        .trim()
        .to_string()
}

/// Query parameters accepted by `GET /api/v1/jobs`.
#[derive(Debug, Default, Deserialize)]
pub struct JobFilters {
    pub location: Option<String>,
    pub remote: Option<bool>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub industry: Option<String>,
}

impl JobFilters {
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.remote.is_none()
            && self.min_salary.is_none()
            && self.max_salary.is_none()
            && self.industry.is_none()
    }
}

/// Applies all requested filters in sequence.
pub fn apply_filters(mut jobs: Vec<JobRow>, filters: &JobFilters) -> Vec<JobRow> {
    if let Some(location) = &filters.location {
        jobs = filter_by_location(jobs, location);
    }
    if let Some(remote) = filters.remote {
        jobs = filter_by_remote(jobs, remote);
    }
    if filters.min_salary.is_some() || filters.max_salary.is_some() {
        jobs = filter_by_salary_range(jobs, filters.min_salary, filters.max_salary);
    }
    if let Some(industry) = &filters.industry {
        jobs = filter_by_industry(jobs, industry);
    }
    jobs
}

/// Keeps jobs whose standardized location matches exactly (case-insensitive).
pub fn filter_by_location(jobs: Vec<JobRow>, location: &str) -> Vec<JobRow> {
    let wanted = location.trim().to_lowercase();
    jobs.into_iter()
        .filter(|job| {
            job.standardized_location
                .as_deref()
                .map(|l| l.eq_ignore_ascii_case(&wanted))
                .unwrap_or(false)
        })
        .collect()
}

/// Keeps remote jobs (remote=true) or on-site jobs (remote=false).
pub fn filter_by_remote(jobs: Vec<JobRow>, remote: bool) -> Vec<JobRow> {
    jobs.into_iter()
        .filter(|job| job.is_remote == remote)
        .collect()
}

/// Keeps jobs whose salary range overlaps the requested range (inclusive).
/// Jobs without salary info are excluded; a missing bound is unbounded.
pub fn filter_by_salary_range(
    jobs: Vec<JobRow>,
    min_salary: Option<i64>,
    max_salary: Option<i64>,
) -> Vec<JobRow> {
    jobs.into_iter()
        .filter(|job| {
            let (job_min, job_max) = match (job.min_salary, job.max_salary) {
                (Some(min), Some(max)) => (min, max),
                _ => return false,
            };
            if let Some(min) = min_salary {
                if job_max < min {
                    return false;
                }
            }
            if let Some(max) = max_salary {
                if job_min > max {
                    return false;
                }
            }
            true
        })
        .collect()
}

/// Keeps jobs matching the given industry (case-insensitive).
pub fn filter_by_industry(jobs: Vec<JobRow>, industry: &str) -> Vec<JobRow> {
    let wanted = industry.trim().to_lowercase();
    jobs.into_iter()
        .filter(|job| {
            job.standardized_industry
                .as_deref()
                .map(|i| i.eq_ignore_ascii_case(&wanted))
                .unwrap_or(false)
        })
        .collect()
}
