//! Heading-based section extraction for parsed resumes.
//!
//! A short or mostly-uppercase line is treated as a candidate heading and
//! labeled by token-overlap similarity against per-section synonym lists.
//! Labeling a heading needs similarity >= 0.65; switching away from the
//! current section needs >= 0.75, so a weak heading cannot hijack a section
//! it sits inside.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

const MAX_HEADING_WORDS: usize = 5;
const UPPERCASE_RATIO: f64 = 0.7;
const BASE_THRESHOLD: f64 = 0.65;
const OVERRIDE_THRESHOLD: f64 = 0.75;

const EDUCATION_SYNONYMS: &[&str] = &[
    "education",
    "academic background",
    "academics",
    "schooling",
    "educational background",
    "bachelor",
    "master",
    "university",
    "college",
    "graduate studies",
];

const EXPERIENCE_SYNONYMS: &[&str] = &[
    "experience",
    "work history",
    "employment",
    "professional experience",
    "career history",
];

const SKILLS_SYNONYMS: &[&str] = &[
    "skills",
    "competencies",
    "expertise",
    "technical skills",
    "areas of expertise",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Education,
    Experience,
    Skills,
    Other,
}

impl Section {
    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Section::Education => EDUCATION_SYNONYMS,
            Section::Experience => EXPERIENCE_SYNONYMS,
            Section::Skills => SKILLS_SYNONYMS,
            Section::Other => &[],
        }
    }
}

/// The education/experience/skills split of a resume, with everything
/// unmatched collected under `other`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeSections {
    pub education: String,
    pub experience: String,
    pub skills: String,
    pub other: String,
}

/// Heuristic for deciding whether a line might be a heading: few words, or
/// mostly uppercase letters.
fn is_potential_heading(line: &str) -> bool {
    let stripped = line.trim();
    if stripped.is_empty() {
        return false;
    }

    if stripped.split_whitespace().count() <= MAX_HEADING_WORDS {
        return true;
    }

    let upper = stripped
        .chars()
        .filter(|c| c.is_alphabetic() && c.is_uppercase())
        .count();
    let alpha = stripped.chars().filter(|c| c.is_alphabetic()).count();
    alpha > 0 && (upper as f64 / alpha as f64) >= UPPERCASE_RATIO
}

/// Dice coefficient over lowercase token sets.
fn token_similarity(a: &str, b: &str) -> f64 {
    let tokens_a: HashSet<String> = lowercase_tokens(a);
    let tokens_b: HashSet<String> = lowercase_tokens(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    let shared = tokens_a.intersection(&tokens_b).count();
    (2 * shared) as f64 / (tokens_a.len() + tokens_b.len()) as f64
}

fn lowercase_tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Best-matching section and its similarity score for a candidate heading.
fn section_label_with_score(line: &str) -> (Section, f64) {
    let mut best_section = Section::Other;
    let mut best_score = 0.0;

    for section in [Section::Education, Section::Experience, Section::Skills] {
        for synonym in section.synonyms() {
            let score = token_similarity(line, synonym);
            if score > best_score {
                best_score = score;
                best_section = section;
            }
        }
    }

    if best_score >= BASE_THRESHOLD {
        (best_section, best_score)
    } else {
        (Section::Other, best_score)
    }
}

/// Splits resume text into sections by walking lines and tracking the
/// current section across headings.
pub fn extract_sections(text: &str) -> ResumeSections {
    let mut education: Vec<&str> = Vec::new();
    let mut experience: Vec<&str> = Vec::new();
    let mut skills: Vec<&str> = Vec::new();
    let mut other: Vec<&str> = Vec::new();

    let mut current = Section::Other;

    for line in text.lines() {
        if is_potential_heading(line) {
            let (predicted, score) = section_label_with_score(line);
            if predicted != Section::Other {
                if current != predicted && score < OVERRIDE_THRESHOLD {
                    // Not confident enough to switch sections.
                    push_line(&mut education, &mut experience, &mut skills, &mut other, current, line);
                    continue;
                }
                current = predicted;
                continue; // heading lines are not content
            }
        }
        push_line(&mut education, &mut experience, &mut skills, &mut other, current, line);
    }

    ResumeSections {
        education: education.join("\n").trim().to_string(),
        experience: experience.join("\n").trim().to_string(),
        skills: skills.join("\n").trim().to_string(),
        other: other.join("\n").trim().to_string(),
    }
}

fn push_line<'a>(
    education: &mut Vec<&'a str>,
    experience: &mut Vec<&'a str>,
    skills: &mut Vec<&'a str>,
    other: &mut Vec<&'a str>,
    section: Section,
    line: &'a str,
) {
    match section {
        Section::Education => education.push(line),
        Section::Experience => experience.push(line),
        Section::Skills => skills.push(line),
        Section::Other => other.push(line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESUME: &str = "\
Jane Doe
jane@example.com | New York, NY

EDUCATION
BSc Computer Science, State University, 2019

PROFESSIONAL EXPERIENCE
Data Engineer at Acme Corp (2019-2023)
Built streaming pipelines processing 2TB daily

TECHNICAL SKILLS
Python, Rust, SQL, Airflow";

    #[test]
    fn test_short_line_is_potential_heading() {
        assert!(is_potential_heading("Education"));
        assert!(is_potential_heading("Work History"));
    }

    #[test]
    fn test_mostly_uppercase_long_line_is_potential_heading() {
        assert!(is_potential_heading(
            "SUMMARY OF QUALIFICATIONS AND SELECTED PROFESSIONAL ACHIEVEMENTS"
        ));
    }

    #[test]
    fn test_long_mixed_case_line_is_not_heading() {
        assert!(!is_potential_heading(
            "Built streaming pipelines that processed two terabytes of events daily"
        ));
    }

    #[test]
    fn test_blank_line_is_not_heading() {
        assert!(!is_potential_heading("   "));
    }

    #[test]
    fn test_exact_synonym_scores_one() {
        let (section, score) = section_label_with_score("EDUCATION");
        assert_eq!(section, Section::Education);
        assert!((score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_multiword_synonym_matches() {
        let (section, score) = section_label_with_score("Professional Experience");
        assert_eq!(section, Section::Experience);
        assert!(score >= OVERRIDE_THRESHOLD);
    }

    #[test]
    fn test_unrelated_heading_is_other() {
        let (section, _) = section_label_with_score("References");
        assert_eq!(section, Section::Other);
    }

    #[test]
    fn test_extract_sections_full_resume() {
        let sections = extract_sections(SAMPLE_RESUME);
        assert!(sections.education.contains("BSc Computer Science"));
        assert!(sections.experience.contains("Data Engineer at Acme Corp"));
        assert!(sections.experience.contains("streaming pipelines"));
        assert!(sections.skills.contains("Python, Rust, SQL"));
        assert!(sections.other.contains("Jane Doe"));
    }

    #[test]
    fn test_heading_lines_are_not_content() {
        let sections = extract_sections(SAMPLE_RESUME);
        assert!(!sections.education.contains("EDUCATION"));
        assert!(!sections.skills.contains("TECHNICAL SKILLS"));
    }

    #[test]
    fn test_weak_heading_does_not_switch_section() {
        // "Experience Summary" scores ~0.67 against "experience": enough to
        // label, not enough to pull content out of the current section.
        let text = "EDUCATION\nBSc Physics\nExperience Summary\nMore coursework";
        let sections = extract_sections(text);
        assert!(sections.education.contains("Experience Summary"));
        assert!(sections.education.contains("More coursework"));
        assert!(sections.experience.is_empty());
    }

    #[test]
    fn test_strong_heading_switches_section() {
        let text = "EDUCATION\nBSc Physics\nEXPERIENCE\nData Engineer";
        let sections = extract_sections(text);
        assert!(sections.education.contains("BSc Physics"));
        assert!(sections.experience.contains("Data Engineer"));
    }

    #[test]
    fn test_empty_text_gives_empty_sections() {
        assert_eq!(extract_sections(""), ResumeSections::default());
    }
}
