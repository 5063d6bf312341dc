//! Parser for the NLP sidecar's dependency manifest.
//!
//! The manifest (`resources/pipeline-requirements.txt`) lists the sidecar's
//! packages one per line, each optionally pinned to a minimum version with
//! `>=`. A trailing comment block names three alternative spaCy language
//! models (small/medium/large); exactly one of them is installed, chosen by
//! the operator through `NLP_MODEL_SIZE`.

#![allow(dead_code)]

use std::str::FromStr;

use thiserror::Error;

/// Embedded copy of the sidecar manifest, validated at startup.
pub const EMBEDDED_MANIFEST: &str = include_str!("../resources/pipeline-requirements.txt");

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("duplicate dependency '{0}' in manifest")]
    DuplicateDependency(String),

    #[error("invalid manifest line {line_no}: '{content}'")]
    InvalidLine { line_no: usize, content: String },

    #[error("expected exactly 3 model alternatives, found {0}")]
    ModelAlternatives(usize),

    #[error("no {0:?} model among the manifest alternatives")]
    NoModelForSize(ModelSize),

    #[error("unknown model size '{0}' (expected small, medium, or large)")]
    UnknownModelSize(String),
}

/// A single `(name, optional minimum version)` pair from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub min_version: Option<String>,
}

/// The three mutually exclusive spaCy model sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSize {
    Small,
    Medium,
    Large,
}

impl ModelSize {
    /// Suffix spaCy uses in model package names (`en_core_web_sm` etc.).
    fn suffix(self) -> &'static str {
        match self {
            ModelSize::Small => "_sm",
            ModelSize::Medium => "_md",
            ModelSize::Large => "_lg",
        }
    }
}

impl FromStr for ModelSize {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(ModelSize::Small),
            "medium" => Ok(ModelSize::Medium),
            "large" => Ok(ModelSize::Large),
            other => Err(ManifestError::UnknownModelSize(other.to_string())),
        }
    }
}

/// Parsed manifest: the dependency list plus the model alternatives from the
/// trailing comment block.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub dependencies: Vec<Dependency>,
    pub model_alternatives: Vec<String>,
}

impl Manifest {
    /// Parses a manifest from its text form.
    ///
    /// Duplicate dependency names (case-insensitive, `-` and `_` treated as
    /// equivalent, matching pip normalization) are rejected, as is a comment
    /// block that does not name exactly three model alternatives.
    pub fn parse(input: &str) -> Result<Self, ManifestError> {
        let mut dependencies: Vec<Dependency> = Vec::new();
        let mut model_alternatives = Vec::new();

        for (idx, raw_line) in input.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                if let Some(model) = extract_model_name(comment) {
                    model_alternatives.push(model);
                }
                continue;
            }

            let dep = parse_dependency_line(line).ok_or_else(|| ManifestError::InvalidLine {
                line_no: idx + 1,
                content: raw_line.to_string(),
            })?;

            let normalized = normalize_name(&dep.name);
            if dependencies
                .iter()
                .any(|d| normalize_name(&d.name) == normalized)
            {
                return Err(ManifestError::DuplicateDependency(dep.name));
            }
            dependencies.push(dep);
        }

        if model_alternatives.len() != 3 {
            return Err(ManifestError::ModelAlternatives(model_alternatives.len()));
        }

        Ok(Manifest {
            dependencies,
            model_alternatives,
        })
    }

    /// Picks the single model resource matching the requested size.
    /// Never installs or requires more than one alternative.
    pub fn select_model(&self, size: ModelSize) -> Result<&str, ManifestError> {
        self.model_alternatives
            .iter()
            .find(|m| m.ends_with(size.suffix()))
            .map(String::as_str)
            .ok_or(ManifestError::NoModelForSize(size))
    }
}

fn parse_dependency_line(line: &str) -> Option<Dependency> {
    let (name, min_version) = match line.split_once(">=") {
        Some((name, version)) => {
            let version = version.trim();
            if version.is_empty() {
                return None;
            }
            (name.trim(), Some(version.to_string()))
        }
        None => (line, None),
    };

    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return None;
    }

    Some(Dependency {
        name: name.to_string(),
        min_version,
    })
}

fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace('-', "_")
}

/// Pulls a spaCy model package name out of a comment line, if present.
fn extract_model_name(comment: &str) -> Option<String> {
    comment
        .split_whitespace()
        .find(|tok| tok.starts_with("en_core_web_"))
        .map(|tok| tok.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '_').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_manifest_parses() {
        let manifest = Manifest::parse(EMBEDDED_MANIFEST).unwrap();
        assert!(!manifest.dependencies.is_empty());
    }

    #[test]
    fn test_embedded_manifest_has_no_duplicate_names() {
        // Parsing already rejects duplicates; this documents the property.
        assert!(Manifest::parse(EMBEDDED_MANIFEST).is_ok());
    }

    #[test]
    fn test_dependency_pairs_with_and_without_constraint() {
        let manifest = Manifest::parse(EMBEDDED_MANIFEST).unwrap();
        let spacy = manifest
            .dependencies
            .iter()
            .find(|d| d.name == "spacy")
            .unwrap();
        assert_eq!(spacy.min_version.as_deref(), Some("3.5.0"));

        let docx = manifest
            .dependencies
            .iter()
            .find(|d| d.name == "python-docx")
            .unwrap();
        assert!(docx.min_version.is_none());
    }

    #[test]
    fn test_exactly_three_model_alternatives() {
        let manifest = Manifest::parse(EMBEDDED_MANIFEST).unwrap();
        assert_eq!(manifest.model_alternatives.len(), 3);
    }

    #[test]
    fn test_selection_picks_one_alternative_not_all() {
        let manifest = Manifest::parse(EMBEDDED_MANIFEST).unwrap();
        assert_eq!(
            manifest.select_model(ModelSize::Small).unwrap(),
            "en_core_web_sm"
        );
        assert_eq!(
            manifest.select_model(ModelSize::Medium).unwrap(),
            "en_core_web_md"
        );
        assert_eq!(
            manifest.select_model(ModelSize::Large).unwrap(),
            "en_core_web_lg"
        );
    }

    #[test]
    fn test_duplicate_dependency_rejected() {
        let input = "spacy>=3.0\nSpaCy\n# models:\n#   en_core_web_sm\n#   en_core_web_md\n#   en_core_web_lg\n";
        let err = Manifest::parse(input).unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateDependency(_)));
    }

    #[test]
    fn test_dash_underscore_names_are_duplicates() {
        let input = "python-docx\npython_docx\n#   en_core_web_sm\n#   en_core_web_md\n#   en_core_web_lg\n";
        assert!(matches!(
            Manifest::parse(input),
            Err(ManifestError::DuplicateDependency(_))
        ));
    }

    #[test]
    fn test_invalid_line_rejected() {
        let input = "valid-name\nnot a name!\n";
        let err = Manifest::parse(input).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidLine { line_no: 2, .. }));
    }

    #[test]
    fn test_wrong_alternative_count_rejected() {
        let input = "spacy\n#   en_core_web_sm\n#   en_core_web_md\n";
        assert!(matches!(
            Manifest::parse(input),
            Err(ManifestError::ModelAlternatives(2))
        ));
    }

    #[test]
    fn test_model_size_from_str() {
        assert_eq!("small".parse::<ModelSize>().unwrap(), ModelSize::Small);
        assert_eq!("Medium".parse::<ModelSize>().unwrap(), ModelSize::Medium);
        assert_eq!("LARGE".parse::<ModelSize>().unwrap(), ModelSize::Large);
        assert!("xl".parse::<ModelSize>().is_err());
    }
}
