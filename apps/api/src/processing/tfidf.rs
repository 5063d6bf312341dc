//! TF-IDF vectorization for the default matching backend.
//!
//! Mirrors the smoothed-IDF formulation used by scikit-learn:
//! `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, with L2-normalized rows.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Two-plus character alphanumeric runs, like sklearn's default pattern.
    RE.get_or_init(|| Regex::new(r"[a-z0-9]{2,}").unwrap())
}

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_regex()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A fitted TF-IDF vectorizer. Construction via [`TfidfVectorizer::fit`]
/// makes transform-before-fit unrepresentable.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Builds the vocabulary and inverse document frequencies from a corpus.
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Self {
        let n_docs = corpus.len();
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();

        for doc in corpus {
            let mut seen: Vec<&String> = Vec::new();
            let tokens = tokenize(doc.as_ref());
            for token in &tokens {
                if !seen.contains(&token) {
                    seen.push(token);
                }
            }
            for token in seen {
                *document_frequency.entry(token.clone()).or_insert(0) += 1;
            }
        }

        // BTreeMap iteration gives the vocabulary a stable alphabetical order.
        let mut vocabulary = HashMap::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (index, (token, df)) in document_frequency.into_iter().enumerate() {
            vocabulary.insert(token, index);
            idf.push(((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0);
        }

        Self { vocabulary, idf }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Transforms texts into L2-normalized TF-IDF vectors.
    /// Tokens outside the fitted vocabulary are ignored.
    pub fn transform<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<f64>> {
        texts
            .iter()
            .map(|text| self.transform_one(text.as_ref()))
            .collect()
    }

    fn transform_one(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.vocabulary.len()];
        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                vector[index] += 1.0;
            }
        }
        for (index, value) in vector.iter_mut().enumerate() {
            *value *= self.idf[index];
        }

        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_corpus() -> Vec<String> {
        vec![
            "senior data scientist with experience in machine learning".to_string(),
            "looking for a data scientist to build predictive models".to_string(),
        ]
    }

    #[test]
    fn test_fit_builds_vocabulary() {
        let vectorizer = TfidfVectorizer::fit(&sample_corpus());
        assert!(vectorizer.vocabulary_len() > 0);
    }

    #[test]
    fn test_transform_dimensions_match_vocabulary() {
        let corpus = sample_corpus();
        let vectorizer = TfidfVectorizer::fit(&corpus);
        let vectors = vectorizer.transform(&corpus);
        assert_eq!(vectors.len(), 2);
        assert!(vectors
            .iter()
            .all(|v| v.len() == vectorizer.vocabulary_len()));
    }

    #[test]
    fn test_vectors_are_l2_normalized() {
        let corpus = sample_corpus();
        let vectorizer = TfidfVectorizer::fit(&corpus);
        for vector in vectorizer.transform(&corpus) {
            let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9, "norm was {norm}");
        }
    }

    #[test]
    fn test_shared_terms_weigh_less_than_unique_terms() {
        let corpus = sample_corpus();
        let vectorizer = TfidfVectorizer::fit(&corpus);
        let vectors = vectorizer.transform(&corpus);
        // "data" appears in both docs, "senior" only in the first.
        let data_idx = *vectorizer.vocabulary.get("data").unwrap();
        let senior_idx = *vectorizer.vocabulary.get("senior").unwrap();
        assert!(vectors[0][senior_idx] > vectors[0][data_idx]);
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let corpus = sample_corpus();
        let vectorizer = TfidfVectorizer::fit(&corpus);
        let vectors = vectorizer.transform(&["quantum basketweaving".to_string()]);
        assert!(vectors[0].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let vectorizer = TfidfVectorizer::fit(&sample_corpus());
        let vectors = vectorizer.transform(&["".to_string()]);
        assert!(vectors[0].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_single_char_tokens_excluded() {
        let vectorizer = TfidfVectorizer::fit(&["a b c rust".to_string()]);
        assert_eq!(vectorizer.vocabulary_len(), 1);
    }
}
