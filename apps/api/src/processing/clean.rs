//! Text cleaning for postings and resumes before vectorization.

use std::sync::OnceLock;

use regex::Regex;

/// English stopwords dropped during cleaning.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "below", "between", "both", "but", "by", "can",
    "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from", "further",
    "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if",
    "in", "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "nor", "not",
    "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "out", "over", "own",
    "s", "same", "she", "so", "some", "such", "t", "than", "that", "the", "their", "theirs",
    "them", "then", "there", "these", "they", "this", "those", "through", "to", "too", "under",
    "until", "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
    "whom", "why", "will", "with", "you", "your", "yours",
];

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-z0-9]+").unwrap())
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.binary_search(&token).is_ok()
}

/// Cleans raw text: lowercase, strip punctuation, drop stopwords, and
/// optionally reduce tokens to a base form.
pub fn clean_text(text: &str, lemmatize: bool) -> String {
    let lowered = text.to_lowercase();
    let mut cleaned = Vec::new();

    for m in word_regex().find_iter(&lowered) {
        let token = m.as_str();
        if is_stopword(token) {
            continue;
        }
        if lemmatize {
            cleaned.push(base_form(token));
        } else {
            cleaned.push(token.to_string());
        }
    }

    cleaned.join(" ")
}

/// Rule-based suffix stripping. A rough stand-in for lemmatization that keeps
/// plural and inflected forms from splitting vocabulary entries.
fn base_form(token: &str) -> String {
    if token.len() > 4 && token.ends_with("ies") {
        return format!("{}y", &token[..token.len() - 3]);
    }
    if token.len() > 4 && token.ends_with("sses") {
        return token[..token.len() - 2].to_string();
    }
    if token.len() > 5 && token.ends_with("ing") {
        return token[..token.len() - 3].to_string();
    }
    if token.len() > 4 && token.ends_with("ed") {
        return token[..token.len() - 2].to_string();
    }
    if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}

/// Removes HTML tags/entities and unifies multiline text into one line.
pub fn clean_multiline_description(description: &str) -> String {
    let no_tags = tag_regex().replace_all(description, "");
    let no_entities = unescape_entities(&no_tags);
    no_entities
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Decodes the HTML entities that job boards actually emit.
pub fn unescape_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwords_are_sorted_for_binary_search() {
        let mut sorted = STOPWORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, STOPWORDS);
    }

    #[test]
    fn test_clean_text_drops_stopwords_and_punctuation() {
        let cleaned = clean_text("The quick brown fox, and the lazy dog!", false);
        assert_eq!(cleaned, "quick brown fox lazy dog");
    }

    #[test]
    fn test_clean_text_lowercases() {
        assert_eq!(clean_text("RUST Engineer", false), "rust engineer");
    }

    #[test]
    fn test_clean_text_base_forms() {
        let cleaned = clean_text("building predictive models for companies", true);
        assert_eq!(cleaned, "build predictive model company");
    }

    #[test]
    fn test_base_form_keeps_short_tokens() {
        assert_eq!(base_form("sql"), "sql");
        assert_eq!(base_form("gas"), "gas");
        assert_eq!(base_form("class"), "class");
    }

    #[test]
    fn test_clean_multiline_description_strips_tags() {
        let raw = "<b>Senior</b> engineer<br>needed";
        assert_eq!(clean_multiline_description(raw), "Senior engineerneeded");
    }

    #[test]
    fn test_clean_multiline_description_collapses_whitespace() {
        let raw = "line one\n\nline   two\r\n  line three ";
        assert_eq!(clean_multiline_description(raw), "line one line two line three");
    }

    #[test]
    fn test_clean_multiline_description_decodes_entities() {
        let raw = "Fast&nbsp;paced &amp; fun";
        assert_eq!(clean_multiline_description(raw), "Fast paced & fun");
    }
}
