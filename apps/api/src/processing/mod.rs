pub mod clean;
pub mod dedupe;
pub mod tfidf;
