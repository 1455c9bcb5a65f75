//! Weighted keyword scoring

use super::dictionary::KeywordDictionary;
use super::models::ScoreBoard;
use std::sync::Arc;

/// Accumulates weighted keyword matches per department.
///
/// Matching is a case-insensitive substring test, not a word-boundary test:
/// "tree" matches inside "street". Every entry is checked on every call so
/// that ambiguous terms all contribute.
#[derive(Debug, Clone)]
pub struct Scorer {
    dictionary: Arc<KeywordDictionary>,
}

impl Scorer {
    pub fn new(dictionary: Arc<KeywordDictionary>) -> Self {
        Self { dictionary }
    }

    /// Score already-lowercased text
    pub fn score(&self, text: &str) -> ScoreBoard {
        let mut board = ScoreBoard::new();
        if text.is_empty() {
            return board;
        }

        for entry in self.dictionary.lookup() {
            if text.contains(entry.term.as_str()) {
                board.record(entry);
            }
        }

        board
    }

    pub fn dictionary(&self) -> &KeywordDictionary {
        &self.dictionary
    }
}
