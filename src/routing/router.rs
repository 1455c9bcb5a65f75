//! Router facade: the single entry point for department suggestions

use super::dictionary::KeywordDictionary;
use super::models::{DepartmentId, ScoreBoard, Suggestion};
use super::scorer::Scorer;
use super::selector::Selector;
use crate::config::RoutingConfig;
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Maps grievance text to a suggested department.
///
/// Stateless across calls and cheap to clone; the dictionary is shared
/// read-only, and every call works on its own score board.
#[derive(Debug, Clone)]
pub struct DepartmentRouter {
    scorer: Scorer,
    selector: Selector,
}

impl DepartmentRouter {
    pub fn new(dictionary: KeywordDictionary, default_department: DepartmentId) -> Self {
        Self {
            scorer: Scorer::new(Arc::new(dictionary)),
            selector: Selector::new(default_department),
        }
    }

    /// Build from configuration; fails if the dictionary does not validate
    pub fn from_config(config: &RoutingConfig) -> Result<Self> {
        let dictionary = KeywordDictionary::with_extra(config.extra_keywords.clone())?;
        info!(
            "Department router ready: {} keywords, default department {}",
            dictionary.len(),
            config.default_department
        );
        Ok(Self::new(dictionary, config.default_department))
    }

    /// Built-in dictionary with `Municipal` as the fallback
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(KeywordDictionary::builtin()?, DepartmentId::Municipal))
    }

    /// Suggest a department. Empty text resolves to the fallback department.
    pub fn classify(&self, title: &str, description: &str, image_labels: &[String]) -> Suggestion {
        self.select(self.score(title, description, image_labels))
    }

    /// Pick the department from an already computed board
    pub fn select(&self, board: ScoreBoard) -> Suggestion {
        let suggestion = self.selector.select(board);

        debug!(
            "Classified as {} (confidence {:.2}, {} terms)",
            suggestion.department,
            suggestion.confidence,
            suggestion.matched_terms.len()
        );

        suggestion
    }

    /// Score board for the combined text, exposed for triage labels
    pub fn score(&self, title: &str, description: &str, image_labels: &[String]) -> ScoreBoard {
        self.scorer.score(&combine(title, description, image_labels))
    }

    pub fn default_department(&self) -> DepartmentId {
        self.selector.default_department()
    }

    pub fn dictionary(&self) -> &KeywordDictionary {
        self.scorer.dictionary()
    }
}

/// Lowercased `title description label...`, single-space separated
fn combine(title: &str, description: &str, image_labels: &[String]) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(2 + image_labels.len());
    parts.push(title);
    parts.push(description);
    parts.extend(image_labels.iter().map(String::as_str));

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
