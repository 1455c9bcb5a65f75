//! Department selection and confidence normalization

use super::models::{DepartmentId, ScoreBoard, Suggestion};

/// Confidence reported when no keyword matched
pub const FALLBACK_CONFIDENCE: f64 = 0.3;
/// Heuristic confidence never exceeds this
pub const MAX_CONFIDENCE: f64 = 0.9;
const BASE_CONFIDENCE: f64 = 0.5;
const CONFIDENCE_PER_POINT: f64 = 0.1;

/// Turns a score board into a suggestion
#[derive(Debug, Clone, Copy)]
pub struct Selector {
    default_department: DepartmentId,
}

impl Selector {
    pub fn new(default_department: DepartmentId) -> Self {
        Self { default_department }
    }

    pub fn default_department(&self) -> DepartmentId {
        self.default_department
    }

    pub fn select(&self, board: ScoreBoard) -> Suggestion {
        // Strict comparison over tie-break order keeps the earliest department on ties
        let mut best: Option<(DepartmentId, u32)> = None;
        for (department, score) in board.iter() {
            if score == 0 {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((department, score)),
            }
        }

        match best {
            Some((department, top)) => Suggestion {
                department,
                confidence: confidence_for(top),
                matched_terms: board.into_matched_terms(),
            },
            None => Suggestion {
                department: self.default_department,
                confidence: FALLBACK_CONFIDENCE,
                matched_terms: Vec::new(),
            },
        }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(DepartmentId::Municipal)
    }
}

/// `min(0.9, 0.5 + 0.1 * top_score)`, clamped to `[0.3, 0.9]`
pub fn confidence_for(top_score: u32) -> f64 {
    (BASE_CONFIDENCE + CONFIDENCE_PER_POINT * f64::from(top_score))
        .min(MAX_CONFIDENCE)
        .clamp(FALLBACK_CONFIDENCE, MAX_CONFIDENCE)
}
