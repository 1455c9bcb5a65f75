//! Department routing for grievance text
//!
//! A small deterministic rule engine:
//! - Keyword dictionary of civic terms with per-term weights
//! - Scorer summing weighted substring matches per department
//! - Selector picking the top department with a capped confidence
//! - Router facade combining the two, plus category/priority triage

pub mod dictionary;
pub mod models;
pub mod router;
pub mod scorer;
pub mod selector;
pub mod triage;

pub use dictionary::KeywordDictionary;
pub use models::{DepartmentId, KeywordEntry, ScoreBoard, Suggestion};
pub use router::DepartmentRouter;
pub use scorer::Scorer;
pub use selector::{Selector, FALLBACK_CONFIDENCE, MAX_CONFIDENCE};
pub use triage::{analyze_text, TextAnalysis};
