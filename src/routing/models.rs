//! Data models for department routing

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Government department a grievance can be routed to.
///
/// Declaration order is the tie-break order used by the selector: when two
/// departments score the same, the one declared first wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String")]
pub enum DepartmentId {
    PublicWorks,
    Electricity,
    Transport,
    Municipal,
    WaterSupply,
    Police,
    Environment,
}

impl DepartmentId {
    /// All departments in tie-break order
    pub const ALL: [DepartmentId; 7] = [
        DepartmentId::PublicWorks,
        DepartmentId::Electricity,
        DepartmentId::Transport,
        DepartmentId::Municipal,
        DepartmentId::WaterSupply,
        DepartmentId::Police,
        DepartmentId::Environment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DepartmentId::PublicWorks => "PublicWorks",
            DepartmentId::Electricity => "Electricity",
            DepartmentId::Transport => "Transport",
            DepartmentId::Municipal => "Municipal",
            DepartmentId::WaterSupply => "WaterSupply",
            DepartmentId::Police => "Police",
            DepartmentId::Environment => "Environment",
        }
    }

    /// Name the department is known by in the backend and the UI
    pub fn display_name(&self) -> &'static str {
        match self {
            DepartmentId::PublicWorks => "Public Works Department (PWD)",
            DepartmentId::Electricity => "Electricity Department",
            DepartmentId::Transport => "Transport Department",
            DepartmentId::Municipal => "Municipal Corporation",
            DepartmentId::WaterSupply => "Water Supply Department",
            DepartmentId::Police => "Police Department",
            DepartmentId::Environment => "Environment Department",
        }
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a department name is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDepartment(pub String);

impl fmt::Display for UnknownDepartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown department '{}'", self.0)
    }
}

impl std::error::Error for UnknownDepartment {}

impl FromStr for DepartmentId {
    type Err = UnknownDepartment;

    /// Accepts either the id (`WaterSupply`) or the display name
    /// (`Water Supply Department`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        DepartmentId::ALL
            .iter()
            .copied()
            .find(|d| {
                d.as_str().eq_ignore_ascii_case(needle)
                    || d.display_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownDepartment(s.to_string()))
    }
}

impl TryFrom<String> for DepartmentId {
    type Error = UnknownDepartment;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One row of the keyword dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub term: String,
    pub department: DepartmentId,
    pub weight: i32,
}

impl KeywordEntry {
    pub fn new(term: impl Into<String>, department: DepartmentId, weight: i32) -> Self {
        Self {
            term: term.into(),
            department,
            weight,
        }
    }
}

/// Per-call accumulation of department scores and the terms that produced them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    scores: BTreeMap<DepartmentId, u32>,
    matched_terms: Vec<String>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a matched entry to its department
    pub fn record(&mut self, entry: &KeywordEntry) {
        *self.scores.entry(entry.department).or_insert(0) += entry.weight.max(0) as u32;
        self.matched_terms.push(entry.term.clone());
    }

    pub fn score(&self, department: DepartmentId) -> u32 {
        self.scores.get(&department).copied().unwrap_or(0)
    }

    /// Scores in tie-break order
    pub fn iter(&self) -> impl Iterator<Item = (DepartmentId, u32)> + '_ {
        self.scores.iter().map(|(d, s)| (*d, *s))
    }

    pub fn matched_terms(&self) -> &[String] {
        &self.matched_terms
    }

    /// True when no department has a positive score
    pub fn is_empty(&self) -> bool {
        self.scores.values().all(|&s| s == 0)
    }

    pub fn into_matched_terms(self) -> Vec<String> {
        self.matched_terms
    }
}

/// Suggested department for a grievance text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub department: DepartmentId,
    pub confidence: f64,
    pub matched_terms: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_parse_accepts_id_and_display_name() {
        assert_eq!(
            "WaterSupply".parse::<DepartmentId>(),
            Ok(DepartmentId::WaterSupply)
        );
        assert_eq!(
            "public works department (pwd)".parse::<DepartmentId>(),
            Ok(DepartmentId::PublicWorks)
        );
        assert_eq!(
            " Municipal Corporation ".parse::<DepartmentId>(),
            Ok(DepartmentId::Municipal)
        );
        assert!("Fire Brigade".parse::<DepartmentId>().is_err());
    }

    #[test]
    fn test_department_order_matches_all() {
        let mut sorted = DepartmentId::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, DepartmentId::ALL.to_vec());
    }

    #[test]
    fn test_scoreboard_accumulates() {
        let mut board = ScoreBoard::new();
        assert!(board.is_empty());

        board.record(&KeywordEntry::new("light", DepartmentId::Electricity, 1));
        board.record(&KeywordEntry::new("street light", DepartmentId::Electricity, 2));
        board.record(&KeywordEntry::new("street", DepartmentId::PublicWorks, 1));

        assert!(!board.is_empty());
        assert_eq!(board.score(DepartmentId::Electricity), 3);
        assert_eq!(board.score(DepartmentId::PublicWorks), 1);
        assert_eq!(board.score(DepartmentId::Police), 0);
        assert_eq!(board.matched_terms(), ["light", "street light", "street"]);
    }

    #[test]
    fn test_suggestion_serialization() {
        let suggestion = Suggestion {
            department: DepartmentId::Transport,
            confidence: 0.6,
            matched_terms: vec!["traffic".to_string()],
        };
        let json = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(json["department"], "Transport");
        assert_eq!(json["matched_terms"][0], "traffic");

        let back: Suggestion = serde_json::from_value(json).unwrap();
        assert_eq!(back, suggestion);
    }

    #[test]
    fn test_department_deserializes_from_display_name() {
        let dept: DepartmentId = serde_json::from_str("\"Police Department\"").unwrap();
        assert_eq!(dept, DepartmentId::Police);
        assert!(serde_json::from_str::<DepartmentId>("\"Fire\"").is_err());
    }
}
