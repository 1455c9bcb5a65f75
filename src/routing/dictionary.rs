//! Keyword dictionary mapping civic terms to departments

use super::models::{DepartmentId, KeywordEntry};
use crate::error::{Result, RouterError};
use std::collections::HashSet;
use tracing::debug;

/// Weight of a single-word term
pub const SINGLE_WORD_WEIGHT: i32 = 1;
/// Multi-word terms count double so "street light" beats the "light" inside it
pub const MULTI_WORD_WEIGHT: i32 = 2 * SINGLE_WORD_WEIGHT;
/// Phrases describing an immediate electrical danger
pub const HAZARD_WEIGHT: i32 = 3 * SINGLE_WORD_WEIGHT;

const HAZARD_TERMS: &[&str] = &[
    "electrical hazard",
    "fallen pole",
    "broken wire",
    "exposed wire",
    "electrical emergency",
];

use DepartmentId::*;

const BUILTIN_TERMS: &[(&str, DepartmentId)] = &[
    // Roads, bridges, footpaths
    ("pothole", PublicWorks),
    ("road", PublicWorks),
    ("street", PublicWorks),
    ("bridge", PublicWorks),
    ("sidewalk", PublicWorks),
    ("footpath", PublicWorks),
    ("pavement", PublicWorks),
    ("asphalt", PublicWorks),
    ("concrete", PublicWorks),
    ("construction", PublicWorks),
    ("repair", PublicWorks),
    ("damage", PublicWorks),
    // Power, lighting, overhead lines
    ("light", Electricity),
    ("street light", Electricity),
    ("lamp", Electricity),
    ("power", Electricity),
    ("electricity", Electricity),
    ("electrical", Electricity),
    ("wire", Electricity),
    ("cable", Electricity),
    ("pole", Electricity),
    ("utility pole", Electricity),
    ("transformer", Electricity),
    ("fuse", Electricity),
    ("outage", Electricity),
    ("blackout", Electricity),
    ("voltage", Electricity),
    ("electrical hazard", Electricity),
    ("fallen pole", Electricity),
    ("broken wire", Electricity),
    ("exposed wire", Electricity),
    ("electrical emergency", Electricity),
    ("tangled", Electricity),
    ("hanging", Electricity),
    ("dangerous", Electricity),
    ("hazard", Electricity),
    ("infrastructure", Electricity),
    ("utility", Electricity),
    ("power line", Electricity),
    ("electrical line", Electricity),
    ("overhead", Electricity),
    ("downed", Electricity),
    // Traffic, signals, parking
    ("traffic", Transport),
    ("signal", Transport),
    ("parking", Transport),
    ("bus stop", Transport),
    ("traffic light", Transport),
    ("road sign", Transport),
    ("speed bump", Transport),
    ("zebra crossing", Transport),
    ("traffic jam", Transport),
    ("vehicle", Transport),
    // Sanitation and general civic issues
    ("garbage", Municipal),
    ("trash", Municipal),
    ("waste", Municipal),
    ("drainage", Municipal),
    ("sewer", Municipal),
    ("drain", Municipal),
    ("cleaning", Municipal),
    ("sanitation", Municipal),
    ("public toilet", Municipal),
    ("community", Municipal),
    ("civic", Municipal),
    ("municipal", Municipal),
    // Water, pipes, leaks
    ("water", WaterSupply),
    ("pipe", WaterSupply),
    ("leak", WaterSupply),
    ("supply", WaterSupply),
    ("tank", WaterSupply),
    ("pump", WaterSupply),
    ("valve", WaterSupply),
    ("faucet", WaterSupply),
    ("tap", WaterSupply),
    ("shortage", WaterSupply),
    ("pressure", WaterSupply),
    // Safety, accidents, emergencies
    ("accident", Police),
    ("safety", Police),
    ("emergency", Police),
    ("crime", Police),
    ("theft", Police),
    ("vandalism", Police),
    ("security", Police),
    ("crowd", Police),
    ("disturbance", Police),
    ("fight", Police),
    ("noise", Police),
    // Pollution, trees, parks
    ("pollution", Environment),
    ("tree", Environment),
    ("park", Environment),
    ("garden", Environment),
    ("air", Environment),
    ("noise pollution", Environment),
    ("air pollution", Environment),
    ("green", Environment),
    ("plant", Environment),
    ("wildlife", Environment),
];

/// Base weight for a term under the dictionary convention
pub fn conventional_weight(term: &str) -> i32 {
    if HAZARD_TERMS.contains(&term) {
        HAZARD_WEIGHT
    } else if term.contains(' ') {
        MULTI_WORD_WEIGHT
    } else {
        SINGLE_WORD_WEIGHT
    }
}

/// Built-in keyword table with conventional weights
pub fn builtin_entries() -> Vec<KeywordEntry> {
    BUILTIN_TERMS
        .iter()
        .map(|(term, dept)| KeywordEntry::new(*term, *dept, conventional_weight(term)))
        .collect()
}

/// Validated, read-only keyword table
#[derive(Debug, Clone)]
pub struct KeywordDictionary {
    entries: Vec<KeywordEntry>,
}

impl KeywordDictionary {
    /// Build a dictionary, normalizing terms to trimmed lowercase.
    ///
    /// Fails with a configuration error on an empty term, a weight of zero or
    /// less, or a term registered twice for the same department.
    pub fn new(entries: Vec<KeywordEntry>) -> Result<Self> {
        let mut seen: HashSet<(String, DepartmentId)> = HashSet::new();
        let mut normalized = Vec::with_capacity(entries.len());

        for entry in entries {
            let term = entry.term.trim().to_lowercase();

            if term.is_empty() {
                return Err(RouterError::Configuration(format!(
                    "keyword for {} has an empty term",
                    entry.department
                )));
            }

            if entry.weight <= 0 {
                return Err(RouterError::Configuration(format!(
                    "keyword '{}' for {} has non-positive weight {}",
                    term, entry.department, entry.weight
                )));
            }

            if !seen.insert((term.clone(), entry.department)) {
                return Err(RouterError::Configuration(format!(
                    "keyword '{}' registered twice for {}",
                    term, entry.department
                )));
            }

            normalized.push(KeywordEntry {
                term,
                department: entry.department,
                weight: entry.weight,
            });
        }

        debug!("Keyword dictionary loaded: {} entries", normalized.len());

        Ok(Self {
            entries: normalized,
        })
    }

    /// The built-in table
    pub fn builtin() -> Result<Self> {
        Self::new(builtin_entries())
    }

    /// The built-in table followed by deployment-specific entries
    pub fn with_extra(extra: Vec<KeywordEntry>) -> Result<Self> {
        let mut entries = builtin_entries();
        entries.extend(extra);
        Self::new(entries)
    }

    /// Entries in scan order
    pub fn lookup(&self) -> &[KeywordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
