//! # College Match
//!
//! The institution score-range table and the tier classifier: a composite
//! total measured against each institution's middle-50% admitted-student SAT
//! range.
//!
//! - Loads from a JSON file (bare array of institutions).
//! - Includes a built-in `default_seed()` with 30 popular institutions.
//! - Case-insensitive name lookup with normalization of punctuation/dashes.
//! - Fallback order: exact match → substring match → fuzzy match → miss.
//! - Classification preserves table order; grouping splits by tier.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use strsim::normalized_levenshtein;

use crate::score::ScoreError;

pub const DEFAULT_INSTITUTIONS_PATH: &str = "config/institutions.json";
pub const ENV_INSTITUTIONS_PATH: &str = "INSTITUTIONS_PATH";

// Similarity floor for the fuzzy name fallback (normalized Levenshtein).
const FUZZY_MATCH_THRESHOLD: f64 = 0.8;

/// Admission tier of one institution at a given composite total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Safety,
    Target,
    Reach,
}

/// One institution with the middle-50% SAT range of admitted students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionRange {
    pub name: String,
    /// 25th percentile of admitted-student SAT totals.
    pub sat25: u32,
    /// 75th percentile of admitted-student SAT totals.
    pub sat75: u32,
}

impl InstitutionRange {
    /// Above the 75th percentile reads safety, inside the middle 50% target,
    /// below the 25th percentile reach.
    pub fn tier_for(&self, total: u32) -> Tier {
        if total >= self.sat75 {
            Tier::Safety
        } else if total >= self.sat25 {
            Tier::Target
        } else {
            Tier::Reach
        }
    }
}

/// One classified institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeMatch {
    pub institution: InstitutionRange,
    pub tier: Tier,
}

/// Classification split by tier, for presentation layers that render the
/// groups separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TierGroups {
    pub safety: Vec<InstitutionRange>,
    pub target: Vec<InstitutionRange>,
    pub reach: Vec<InstitutionRange>,
}

impl TierGroups {
    pub fn from_matches(matches: Vec<CollegeMatch>) -> Self {
        let mut groups = Self::default();
        for m in matches {
            match m.tier {
                Tier::Safety => groups.safety.push(m.institution),
                Tier::Target => groups.target.push(m.institution),
                Tier::Reach => groups.reach.push(m.institution),
            }
        }
        groups
    }
}

/// The institution reference table. Never mutated in place; reloads swap the
/// whole table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstitutionTable {
    institutions: Vec<InstitutionRange>,
}

impl Default for InstitutionTable {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl InstitutionTable {
    /// Load the table from a JSON file (bare array of institutions).
    /// Falls back to `default_seed()` on error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|_| Self::default_seed()),
            Err(_) => Self::default_seed(),
        }
    }

    /// Load from INSTITUTIONS_PATH (or the default path), seed on any error.
    pub fn load() -> Self {
        Self::load_from_file(config_path())
    }

    pub fn institutions(&self) -> &[InstitutionRange] {
        &self.institutions
    }

    pub fn len(&self) -> usize {
        self.institutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.institutions.is_empty()
    }

    /// Classify every institution against `total`, preserving table order.
    /// An empty table cannot produce a meaningful answer and is an error.
    pub fn classify(&self, total: u32) -> Result<Vec<CollegeMatch>, ScoreError> {
        if self.institutions.is_empty() {
            return Err(ScoreError::EmptyInstitutionTable);
        }
        Ok(self
            .institutions
            .iter()
            .map(|c| CollegeMatch {
                tier: c.tier_for(total),
                institution: c.clone(),
            })
            .collect())
    }

    /// Classify and split by tier.
    pub fn grouped(&self, total: u32) -> Result<TierGroups, ScoreError> {
        self.classify(total).map(TierGroups::from_matches)
    }

    /// Find an institution by name.
    ///
    /// Steps:
    /// 1. Exact match on the normalized name.
    /// 2. Substring match (e.g. "Michigan" → "University of Michigan").
    /// 3. Fuzzy match for near-miss spellings.
    pub fn find(&self, name: &str) -> Option<&InstitutionRange> {
        let q = normalize(name);
        if q.is_empty() {
            return None;
        }

        if let Some(c) = self
            .institutions
            .iter()
            .find(|c| normalize(&c.name) == q)
        {
            return Some(c);
        }

        if let Some(c) = self
            .institutions
            .iter()
            .find(|c| normalize(&c.name).contains(&q))
        {
            return Some(c);
        }

        let mut best: Option<(&InstitutionRange, f64)> = None;
        for c in &self.institutions {
            let sim = normalized_levenshtein(&normalize(&c.name), &q);
            if sim >= FUZZY_MATCH_THRESHOLD && best.map_or(true, |(_, b)| sim > b) {
                best = Some((c, sim));
            }
        }
        best.map(|(c, _)| c)
    }

    /// Built-in seed: 30 popular institutions with approximate middle-50%
    /// ranges from recent admissions cycles. Used as fallback if no config
    /// file is found.
    pub(crate) fn default_seed() -> Self {
        let institutions = [
            ("MIT", 1520, 1580),
            ("Harvard University", 1500, 1580),
            ("Stanford University", 1500, 1570),
            ("Yale University", 1490, 1560),
            ("Princeton University", 1500, 1570),
            ("Columbia University", 1490, 1560),
            ("University of Chicago", 1500, 1570),
            ("Duke University", 1470, 1560),
            ("Northwestern University", 1460, 1550),
            ("Johns Hopkins University", 1470, 1560),
            ("Rice University", 1460, 1560),
            ("Vanderbilt University", 1460, 1550),
            ("Carnegie Mellon University", 1440, 1560),
            ("Georgetown University", 1410, 1530),
            ("UCLA", 1370, 1530),
            ("University of Michigan", 1360, 1520),
            ("NYU", 1370, 1520),
            ("UC Berkeley", 1340, 1520),
            ("Boston University", 1350, 1510),
            ("University of Virginia", 1360, 1510),
            ("Georgia Tech", 1370, 1510),
            ("University of Florida", 1300, 1470),
            ("University of Texas at Austin", 1230, 1470),
            ("Ohio State University", 1220, 1420),
            ("Penn State University", 1180, 1370),
            ("University of Arizona", 1100, 1320),
            ("Arizona State University", 1080, 1310),
            ("Michigan State University", 1100, 1300),
            ("University of Oregon", 1080, 1290),
            ("University of Kansas", 1040, 1270),
        ]
        .into_iter()
        .map(|(name, sat25, sat75)| InstitutionRange {
            name: name.to_string(),
            sat25,
            sat75,
        })
        .collect();

        Self { institutions }
    }
}

pub fn config_path() -> PathBuf {
    std::env::var(ENV_INSTITUTIONS_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_INSTITUTIONS_PATH))
}

/// Normalize input string: lowercase, replace punctuation/dashes with spaces,
/// collapse multiple spaces into one.
fn normalize(s: &str) -> String {
    let mut out = s.trim().to_ascii_lowercase();

    for ch in ['—', '–', '-', '_', '/', '\\'] {
        out = out.replace(ch, " ");
    }

    out = out.replace(['\n', '\r', '\t', '.', ',', '‚', '’', '\''], " ");

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
