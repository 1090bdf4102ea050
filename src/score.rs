//! score.rs — value objects for section and composite score estimates.
//!
//! Goal: one standardized output shape for scaled score + confidence range +
//! percentile, so the aggregators (superscore, tiers, journal) and the API all
//! speak the same types. All of these are plain data; the curve math lives in
//! `scorer.rs`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which second-module difficulty track the test-taker was routed into.
/// `Unknown` applies no curve adjustment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Hard,
    #[default]
    Unknown,
}

/// Test section of the digital SAT. Two timed modules per section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    ReadingWriting,
    Math,
}

impl Section {
    /// Raw questions per module (27 for Reading & Writing, 22 for Math).
    pub fn module_max(self) -> u32 {
        match self {
            Section::ReadingWriting => 27,
            Section::Math => 22,
        }
    }
}

/// Reporting scale for one section family. The SAT reports 200..=800; the
/// PSAT narrows to 160..=760 over the same 600-point span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub floor: u32,
    pub span: u32,
    pub ceiling: u32,
}

pub const SAT_SCALE: Scale = Scale {
    floor: 200,
    span: 600,
    ceiling: 800,
};

pub const PSAT_SCALE: Scale = Scale {
    floor: 160,
    span: 600,
    ceiling: 760,
};

/// Confidence interval around a scaled score, both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub low: u32,
    pub high: u32,
}

impl ScoreRange {
    pub fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: u32) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Estimate for one section: raw correct total, scaled score (multiple of 10),
/// asymmetric confidence range and a percentile guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionScore {
    pub raw: u32,
    pub scaled: u32,
    pub range: ScoreRange,
    pub percentile: u32,
}

/// Full-test estimate: both sections plus the derived total and total range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub rw: SectionScore,
    pub math: SectionScore,
    pub total: u32,
    pub total_range: ScoreRange,
}

impl CompositeScore {
    /// Mean of the two section percentiles, rounded. Used by the share text;
    /// not an official composite percentile.
    pub fn mean_percentile(&self) -> u32 {
        ((self.rw.percentile + self.math.percentile) as f64 / 2.0).round() as u32
    }
}

/// One full answer sheet: raw correct counts per module plus routing info.
/// This is the input shape the API accepts for `/score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSheet {
    pub rw_m1: u32,
    pub rw_m2: u32,
    pub math_m1: u32,
    pub math_m2: u32,
    #[serde(default)]
    pub rw_difficulty: Difficulty,
    #[serde(default)]
    pub math_difficulty: Difficulty,
}

/// Recoverable domain errors. Out-of-range raw counts are clamped, not
/// reported; these cover the aggregation contracts that genuinely cannot
/// produce a meaningful value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("superscore needs at least 2 attempts, got {got}")]
    InsufficientAttempts { got: usize },
    #[error("institution table is empty")]
    EmptyInstitutionTable,
}
