// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod act;
pub mod api;
pub mod baselines;
pub mod calibration;
pub mod colleges;
pub mod concordance;
pub mod goal;
pub mod history;
pub mod metrics;
pub mod psat;
pub mod report;
pub mod score;
pub mod scorer;
pub mod storage;
pub mod superscore;

// ---- Re-exports for stable public API ----
// Router entrypoint: `sat_score_estimator::api::router` or `sat_score_estimator::router`
pub use crate::api::router;

// Core value objects, so callers can score without digging through modules
pub use crate::score::{CompositeScore, Difficulty, ScoreError, SectionScore, TestSheet};
pub use crate::scorer::{score_section, score_test};
