//! ACT/SAT concordance: the official cross-walk between ACT composite and
//! SAT total, embedded as JSON and parsed once. Exact in the ACT→SAT
//! direction, nearest-neighbor in the SAT→ACT direction.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One row of the cross-walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcordanceEntry {
    pub act: u32,
    pub sat: u32,
}

// Table is descending by ACT composite; sat_to_act's tie break relies on
// that order.
static TABLE: Lazy<Vec<ConcordanceEntry>> = Lazy::new(|| {
    let raw = include_str!("../concordance.json");
    serde_json::from_str::<Vec<ConcordanceEntry>>(raw).expect("valid concordance table")
});

/// Full table, descending by ACT composite.
pub fn table() -> &'static [ConcordanceEntry] {
    &TABLE
}

/// Exact lookup. `None` when the ACT composite is outside the tabulated
/// 11..=36.
pub fn act_to_sat(act: u32) -> Option<u32> {
    TABLE.iter().find(|e| e.act == act).map(|e| e.sat)
}

/// Nearest tabulated SAT total wins; an exact midpoint resolves to the
/// first-encountered entry, i.e. the higher ACT composite.
pub fn sat_to_act(sat: u32) -> u32 {
    let mut best = TABLE[0];
    let mut best_diff = best.sat.abs_diff(sat);
    for e in TABLE.iter().skip(1) {
        let diff = e.sat.abs_diff(sat);
        if diff < best_diff {
            best = *e;
            best_diff = diff;
        }
    }
    best.act
}
