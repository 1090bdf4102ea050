//! Superscore aggregation: the best-of-each-section combination across
//! several sittings, and how much it gains over the best single sitting.
//! Pure logic, no I/O.

use serde::{Deserialize, Serialize};

use crate::score::ScoreError;

/// One recorded sitting, section scores on the 200..=800 reporting scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    #[serde(default)]
    pub label: String,
    pub rw: u32,
    pub math: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Superscore {
    pub best_rw: u32,
    pub best_math: u32,
    pub super_total: u32,
    pub best_single_sitting_total: u32,
    /// `super_total - best_single_sitting_total`, non-negative by
    /// construction.
    pub improvement: u32,
}

/// Aggregate at least two attempts. Section maxima are independent; a
/// superscore built from one sitting is meaningless, so fewer than two
/// attempts is an error, not a degenerate result.
pub fn superscore(attempts: &[Attempt]) -> Result<Superscore, ScoreError> {
    if attempts.len() < 2 {
        return Err(ScoreError::InsufficientAttempts {
            got: attempts.len(),
        });
    }

    let mut best_rw = 0;
    let mut best_math = 0;
    let mut best_single = 0;
    for a in attempts {
        let rw = normalize_section(a.rw);
        let math = normalize_section(a.math);
        best_rw = best_rw.max(rw);
        best_math = best_math.max(math);
        best_single = best_single.max(rw + math);
    }

    Ok(Superscore {
        best_rw,
        best_math,
        super_total: best_rw + best_math,
        best_single_sitting_total: best_single,
        improvement: (best_rw + best_math) - best_single,
    })
}

/// Reported section scores come in steps of 10; clamp to the reporting
/// scale the way the score reports themselves do, then snap. Wire values
/// are arbitrary u32s, so the clamp comes first.
fn normalize_section(v: u32) -> u32 {
    let v = v.clamp(200, 800);
    ((v + 5) / 10) * 10
}
