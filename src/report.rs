//! Plain-text score summaries. ASCII only for stable console output.

use crate::score::CompositeScore;

/// One-line share summary of a composite result.
pub fn share_text(score: &CompositeScore) -> String {
    format!(
        "My estimated Digital SAT score: {}/1600 (R&W: {}, Math: {}) - ~{}th percentile.",
        score.total,
        score.rw.scaled,
        score.math.scaled,
        score.mean_percentile()
    )
}
