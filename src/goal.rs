//! Score goal tracking: a saved target score (optionally tied to a dream
//! school), progress math over the 400-anchored composite span, and
//! deterministic study suggestions bucketed by the remaining gap.
//! Persistence goes through the storage capability under the goal key.

use serde::{Deserialize, Serialize};

use crate::storage::{ScoreStore, GOAL_KEY};

/// A saved target, clamped to the 400..=1600 composite range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalState {
    pub target_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_college: Option<String>,
}

impl GoalState {
    pub fn new(target_score: u32, target_college: Option<String>) -> Self {
        Self {
            target_score: target_score.clamp(400, 1600),
            target_college,
        }
    }

    /// Build a goal from a popular-college target, when the name is known.
    pub fn for_college(name: &str) -> Option<Self> {
        target_for(name).map(|c| Self::new(c.avg, Some(c.name.to_string())))
    }
}

/// Progress of a current total toward a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub target_score: u32,
    pub current_total: u32,
    /// Percent of the 400-anchored span covered, rounded, 0..=100.
    pub percent: u32,
    pub points_to_go: u32,
    pub reached: bool,
}

impl GoalProgress {
    pub fn evaluate(goal: &GoalState, current_total: u32) -> Self {
        let target = goal.target_score;
        let points_to_go = target.saturating_sub(current_total);
        let reached = points_to_go == 0;
        // 400 is the composite floor, so the span below it carries no signal.
        let percent = if target <= 400 {
            if reached {
                100.0
            } else {
                0.0
            }
        } else {
            ((current_total as f64 - 400.0) / (target as f64 - 400.0) * 100.0).clamp(0.0, 100.0)
        };
        Self {
            target_score: target,
            current_total,
            percent: percent.round() as u32,
            points_to_go,
            reached,
        }
    }
}

/// Average admitted SAT total for goal auto-fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollegeTarget {
    pub name: &'static str,
    pub avg: u32,
}

const POPULAR_TARGETS: &[CollegeTarget] = &[
    CollegeTarget { name: "MIT", avg: 1550 },
    CollegeTarget { name: "Harvard", avg: 1540 },
    CollegeTarget { name: "Stanford", avg: 1535 },
    CollegeTarget { name: "Yale", avg: 1525 },
    CollegeTarget { name: "Princeton", avg: 1535 },
    CollegeTarget { name: "Columbia", avg: 1525 },
    CollegeTarget { name: "Duke", avg: 1515 },
    CollegeTarget { name: "Northwestern", avg: 1505 },
    CollegeTarget { name: "UCLA", avg: 1450 },
    CollegeTarget { name: "UC Berkeley", avg: 1430 },
    CollegeTarget { name: "NYU", avg: 1445 },
    CollegeTarget { name: "University of Michigan", avg: 1440 },
    CollegeTarget { name: "Georgia Tech", avg: 1440 },
    CollegeTarget { name: "University of Virginia", avg: 1435 },
    CollegeTarget { name: "Boston University", avg: 1430 },
    CollegeTarget { name: "University of Florida", avg: 1385 },
    CollegeTarget { name: "UT Austin", avg: 1350 },
    CollegeTarget { name: "Ohio State", avg: 1320 },
    CollegeTarget { name: "Penn State", avg: 1275 },
    CollegeTarget { name: "Arizona State", avg: 1195 },
];

/// Popular-college target table, for goal auto-fill pickers.
pub fn popular_targets() -> &'static [CollegeTarget] {
    POPULAR_TARGETS
}

/// Case-insensitive lookup by college name.
pub fn target_for(name: &str) -> Option<CollegeTarget> {
    let q = name.trim();
    POPULAR_TARGETS
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(q))
        .copied()
}

/// Deterministic advice lines for a positive gap; empty once the goal is met.
/// Buckets: fine-tuning (<=50), one weak section (51..=150), full rebuild
/// (>150), plus the high-frequency tip above 100 and the always-on weekly
/// practice line.
pub fn study_suggestions(gap: u32) -> Vec<&'static str> {
    if gap == 0 {
        return Vec::new();
    }
    let mut tips = Vec::new();
    if gap <= 50 {
        tips.push("Focus on eliminating careless errors - review missed questions carefully.");
    }
    if gap > 50 && gap <= 150 {
        tips.push("Target your weaker section (R&W or Math) for the biggest gains.");
    }
    if gap > 150 {
        tips.push("Create a structured study plan covering both sections systematically.");
    }
    tips.push("Take timed practice tests weekly to build stamina and accuracy.");
    if gap > 100 {
        tips.push("Consider focusing on high-frequency question types first for quick wins.");
    }
    tips
}

/// Persist the goal under the goal key.
pub async fn save_goal(store: &dyn ScoreStore, goal: &GoalState) -> anyhow::Result<()> {
    store.set(GOAL_KEY, &serde_json::to_string(goal)?).await
}

/// Load the saved goal. Corrupt stored state reads as no goal.
pub async fn load_goal(store: &dyn ScoreStore) -> anyhow::Result<Option<GoalState>> {
    match store.get(GOAL_KEY).await? {
        Some(json) => Ok(serde_json::from_str(&json).ok()),
        None => Ok(None),
    }
}

pub async fn clear_goal(store: &dyn ScoreStore) -> anyhow::Result<()> {
    store.remove(GOAL_KEY).await
}
