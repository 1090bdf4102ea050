//! Published scoring-curve baselines. Each baseline names a released
//! practice form and the raw maxima its curve was fit against; id 0 is the
//! aggregated estimate and doubles as the fallback for unknown ids.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurveBaseline {
    pub id: u32,
    pub name: &'static str,
    pub rw_max: u32,
    pub math_max: u32,
}

impl CurveBaseline {
    /// Per-module raw maximum for Reading & Writing.
    pub fn rw_module_max(&self) -> u32 {
        self.rw_max / 2
    }

    /// Per-module raw maximum for Math.
    pub fn math_module_max(&self) -> u32 {
        self.math_max / 2
    }
}

const BASELINES: &[CurveBaseline] = &[
    CurveBaseline { id: 1, name: "Bluebook Practice Test 1", rw_max: 54, math_max: 44 },
    CurveBaseline { id: 2, name: "Bluebook Practice Test 2", rw_max: 54, math_max: 44 },
    CurveBaseline { id: 3, name: "Bluebook Practice Test 3", rw_max: 54, math_max: 44 },
    CurveBaseline { id: 4, name: "Bluebook Practice Test 4", rw_max: 54, math_max: 44 },
    CurveBaseline { id: 5, name: "Bluebook Practice Test 5", rw_max: 54, math_max: 44 },
    CurveBaseline { id: 6, name: "Bluebook Practice Test 6", rw_max: 54, math_max: 44 },
    CurveBaseline { id: 0, name: "General Estimate (Aggregated)", rw_max: 54, math_max: 44 },
];

pub fn all() -> &'static [CurveBaseline] {
    BASELINES
}

/// The id-0 aggregated estimate.
pub fn aggregated() -> &'static CurveBaseline {
    BASELINES
        .iter()
        .find(|b| b.id == 0)
        .unwrap_or(&BASELINES[0])
}

/// Baseline by id, falling back to the aggregated estimate.
pub fn find(id: u32) -> &'static CurveBaseline {
    BASELINES.iter().find(|b| b.id == id).unwrap_or_else(aggregated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_six_forms_plus_aggregate() {
        assert_eq!(all().len(), 7);
        assert_eq!(all().iter().filter(|b| b.id == 0).count(), 1);
    }

    #[test]
    fn lookup_hits_and_falls_back() {
        assert_eq!(find(3).name, "Bluebook Practice Test 3");
        assert_eq!(find(0).name, "General Estimate (Aggregated)");
        assert_eq!(find(99).id, 0);
    }

    #[test]
    fn module_maxima_halve_the_section_maxima() {
        for b in all() {
            assert_eq!(b.rw_module_max(), 27);
            assert_eq!(b.math_module_max(), 22);
        }
    }
}
