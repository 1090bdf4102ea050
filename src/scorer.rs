//! # Section Scorer
//! Pure, testable logic that maps raw module counts → scaled section scores.
//! No I/O, suitable for unit tests and offline calibration sweeps.
//!
//! Policy: linear multiplier over the raw total, adjusted for the adaptive
//! second-module track (easy top-scorers are penalized, hard tracks get a
//! bonus), clamped to the reporting scale and reported in steps of 10 with an
//! asymmetric confidence range and a sigmoid percentile estimate.

use crate::calibration::CurveCalibration;
use crate::score::{
    CompositeScore, Difficulty, Scale, ScoreRange, Section, SectionScore, TestSheet, SAT_SCALE,
};

/// Score one SAT section from its two module raw counts.
/// Out-of-range counts are clamped to `[0, module_max]`, never rejected.
pub fn score_section(
    m1: u32,
    m2: u32,
    difficulty: Difficulty,
    section: Section,
    cal: &CurveCalibration,
) -> SectionScore {
    score_on_scale(m1, m2, difficulty, section.module_max(), SAT_SCALE, cal)
}

/// Scale-generalized scorer. The PSAT adapter reuses this with its narrower
/// scale; everything else goes through [`score_section`].
pub fn score_on_scale(
    m1: u32,
    m2: u32,
    difficulty: Difficulty,
    module_max: u32,
    scale: Scale,
    cal: &CurveCalibration,
) -> SectionScore {
    // 1) Clamp raw inputs per module.
    let m1 = m1.min(module_max);
    let m2 = m2.min(module_max);
    let raw_total = m1 + m2;
    let total_max = module_max * 2;

    // 2) Base linear multiplier: the scale span spread over the raw maximum.
    let mut multiplier = scale.span as f64 / total_max as f64;

    // 3) Adaptive-track adjustment. The easy penalty keys off the FIRST
    //    module alone: a strong module 1 routed to an easy module 2 means the
    //    raw total overstates ability.
    match difficulty {
        Difficulty::Easy => {
            if m1 as f64 > cal.easy_penalty_threshold * module_max as f64 {
                multiplier *= cal.easy_penalty_multiplier;
            }
        }
        Difficulty::Hard => {
            multiplier *= cal.hard_bonus_multiplier;
        }
        Difficulty::Unknown => {}
    }

    // 4) Scale, clamp, report in steps of 10.
    let scaled_raw = scale.floor as f64 + raw_total as f64 * multiplier;
    let clamped = scaled_raw
        .round()
        .clamp(scale.floor as f64, scale.ceiling as f64);
    let scaled = round_to_10(clamped);

    // 5) Asymmetric confidence range, clamped to the scale.
    let range = ScoreRange::new(
        scaled.saturating_sub(cal.range_down).max(scale.floor),
        (scaled + cal.range_up).min(scale.ceiling),
    );

    SectionScore {
        raw: raw_total,
        scaled,
        range,
        percentile: percentile_for(scaled, cal),
    }
}

/// Combine two section estimates into the composite total.
pub fn score_composite(rw: SectionScore, math: SectionScore) -> CompositeScore {
    let ceiling = SAT_SCALE.ceiling * 2;
    let total = rw.scaled + math.scaled;
    let total_range = ScoreRange::new(
        rw.range.low + math.range.low,
        (rw.range.high + math.range.high).min(ceiling),
    );
    CompositeScore {
        rw,
        math,
        total,
        total_range,
    }
}

/// Score a full answer sheet with the standard digital-SAT module maxima.
pub fn score_test(sheet: &TestSheet, cal: &CurveCalibration) -> CompositeScore {
    score_test_with_maxima(
        sheet,
        Section::ReadingWriting.module_max(),
        Section::Math.module_max(),
        cal,
    )
}

/// Score a full answer sheet against explicit per-module maxima. Curve
/// baselines carry section totals; callers halve them per module.
pub fn score_test_with_maxima(
    sheet: &TestSheet,
    rw_module_max: u32,
    math_module_max: u32,
    cal: &CurveCalibration,
) -> CompositeScore {
    let rw = score_on_scale(
        sheet.rw_m1,
        sheet.rw_m2,
        sheet.rw_difficulty,
        rw_module_max,
        SAT_SCALE,
        cal,
    );
    let math = score_on_scale(
        sheet.math_m1,
        sheet.math_m2,
        sheet.math_difficulty,
        math_module_max,
        SAT_SCALE,
        cal,
    );
    score_composite(rw, math)
}

/// Nearest multiple of 10. Input is already clamped to the scale, whose
/// bounds are themselves multiples of 10.
fn round_to_10(x: f64) -> u32 {
    ((x / 10.0).round() * 10.0) as u32
}

/// Logistic percentile estimate, clamped to the reportable 1..=99.
fn percentile_for(scaled: u32, cal: &CurveCalibration) -> u32 {
    let exponent = -cal.percentile_k * (scaled as f64 - cal.percentile_mid);
    let p = (100.0 / (1.0 + exponent.exp())).round();
    p.clamp(1.0, 99.0) as u32
}
