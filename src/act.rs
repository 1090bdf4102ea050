//! ACT composite without the science section: the rounded mean of the three
//! remaining subject scores. Mirrors how composites are recomputed for the
//! science-optional ACT.

/// Subjects are clamped to the 1..=36 reporting scale before averaging.
pub fn act_composite(english: u32, math: u32, reading: u32) -> u32 {
    let e = clamp_subject(english);
    let m = clamp_subject(math);
    let r = clamp_subject(reading);
    ((e + m + r) as f64 / 3.0).round() as u32
}

fn clamp_subject(v: u32) -> u32 {
    v.clamp(1, 36)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_subjects_pass_through() {
        for n in [1, 12, 24, 36] {
            assert_eq!(act_composite(n, n, n), n);
        }
    }

    #[test]
    fn mean_rounds_to_nearest() {
        // 79/3 = 26.33 down, 80/3 = 26.67 up
        assert_eq!(act_composite(25, 26, 28), 26);
        assert_eq!(act_composite(25, 26, 29), 27);
    }

    #[test]
    fn subjects_are_clamped_before_averaging() {
        // 0 -> 1 and 99 -> 36, so (1 + 36 + 20) / 3 = 19
        assert_eq!(act_composite(0, 99, 20), 19);
    }

    #[test]
    fn composite_stays_on_the_reporting_scale() {
        for e in [0, 1, 18, 36, 99] {
            for m in [0, 1, 18, 36, 99] {
                for r in [0, 1, 18, 36, 99] {
                    let c = act_composite(e, m, r);
                    assert!((1..=36).contains(&c));
                }
            }
        }
    }
}
