// tests/calibration_config.rs
// Curve calibration loading and live reconfiguration:
// - CURVE_CONFIG_PATH points load() at an arbitrary TOML file
// - missing/invalid files fall back to the built-in defaults
// - swapping the handle changes scores produced afterwards
// - the dev-gated watcher picks up file rewrites (CURVE_HOT_RELOAD=1)
// - the dev logging gate follows SCORE_DEV_LOG
//
// Tests that mutate process env are #[serial]; the rest can run in parallel.

use std::time::{Duration, Instant};
use std::{env, fs, thread};

use sat_score_estimator::calibration::{
    dev_logging_enabled, start_hot_reload_thread, CalibrationHandle, CurveCalibration,
    ENV_CURVE_CONFIG_PATH, ENV_CURVE_HOT_RELOAD,
};
use sat_score_estimator::score::{Difficulty, Section};
use sat_score_estimator::scorer::score_section;

#[test]
#[serial_test::serial]
fn env_path_overrides_default_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("curve.toml");
    fs::write(
        &path,
        r#"
[curve]
easy_penalty_multiplier = 0.5
hard_bonus_multiplier = 1.2
"#,
    )
    .unwrap();

    env::set_var(ENV_CURVE_CONFIG_PATH, path.display().to_string());
    let loaded = CurveCalibration::load();
    env::remove_var(ENV_CURVE_CONFIG_PATH);

    let cal = loaded.unwrap();
    assert!((cal.easy_penalty_multiplier - 0.5).abs() < 1e-12);
    assert!((cal.hard_bonus_multiplier - 1.2).abs() < 1e-12);
    // Knobs absent from the file keep their defaults.
    assert_eq!(cal.range_down, CurveCalibration::default().range_down);
    assert_eq!(cal.range_up, CurveCalibration::default().range_up);
}

#[test]
#[serial_test::serial]
fn missing_file_falls_back_to_defaults() {
    env::set_var(ENV_CURVE_CONFIG_PATH, "/definitely/not/here/curve.toml");
    let strict = CurveCalibration::load();
    let lenient = CurveCalibration::load_or_default();
    env::remove_var(ENV_CURVE_CONFIG_PATH);

    assert!(strict.is_err());
    assert_eq!(lenient, CurveCalibration::default());
}

#[test]
#[serial_test::serial]
fn out_of_domain_values_are_hardened_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("curve.toml");
    fs::write(
        &path,
        r#"
[curve]
easy_penalty_threshold = 7.0
hard_bonus_multiplier = -3.0
range_up = 25
"#,
    )
    .unwrap();

    env::set_var(ENV_CURVE_CONFIG_PATH, path.display().to_string());
    let cal = CurveCalibration::load().unwrap();
    env::remove_var(ENV_CURVE_CONFIG_PATH);

    let d = CurveCalibration::default();
    assert!((cal.easy_penalty_threshold - d.easy_penalty_threshold).abs() < 1e-12);
    assert!((cal.hard_bonus_multiplier - d.hard_bonus_multiplier).abs() < 1e-12);
    // In-domain values pass through untouched.
    assert_eq!(cal.range_up, 25);
}

#[test]
fn swapped_calibration_changes_live_scores() {
    let handle = CalibrationHandle::new(CurveCalibration::default());

    let before = score_section(
        20,
        18,
        Difficulty::Hard,
        Section::ReadingWriting,
        &handle.get(),
    );
    assert_eq!(before.scaled, 640);

    let mut tuned = CurveCalibration::default();
    tuned.hard_bonus_multiplier = 1.10;
    handle.swap(tuned);

    let after = score_section(
        20,
        18,
        Difficulty::Hard,
        Section::ReadingWriting,
        &handle.get(),
    );
    assert_eq!(after.scaled, 660);
}

#[test]
#[serial_test::serial]
fn dev_log_gate_follows_the_env_flag() {
    // SHUTTLE_ENV=local satisfies the dev-env half in any build profile.
    env::set_var("SHUTTLE_ENV", "local");

    env::remove_var("SCORE_DEV_LOG");
    assert!(!dev_logging_enabled(), "off when the flag is absent");

    env::set_var("SCORE_DEV_LOG", "1");
    assert!(dev_logging_enabled());

    env::set_var("SCORE_DEV_LOG", "0");
    assert!(!dev_logging_enabled(), "only '1' opts in");

    env::remove_var("SCORE_DEV_LOG");
    env::remove_var("SHUTTLE_ENV");
}

#[test]
#[serial_test::serial]
fn hot_reload_swaps_on_file_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("curve.toml");
    fs::write(&path, "[curve]\nhard_bonus_multiplier = 1.05\n").unwrap();

    env::set_var(ENV_CURVE_HOT_RELOAD, "1");
    let handle = CalibrationHandle::new(CurveCalibration::default());
    start_hot_reload_thread(handle.clone(), path.clone());
    env::remove_var(ENV_CURVE_HOT_RELOAD);

    // The watcher takes an mtime baseline on its first poll, so rewrite the
    // file each round; any write after the baseline lands within one 2s poll.
    // Writes are spaced >1s apart for coarse filesystem mtime granularity.
    let deadline = Instant::now() + Duration::from_secs(15);
    loop {
        if (handle.get().hard_bonus_multiplier - 1.25).abs() < 1e-9 {
            break;
        }
        assert!(Instant::now() < deadline, "hot reload never landed");
        thread::sleep(Duration::from_millis(1100));
        fs::write(&path, "[curve]\nhard_bonus_multiplier = 1.25\n").unwrap();
    }
}
