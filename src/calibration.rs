// src/calibration.rs
//! Curve calibration: the tunable constants of the scoring curve, loaded from
//! TOML with env-path override, plus a thread-safe handle with dev-gated hot
//! reload. The scorer itself stays free of literals; recalibrating the curve
//! never touches the algorithm.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

// --- env defaults & names ---
pub const DEFAULT_CURVE_CONFIG_PATH: &str = "config/curve.toml";

pub const ENV_CURVE_CONFIG_PATH: &str = "CURVE_CONFIG_PATH";
pub const ENV_CURVE_HOT_RELOAD: &str = "CURVE_HOT_RELOAD";

/// Dev logging gate: SCORE_DEV_LOG=1 AND dev env (debug build or
/// SHUTTLE_ENV in {local, development, dev}).
pub fn dev_logging_enabled() -> bool {
    let on = std::env::var("SCORE_DEV_LOG").ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

// Short anonymized id for user-provided labels in logs (never log raw labels).
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Default, Deserialize)]
struct CurveRoot {
    #[serde(default)]
    curve: CurveCalibration,
}

/// Tunable constants of the section scoring curve. Missing TOML fields fall
/// back to the canonical defaults, so a partial `[curve]` table is valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveCalibration {
    /// First-module fraction above which the easy second module is penalized.
    pub easy_penalty_threshold: f64,
    /// Multiplier applied when the easy-track penalty fires.
    pub easy_penalty_multiplier: f64,
    /// Multiplier applied on the hard second-module track.
    pub hard_bonus_multiplier: f64,
    /// Down-side width of the confidence range, in scale points.
    pub range_down: u32,
    /// Up-side width of the confidence range, in scale points.
    pub range_up: u32,
    /// Steepness of the percentile sigmoid.
    pub percentile_k: f64,
    /// Scaled score at which the percentile sigmoid crosses 50.
    pub percentile_mid: f64,
}

impl Default for CurveCalibration {
    fn default() -> Self {
        Self {
            easy_penalty_threshold: 0.7,
            easy_penalty_multiplier: 0.85,
            hard_bonus_multiplier: 1.05,
            range_down: 40,
            range_up: 30,
            percentile_k: 0.015,
            percentile_mid: 500.0,
        }
    }
}

impl CurveCalibration {
    /// Parse from a TOML string and harden odd values.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let root: CurveRoot = toml::from_str(toml_str)?;
        Ok(root.curve.sanitized())
    }

    /// Load from the configured path (CURVE_CONFIG_PATH or config/curve.toml).
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();
        let content = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read curve config at {}: {}", path.display(), e)
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from file, falling back to the built-in defaults when the file is
    /// absent or invalid. The service boots either way.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cal) => {
                info!(target: "calibration", path = %config_path().display(), "curve calibration loaded");
                cal
            }
            Err(e) => {
                warn!(target: "calibration", error = %e, "using default curve calibration");
                Self::default()
            }
        }
    }

    /// Replace non-finite or out-of-domain values with the defaults so a
    /// bad TOML edit cannot wedge the scorer.
    fn sanitized(mut self) -> Self {
        let d = Self::default();
        if !self.easy_penalty_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.easy_penalty_threshold)
        {
            self.easy_penalty_threshold = d.easy_penalty_threshold;
        }
        if !self.easy_penalty_multiplier.is_finite() || self.easy_penalty_multiplier <= 0.0 {
            self.easy_penalty_multiplier = d.easy_penalty_multiplier;
        }
        if !self.hard_bonus_multiplier.is_finite() || self.hard_bonus_multiplier <= 0.0 {
            self.hard_bonus_multiplier = d.hard_bonus_multiplier;
        }
        if !self.percentile_k.is_finite() || self.percentile_k <= 0.0 {
            self.percentile_k = d.percentile_k;
        }
        if !self.percentile_mid.is_finite() {
            self.percentile_mid = d.percentile_mid;
        }
        self
    }
}

pub fn config_path() -> PathBuf {
    std::env::var(ENV_CURVE_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CURVE_CONFIG_PATH))
}

/* ----------------------------
Thread-safe handle + hot reload
---------------------------- */

/// A threadsafe handle that can hot-reload the calibration in dev/local.
/// - Enable by setting CURVE_HOT_RELOAD=1
/// - Dev-gated: active only if cfg!(debug_assertions) OR SHUTTLE_ENV is "local"/"development".
#[derive(Clone)]
pub struct CalibrationHandle {
    inner: Arc<RwLock<CurveCalibration>>,
}

impl CalibrationHandle {
    pub fn new(cal: CurveCalibration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cal)),
        }
    }

    /// Current calibration (copy). Falls back to defaults on lock poisoning.
    pub fn get(&self) -> CurveCalibration {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(_) => CurveCalibration::default(),
        }
    }

    /// Swap the whole calibration atomically.
    pub fn swap(&self, cal: CurveCalibration) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = cal;
        }
    }
}

impl Default for CalibrationHandle {
    fn default() -> Self {
        Self::new(CurveCalibration::default())
    }
}

/// Returns true if we should enable hot reload (dev/local only).
fn hot_reload_enabled() -> bool {
    let want = std::env::var(ENV_CURVE_HOT_RELOAD)
        .ok()
        .map(|v| v == "1")
        .unwrap_or(false);
    if !want {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Start a simple polling watcher on `path` to hot-reload into `handle`.
/// Polls mtime every 2s. Uses only std, no external deps.
pub fn start_hot_reload_thread(handle: CalibrationHandle, path: PathBuf) {
    if !hot_reload_enabled() {
        return;
    }

    thread::spawn(move || {
        let poll = Duration::from_secs(2);
        let mut last_mtime: Option<SystemTime> = None;

        loop {
            match fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(mtime) => {
                    let changed = match last_mtime {
                        None => {
                            last_mtime = Some(mtime);
                            false
                        }
                        Some(prev) => mtime > prev,
                    };
                    if changed {
                        if let Ok(content) = fs::read_to_string(&path) {
                            if let Ok(cal) = CurveCalibration::from_toml_str(&content) {
                                handle.swap(cal);
                                info!(target: "calibration", path = %path.display(), "curve calibration hot-reloaded");
                            }
                        }
                        last_mtime = Some(mtime);
                    }
                }
                Err(_) => {
                    // File missing or unreadable; keep trying.
                }
            }
            thread::sleep(poll);
        }
    });
}

/* ----------------------------
Tests
---------------------------- */
