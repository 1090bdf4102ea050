//! SAT Score Estimator — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.
//!
//! See `README.md` for quickstart and `DESIGN.md` for architecture notes.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sat_score_estimator::api::{self, AppState};
use sat_score_estimator::calibration::{
    config_path, dev_logging_enabled, start_hot_reload_thread, CalibrationHandle, CurveCalibration,
};
use sat_score_estimator::metrics::Metrics;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - SCORE_DEV_LOG=1
fn enable_dev_tracing() {
    if !dev_logging_enabled() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sat_score_estimator=info,calibration=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // This enables CURVE_CONFIG_PATH / INSTITUTIONS_PATH from .env
    // so calibration.rs and colleges.rs can pick them up.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    // --- Initialize curve calibration ---
    let cal = CurveCalibration::load_or_default();
    let handle = CalibrationHandle::new(cal);

    // If hot reload is enabled, spawn background watcher
    start_hot_reload_thread(handle.clone(), config_path());

    // Prometheus recorder + /metrics, then the API router around shared state.
    let metrics = Metrics::init(&cal);
    let state = AppState::new(handle);
    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
