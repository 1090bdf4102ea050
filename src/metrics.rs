use axum::{routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::calibration::CurveCalibration;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize Prometheus recorder and expose the active curve constants
    /// as static gauges.
    pub fn init(cal: &CurveCalibration) -> Self {
        // Use default buckets to avoid API differences across crate versions.
        let builder = PrometheusBuilder::new();

        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");

        gauge!("curve_easy_penalty_threshold").set(cal.easy_penalty_threshold);
        gauge!("curve_easy_penalty_multiplier").set(cal.easy_penalty_multiplier);
        gauge!("curve_hard_bonus_multiplier").set(cal.hard_bonus_multiplier);

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Count one request against an endpoint label. No-op until a recorder is
/// installed, so handlers stay callable from plain unit tests.
pub fn mark_endpoint(endpoint: &'static str) {
    counter!("score_api_requests_total", "endpoint" => endpoint).increment(1);
}

/// Track the distribution of estimated composite totals.
pub fn observe_composite_total(total: u32) {
    histogram!("composite_total").record(total as f64);
}
