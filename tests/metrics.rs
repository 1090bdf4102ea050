// tests/metrics.rs
#![cfg(feature = "strict-metrics")]
// The Prometheus recorder is process-global and installs exactly once, so this
// binary holds a single test. Run with --features strict-metrics.

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use sat_score_estimator::api::{self, AppState};
use sat_score_estimator::calibration::CurveCalibration;
use sat_score_estimator::metrics::Metrics;

#[tokio::test]
async fn labeled_requests_land_in_exposition() {
    let cal = CurveCalibration::default();
    let metrics = Metrics::init(&cal);
    let app = api::router(AppState::from_env()).merge(metrics.router());

    let payload = r#"{"rw_m1":20,"rw_m2":18,"math_m1":16,"math_m2":15}"#;
    let r1 = app
        .clone()
        .oneshot(
            Request::post("/score")
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(r1.status(), StatusCode::OK);

    // Read-only routes count against the same series under their own labels.
    for uri in ["/baselines", "/concordance?act=28"] {
        let r = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(r.status(), StatusCode::OK, "GET {uri}");
    }

    let m = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(m.status(), StatusCode::OK);
    let bytes = body::to_bytes(m.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    for needle in [
        r#"score_api_requests_total{endpoint="score"}"#,
        r#"score_api_requests_total{endpoint="baselines"}"#,
        r#"score_api_requests_total{endpoint="concordance"}"#,
        "composite_total",
        "curve_easy_penalty_threshold",
        "curve_easy_penalty_multiplier",
        "curve_hard_bonus_multiplier",
    ] {
        assert!(
            text.contains(needle),
            "metrics exposition missing '{needle}'\n{text}"
        );
    }
}
