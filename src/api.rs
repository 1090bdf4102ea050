use std::sync::{Arc, RwLock};

use shuttle_axum::axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::act;
use crate::baselines::{self, CurveBaseline};
use crate::calibration::{CalibrationHandle, CurveCalibration};
use crate::colleges::{InstitutionRange, InstitutionTable, Tier};
use crate::concordance;
use crate::goal::{self, GoalProgress, GoalState};
use crate::history::{ScoreEntry, ScoreJournal, Trend, DEFAULT_JOURNAL_CAP};
use crate::metrics;
use crate::psat::{self, MeritOutlook, PsatScore, PsatSheet};
use crate::report;
use crate::score::{CompositeScore, ScoreError, TestSheet};
use crate::scorer;
use crate::storage::{MemoryStore, ScoreStore};
use crate::superscore::{self, Attempt, Superscore};

#[derive(Clone)]
pub struct AppState {
    calibration: CalibrationHandle,
    institutions: Arc<RwLock<InstitutionTable>>,
    journal: Arc<ScoreJournal>,
    store: Arc<dyn ScoreStore>,
}

impl AppState {
    /// Wire the shared state around an already-loaded calibration handle.
    /// Institutions come from `INSTITUTIONS_PATH` (seed fallback); journal
    /// and store start empty and in-process.
    pub fn new(calibration: CalibrationHandle) -> Self {
        Self {
            calibration,
            institutions: Arc::new(RwLock::new(InstitutionTable::load())),
            journal: Arc::new(ScoreJournal::with_capacity(DEFAULT_JOURNAL_CAP)),
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// Everything from the environment, calibration included.
    pub fn from_env() -> Self {
        Self::new(CalibrationHandle::new(CurveCalibration::load_or_default()))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/score", post(score))
        .route("/superscore", post(superscore_batch))
        .route("/concordance", get(concordance_lookup))
        .route("/colleges", get(college_match))
        .route("/psat", post(psat_score))
        .route("/act", post(act_score))
        .route("/baselines", get(baseline_table))
        .route("/history", get(history_snapshot).post(history_save))
        .route("/history/trend", get(history_trend))
        .route("/history/{id}", delete(history_remove))
        .route("/goal", get(goal_status).post(goal_save).delete(goal_clear))
        .route("/admin/reload-institutions", post(admin_reload_institutions))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Domain errors answer 422, storage failures 500; both as `{"error": ...}`.
enum ApiError {
    Unprocessable(String),
    Internal(String),
}

impl From<ScoreError> for ApiError {
    fn from(e: ScoreError) -> Self {
        ApiError::Unprocessable(e.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}

#[derive(serde::Deserialize)]
struct ScoreReq {
    #[serde(flatten)]
    sheet: TestSheet,
    #[serde(default)]
    baseline: Option<u32>,
}

#[derive(serde::Serialize)]
struct ScoreResp {
    #[serde(flatten)]
    score: CompositeScore,
    share: String,
}

async fn score(State(state): State<AppState>, Json(body): Json<ScoreReq>) -> Json<ScoreResp> {
    metrics::mark_endpoint("score");
    let cal = state.calibration.get();
    let b = baselines::find(body.baseline.unwrap_or(0));
    let score =
        scorer::score_test_with_maxima(&body.sheet, b.rw_module_max(), b.math_module_max(), &cal);
    metrics::observe_composite_total(score.total);
    let share = report::share_text(&score);
    Json(ScoreResp { score, share })
}

async fn superscore_batch(
    Json(attempts): Json<Vec<Attempt>>,
) -> Result<Json<Superscore>, ApiError> {
    metrics::mark_endpoint("superscore");
    Ok(Json(superscore::superscore(&attempts)?))
}

#[derive(serde::Deserialize)]
struct ConcordanceQuery {
    act: Option<u32>,
    sat: Option<u32>,
}

#[derive(serde::Serialize)]
struct ConcordanceResp {
    act: Option<u32>,
    sat: Option<u32>,
}

/// `?act=` maps exactly (miss answers a null sat); `?sat=` maps to the
/// nearest ACT row. Neither parameter answers all-null.
async fn concordance_lookup(Query(q): Query<ConcordanceQuery>) -> Json<ConcordanceResp> {
    metrics::mark_endpoint("concordance");
    if let Some(a) = q.act {
        return Json(ConcordanceResp {
            act: Some(a),
            sat: concordance::act_to_sat(a),
        });
    }
    if let Some(s) = q.sat {
        return Json(ConcordanceResp {
            act: Some(concordance::sat_to_act(s)),
            sat: Some(s),
        });
    }
    Json(ConcordanceResp {
        act: None,
        sat: None,
    })
}

#[derive(serde::Deserialize)]
struct CollegeQuery {
    total: Option<u32>,
    q: Option<String>,
}

#[derive(serde::Serialize)]
struct CollegeLookupResp {
    institution: Option<InstitutionRange>,
    tier: Option<Tier>,
}

async fn college_match(
    State(state): State<AppState>,
    Query(q): Query<CollegeQuery>,
) -> Result<Response, ApiError> {
    metrics::mark_endpoint("colleges");
    let table = state.institutions.read().expect("rwlock poisoned");
    if let Some(name) = q.q {
        let institution = table.find(&name).cloned();
        let tier = match (&institution, q.total) {
            (Some(inst), Some(total)) => Some(inst.tier_for(total)),
            _ => None,
        };
        return Ok(Json(CollegeLookupResp { institution, tier }).into_response());
    }
    let total = q
        .total
        .ok_or_else(|| ApiError::Unprocessable("total query parameter required".to_string()))?;
    Ok(Json(table.grouped(total)?).into_response())
}

#[derive(serde::Deserialize)]
struct PsatReq {
    #[serde(flatten)]
    sheet: PsatSheet,
    #[serde(default)]
    region: Option<String>,
}

#[derive(serde::Serialize)]
struct PsatResp {
    #[serde(flatten)]
    score: PsatScore,
    merit: MeritOutlook,
}

async fn psat_score(State(state): State<AppState>, Json(body): Json<PsatReq>) -> Json<PsatResp> {
    metrics::mark_endpoint("psat");
    let cal = state.calibration.get();
    let score = psat::score_psat(&body.sheet, &cal);
    let merit = psat::merit_outlook(&score, body.region.as_deref().unwrap_or("National Average"));
    Json(PsatResp { score, merit })
}

#[derive(serde::Deserialize)]
struct ActReq {
    english: u32,
    math: u32,
    reading: u32,
}

#[derive(serde::Serialize)]
struct ActResp {
    composite: u32,
}

async fn act_score(Json(body): Json<ActReq>) -> Json<ActResp> {
    metrics::mark_endpoint("act");
    Json(ActResp {
        composite: act::act_composite(body.english, body.math, body.reading),
    })
}

async fn baseline_table() -> Json<&'static [CurveBaseline]> {
    metrics::mark_endpoint("baselines");
    Json(baselines::all())
}

#[derive(serde::Deserialize)]
struct HistoryQuery {
    n: Option<usize>,
}

async fn history_snapshot(
    State(state): State<AppState>,
    Query(q): Query<HistoryQuery>,
) -> Json<Vec<ScoreEntry>> {
    metrics::mark_endpoint("history");
    Json(state.journal.snapshot_last_n(q.n.unwrap_or(50)))
}

#[derive(serde::Deserialize)]
struct HistorySaveReq {
    total: u32,
    rw: u32,
    math: u32,
    #[serde(default)]
    label: Option<String>,
}

async fn history_save(
    State(state): State<AppState>,
    Json(body): Json<HistorySaveReq>,
) -> Result<Json<ScoreEntry>, ApiError> {
    metrics::mark_endpoint("history_save");
    let entry = state.journal.add(body.total, body.rw, body.math, body.label);
    state.journal.save_to(state.store.as_ref()).await?;
    Ok(Json(entry))
}

async fn history_remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    metrics::mark_endpoint("history_remove");
    let removed = state.journal.remove(&id);
    state.journal.save_to(state.store.as_ref()).await?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}

async fn history_trend(State(state): State<AppState>) -> Json<Option<Trend>> {
    metrics::mark_endpoint("history_trend");
    Json(state.journal.trend())
}

#[derive(serde::Serialize)]
struct GoalStatus {
    goal: Option<GoalState>,
    progress: Option<GoalProgress>,
    suggestions: Vec<&'static str>,
}

async fn goal_status(State(state): State<AppState>) -> Result<Json<GoalStatus>, ApiError> {
    metrics::mark_endpoint("goal");
    let goal = goal::load_goal(state.store.as_ref()).await?;
    let latest = state.journal.snapshot_last_n(1).pop().map(|e| e.total);
    let progress = match (&goal, latest) {
        (Some(g), Some(total)) => Some(GoalProgress::evaluate(g, total)),
        _ => None,
    };
    let suggestions = progress
        .as_ref()
        .map(|p| goal::study_suggestions(p.points_to_go))
        .unwrap_or_default();
    Ok(Json(GoalStatus {
        goal,
        progress,
        suggestions,
    }))
}

#[derive(serde::Deserialize)]
struct GoalReq {
    #[serde(default)]
    target_score: Option<u32>,
    #[serde(default)]
    target_college: Option<String>,
}

async fn goal_save(
    State(state): State<AppState>,
    Json(body): Json<GoalReq>,
) -> Result<Json<GoalState>, ApiError> {
    metrics::mark_endpoint("goal_save");
    let goal = match (body.target_score, body.target_college) {
        (Some(target), college) => GoalState::new(target, college),
        (None, Some(name)) => GoalState::for_college(&name)
            .ok_or_else(|| ApiError::Unprocessable(format!("unknown college '{name}'")))?,
        (None, None) => {
            return Err(ApiError::Unprocessable(
                "target_score or target_college required".to_string(),
            ))
        }
    };
    goal::save_goal(state.store.as_ref(), &goal).await?;
    Ok(Json(goal))
}

async fn goal_clear(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    metrics::mark_endpoint("goal_clear");
    goal::clear_goal(state.store.as_ref()).await?;
    Ok(Json(serde_json::json!({ "cleared": true })))
}

async fn admin_reload_institutions(State(state): State<AppState>) -> String {
    let fresh = InstitutionTable::load();
    match state.institutions.write() {
        Ok(mut t) => {
            *t = fresh;
            "reloaded".to_string()
        }
        Err(_) => "failed: lock poisoned".to_string(),
    }
}
