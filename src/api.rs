use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

use crate::bus::EventBus;
use crate::config::AppConfig;
use crate::data::store::InMemoryStore;
use crate::data::workflow::WorkflowStage;
use crate::error::EngineError;
use crate::services::collector::SignalCollector;
use crate::services::intelligence::{IntelligenceEngine, IntelligenceRequest};
use crate::services::reporting::ActivityReporter;
use crate::services::scoring::ScoringEngine;
use crate::services::workflow::WorkflowTracker;
use crate::sources::build_sources;

pub struct AppState {
    pub intelligence: IntelligenceEngine,
    pub workflow: WorkflowTracker,
    pub reporter: ActivityReporter,
    pub config: AppConfig,
}

impl AppState {
    /// Wire sources, store, bus and reporter from configuration.
    /// Starts the reporter, so this needs a running tokio runtime.
    pub async fn from_config(config: AppConfig) -> Result<Arc<Self>, EngineError> {
        let sources = build_sources(&config)?;
        let store = Arc::new(InMemoryStore::new());
        let bus = EventBus::new(1000);

        let reporter = ActivityReporter::new(config.activity.log_path.clone());
        reporter.start(bus.clone()).await;

        let collector = SignalCollector::new(sources, config.collector.fetch_timeout());
        let intelligence = IntelligenceEngine::new(
            collector,
            ScoringEngine::new(config.scoring.clone()),
            store.clone(),
        )
        .with_bus(bus.clone());
        let workflow = WorkflowTracker::new(store).with_bus(bus);

        Ok(Arc::new(Self {
            intelligence,
            workflow,
            reporter,
            config,
        }))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/intelligence", post(compute_intelligence))
        .route("/intelligence/{prospect_id}", get(get_latest_score))
        .route("/workflow/{prospect_id}", get(get_progress).delete(reset_workflow))
        .route("/workflow/{prospect_id}/advance", post(advance_workflow))
        .route("/activity", get(get_activity))
        .with_state(state)
}

pub async fn run_server(state: Arc<AppState>) -> Result<(), EngineError> {
    let addr = state.config.server.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| EngineError::Config(format!("cannot bind {}: {}", addr, e)))?;
    info!("API Server listening on {}", addr);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| EngineError::Config(format!("server error: {}", e)))
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = match &self {
            EngineError::Validation(_) => StatusCode::BAD_REQUEST,
            EngineError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            EngineError::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::InvariantViolation(_) | EngineError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            error!("❌ [API] {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn compute_intelligence(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IntelligenceRequest>,
) -> Result<Response, EngineError> {
    let report = state.intelligence.compute(&request).await?;
    Ok(Json(report).into_response())
}

#[derive(Deserialize)]
struct ScoreParams {
    analysis_type: Option<String>,
}

async fn get_latest_score(
    State(state): State<Arc<AppState>>,
    Path(prospect_id): Path<String>,
    Query(params): Query<ScoreParams>,
) -> Result<Response, EngineError> {
    let cached = state
        .intelligence
        .latest_score(&prospect_id, params.analysis_type.as_deref())
        .await?;

    Ok(match cached {
        Some(score) => Json(score).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("no scores computed for {}", prospect_id)})),
        )
            .into_response(),
    })
}

#[derive(Deserialize)]
struct AdvanceBody {
    #[serde(default)]
    company_name: String,
    stage: String,
    #[serde(default)]
    payload: Option<Value>,
}

async fn advance_workflow(
    State(state): State<Arc<AppState>>,
    Path(prospect_id): Path<String>,
    Json(body): Json<AdvanceBody>,
) -> Result<Response, EngineError> {
    let stage: WorkflowStage = body.stage.parse()?;
    let updated = state
        .workflow
        .advance(&prospect_id, &body.company_name, stage, body.payload)
        .await?;
    Ok(Json(updated).into_response())
}

async fn get_progress(
    State(state): State<Arc<AppState>>,
    Path(prospect_id): Path<String>,
) -> Result<Response, EngineError> {
    let progress = state.workflow.get_progress(&prospect_id).await?;
    Ok(Json(progress).into_response())
}

async fn reset_workflow(
    State(state): State<Arc<AppState>>,
    Path(prospect_id): Path<String>,
) -> Result<Response, EngineError> {
    state.workflow.reset(&prospect_id).await?;
    Ok(Json(json!({"status": "reset", "prospect_id": prospect_id})).into_response())
}

async fn get_activity(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.reporter.summary())
}
