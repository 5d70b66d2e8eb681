//! HTTP boundary for the diet form: serves the page, validates submissions
//! and forwards valid ones to the diet backend.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use diet_plan_client::{DietInput, DietPlanClient, RawDietInput, validate};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub mod error;
pub mod middleware;
pub mod page;
pub mod startup;

pub use error::{AppError, AppResult};

/// Header carrying the id assigned to each submission.
pub const SUBMISSION_ID_HEADER: &str = "x-submission-id";

pub struct AppState {
    pub client: Arc<dyn DietPlanClient>,
    pub metrics: Option<PrometheusHandle>,
    page: String,
}

impl AppState {
    pub fn new(client: Arc<dyn DietPlanClient>, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            client,
            metrics,
            page: page::render_form_page(),
        }
    }
}

/// Build the router. `request_timeout` bounds whole requests, backend call
/// included.
pub fn router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(form_page))
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/schema", get(schema))
        .route("/validate", post(validate_only))
        .route("/api/diet", post(submit_json))
        .route("/diet", post(submit_urlencoded))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn form_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::NotFound("metrics recorder not installed".into()))?;
    Ok(([("content-type", "text/plain; version=0.0.4")], handle.render()).into_response())
}

async fn schema() -> Json<serde_json::Value> {
    Json(serde_json::to_value(schemars::schema_for!(DietInput)).unwrap_or_default())
}

async fn validate_only(Json(raw): Json<RawDietInput>) -> AppResult<Json<DietInput>> {
    Ok(Json(validate(&raw)?))
}

async fn submit_json(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<RawDietInput>,
) -> Response {
    submit(&state, raw).await
}

async fn submit_urlencoded(
    State(state): State<Arc<AppState>>,
    Form(raw): Form<RawDietInput>,
) -> Response {
    submit(&state, raw).await
}

async fn submit(state: &AppState, raw: RawDietInput) -> Response {
    let submission_id = Uuid::new_v4();
    let outcome = match validate(&raw) {
        Err(errors) => {
            tracing::info!(%submission_id, invalid_fields = errors.len(), "diet form rejected");
            Err(AppError::from(errors))
        }
        Ok(input) => match state.client.submit_diet(&input).await {
            Ok(plan) => {
                tracing::info!(%submission_id, "diet plan generated");
                Ok(plan)
            }
            Err(e) => {
                tracing::warn!(%submission_id, error = %e, "diet backend failed");
                Err(AppError::from(e))
            }
        },
    };

    let label = match &outcome {
        Ok(_) => "accepted",
        Err(AppError::Validation(_)) => "invalid",
        Err(_) => "backend_error",
    };
    metrics::counter!("diet_form_submissions_total", "outcome" => label).increment(1);

    let mut response = match outcome {
        Ok(plan) => Json(plan).into_response(),
        Err(e) => e.into_response(),
    };
    if let Ok(value) = HeaderValue::from_str(&submission_id.to_string()) {
        response.headers_mut().insert(SUBMISSION_ID_HEADER, value);
    }
    response
}
