//! REST endpoints driving the onboarding wizard.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::sync::Mutex;

use super::manager::{OnboardingWizard, StepOutcome, WizardView};
use super::schema::CandidateValues;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub wizard: Arc<Mutex<OnboardingWizard>>,
}

#[derive(Serialize)]
struct SubmitResponse {
    #[serde(flatten)]
    outcome: StepOutcome,
    wizard: WizardView,
}

/// GET /api/onboarding
async fn get_wizard(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.wizard.lock().await.view())
}

/// POST /api/onboarding/submit
///
/// Body is the active step's field values. 422 with per-field errors when
/// validation fails, 409 once the application has been submitted.
async fn submit_step(
    State(state): State<OnboardingRouteState>,
    Json(candidate): Json<CandidateValues>,
) -> impl IntoResponse {
    let mut wizard = state.wizard.lock().await;
    let outcome = wizard.submit_active_step(&candidate);
    let status = match outcome {
        StepOutcome::Advanced { .. } | StepOutcome::Submitted { .. } => StatusCode::OK,
        StepOutcome::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        StepOutcome::AlreadySubmitted => StatusCode::CONFLICT,
    };
    let body = SubmitResponse {
        outcome,
        wizard: wizard.view(),
    };
    (status, Json(body))
}

/// POST /api/onboarding/back
async fn previous_step(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    let mut wizard = state.wizard.lock().await;
    wizard.go_to_previous_step();
    Json(wizard.view())
}

/// POST /api/onboarding/reset
async fn reset(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    let mut wizard = state.wizard.lock().await;
    wizard.initialize();
    Json(wizard.view())
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/api/onboarding", get(get_wizard))
        .route("/api/onboarding/submit", post(submit_step))
        .route("/api/onboarding/back", post(previous_step))
        .route("/api/onboarding/reset", post(reset))
        .with_state(state)
}
