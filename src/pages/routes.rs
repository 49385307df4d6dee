//! Page rendering and the donate form endpoint.

use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::app::AppContext;
use crate::donation::{DonationOutcome, submit_donation};
use crate::onboarding::CandidateValues;

use super::route::Route;
use super::view::{PageView, render};

fn page_response(view: PageView) -> (StatusCode, Json<PageView>) {
    let status = if view.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    (status, Json(view))
}

/// GET /pages
async fn home_page(State(ctx): State<AppContext>) -> impl IntoResponse {
    page_response(render(&Route::Home, &ctx).await)
}

/// GET /pages/{*path}
async fn get_page(State(ctx): State<AppContext>, Path(path): Path<String>) -> impl IntoResponse {
    let route = Route::parse(&format!("/{path}"));
    page_response(render(&route, &ctx).await)
}

/// Any path not matched by the API renders the not-found page.
pub async fn fallback(State(ctx): State<AppContext>, uri: Uri) -> impl IntoResponse {
    let route = Route::NotFound {
        path: uri.path().to_string(),
    };
    page_response(render(&route, &ctx).await)
}

/// POST /api/donate/{id}
///
/// 404 for an unknown opportunity, 422 for form errors, 409 without a
/// connected wallet, 502 when the wallet failed.
async fn donate(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(candidate): Json<CandidateValues>,
) -> impl IntoResponse {
    let Some(opportunity) = ctx.catalog.opportunity_by_id(&id) else {
        return page_response(render(&Route::Donate { id }, &ctx).await).into_response();
    };

    let outcome = submit_donation(&ctx.wallet, ctx.toasts.as_ref(), opportunity, &candidate).await;
    let status = match outcome {
        DonationOutcome::Completed { .. } => StatusCode::OK,
        DonationOutcome::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DonationOutcome::WalletNotConnected => StatusCode::CONFLICT,
        DonationOutcome::Failed => StatusCode::BAD_GATEWAY,
    };
    (status, Json(outcome)).into_response()
}

/// Build the page and donate routes.
pub fn page_routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/pages", get(home_page))
        .route("/pages/{*path}", get(get_page))
        .route("/api/donate/{id}", post(donate))
        .with_state(ctx)
}
