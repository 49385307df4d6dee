//! REST endpoints for the wallet connection and proof storage.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

use super::context::{WalletContext, WalletSnapshot};
use super::gateway::{ProofFile, ProofMetadata};

/// Shared state for wallet routes.
#[derive(Clone)]
pub struct WalletRouteState {
    pub wallet: Arc<WalletContext>,
    pub config: Arc<AppConfig>,
}

#[derive(Serialize)]
struct ActionResponse {
    ok: bool,
    wallet: WalletSnapshot,
}

/// One file in a proof upload. `content` is the file body as text.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    pub content: String,
}

fn default_content_type() -> String {
    "application/octet-stream".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub opportunity_id: String,
    #[serde(default)]
    pub files: Vec<UploadedFile>,
}

#[derive(Serialize)]
struct UploadResponse {
    cids: Vec<String>,
    urls: Vec<String>,
}

#[derive(Serialize)]
struct VerifyResponse {
    cid: String,
    verified: bool,
    url: String,
}

/// GET /api/wallet
async fn get_wallet(State(state): State<WalletRouteState>) -> impl IntoResponse {
    Json(state.wallet.snapshot().await)
}

/// POST /api/wallet/connect
async fn connect(State(state): State<WalletRouteState>) -> impl IntoResponse {
    let ok = state.wallet.connect().await;
    action_response(&state, ok).await
}

/// POST /api/wallet/disconnect
async fn disconnect(State(state): State<WalletRouteState>) -> impl IntoResponse {
    let ok = state.wallet.disconnect().await;
    action_response(&state, ok).await
}

/// POST /api/wallet/switch-network
async fn switch_network(State(state): State<WalletRouteState>) -> impl IntoResponse {
    let ok = state.wallet.switch_network().await;
    action_response(&state, ok).await
}

async fn action_response(state: &WalletRouteState, ok: bool) -> (StatusCode, Json<ActionResponse>) {
    let status = if ok { StatusCode::OK } else { StatusCode::BAD_GATEWAY };
    let body = ActionResponse {
        ok,
        wallet: state.wallet.snapshot().await,
    };
    (status, Json(body))
}

/// POST /api/proofs
///
/// 400 when no files were sent, 502 when storage failed.
async fn upload_proofs(
    State(state): State<WalletRouteState>,
    Json(request): Json<UploadRequest>,
) -> impl IntoResponse {
    let no_files = request.files.is_empty();
    let files: Vec<ProofFile> = request
        .files
        .into_iter()
        .map(|f| ProofFile {
            name: f.name,
            content_type: f.content_type,
            bytes: f.content.into_bytes(),
        })
        .collect();
    let metadata = ProofMetadata::project_proof(request.opportunity_id);

    let cids = state.wallet.upload_proof(&files, &metadata).await;
    let status = if !cids.is_empty() {
        StatusCode::OK
    } else if no_files {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    };
    let urls = cids.iter().map(|cid| state.config.proof_url(cid)).collect();
    (status, Json(UploadResponse { cids, urls }))
}

/// POST /api/proofs/{cid}/verify
async fn verify_proof(
    State(state): State<WalletRouteState>,
    Path(cid): Path<String>,
) -> impl IntoResponse {
    let verified = state.wallet.verify_proof(&cid).await;
    Json(VerifyResponse {
        url: state.config.proof_url(&cid),
        cid,
        verified,
    })
}

/// Build the wallet and proof REST routes.
pub fn wallet_routes(state: WalletRouteState) -> Router {
    Router::new()
        .route("/api/wallet", get(get_wallet))
        .route("/api/wallet/connect", post(connect))
        .route("/api/wallet/disconnect", post(disconnect))
        .route("/api/wallet/switch-network", post(switch_network))
        .route("/api/proofs", post(upload_proofs))
        .route("/api/proofs/{cid}/verify", post(verify_proof))
        .with_state(state)
}
