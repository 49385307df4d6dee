//! Application context and HTTP router assembly.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::catalog::{Catalog, catalog_routes};
use crate::config::AppConfig;
use crate::error::{self, ConfigError};
use crate::notify::ToastQueue;
use crate::onboarding::{
    NotifyingSubmissionHandler, OnboardingRouteState, OnboardingWizard, onboarding_routes,
};
use crate::pages::{fallback, page_routes};
use crate::wallet::{
    SimulatedStorage, SimulatedWallet, StorageGateway, WalletContext, WalletGateway,
    WalletRouteState, wallet_routes,
};

/// Everything a request handler or page renderer may reach.
///
/// Built once at startup and passed explicitly; cloning is cheap.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<Catalog>,
    pub wallet: Arc<WalletContext>,
    pub toasts: Arc<ToastQueue>,
    pub wizard: Arc<Mutex<OnboardingWizard>>,
}

impl AppContext {
    pub fn builder(config: AppConfig) -> AppContextBuilder {
        AppContextBuilder {
            config,
            catalog: None,
            wallet_gateway: None,
            storage_gateway: None,
        }
    }

    /// Context backed by the simulated wallet and storage gateways.
    pub fn simulated(config: AppConfig) -> Result<Self, ConfigError> {
        let delay = config.simulated_delay;
        // The simulated wallet starts on the required chain.
        let chain_id = config.network.required_chain_id;
        Self::builder(config)
            .with_wallet_gateway(Arc::new(SimulatedWallet::new(delay, chain_id)))
            .with_storage_gateway(Arc::new(SimulatedStorage::new(delay)))
            .build()
    }
}

pub struct AppContextBuilder {
    config: AppConfig,
    catalog: Option<Catalog>,
    wallet_gateway: Option<Arc<dyn WalletGateway>>,
    storage_gateway: Option<Arc<dyn StorageGateway>>,
}

impl AppContextBuilder {
    /// Replace the seeded catalog.
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_wallet_gateway(mut self, gateway: Arc<dyn WalletGateway>) -> Self {
        self.wallet_gateway = Some(gateway);
        self
    }

    pub fn with_storage_gateway(mut self, gateway: Arc<dyn StorageGateway>) -> Self {
        self.storage_gateway = Some(gateway);
        self
    }

    /// Wire the context. Fails when a gateway was never supplied.
    pub fn build(self) -> Result<AppContext, ConfigError> {
        let wallet_gateway = self.wallet_gateway.ok_or_else(|| ConfigError::MissingRequired {
            key: "wallet_gateway".to_string(),
            hint: "Call with_wallet_gateway before build".to_string(),
        })?;
        let storage_gateway = self.storage_gateway.ok_or_else(|| ConfigError::MissingRequired {
            key: "storage_gateway".to_string(),
            hint: "Call with_storage_gateway before build".to_string(),
        })?;

        let toasts = ToastQueue::new(self.config.toast_history);
        let wallet = WalletContext::new(
            wallet_gateway,
            storage_gateway,
            toasts.clone(),
            self.config.network.clone(),
        );
        let handler = NotifyingSubmissionHandler::new(toasts.clone());
        let wizard = OnboardingWizard::new(Arc::new(handler));

        Ok(AppContext {
            config: Arc::new(self.config),
            catalog: Arc::new(self.catalog.unwrap_or_else(Catalog::seeded)),
            wallet: Arc::new(wallet),
            toasts,
            wizard: Arc::new(Mutex::new(wizard)),
        })
    }
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

/// GET /api/notifications
async fn notifications(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(ctx.toasts.recent())
}

/// Build the simulated context and serve the router on `config.port`.
pub async fn serve(config: AppConfig) -> error::Result<()> {
    let port = config.port;
    let ctx = AppContext::simulated(config)?;
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "HTTP server started");
    axum::serve(listener, router(ctx)).await?;
    Ok(())
}

/// Assemble every route group into one router.
pub fn router(ctx: AppContext) -> Router {
    info!(
        chain_id = ctx.config.network.required_chain_id,
        opportunities = ctx.catalog.all_opportunities().len(),
        "Building router"
    );
    Router::new()
        .route("/health", get(health))
        .route("/api/notifications", get(notifications))
        .fallback(fallback)
        .with_state(ctx.clone())
        .merge(catalog_routes(ctx.catalog.clone()))
        .merge(page_routes(ctx.clone()))
        .merge(onboarding_routes(OnboardingRouteState {
            wizard: ctx.wizard.clone(),
        }))
        .merge(wallet_routes(WalletRouteState {
            wallet: ctx.wallet.clone(),
            config: ctx.config.clone(),
        }))
        .layer(CorsLayer::permissive())
}
