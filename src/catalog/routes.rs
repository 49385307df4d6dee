//! Read-only REST endpoints over the catalog.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::{Catalog, DonationOpportunity};

#[derive(Debug, Default, Deserialize)]
pub struct OpportunityFilter {
    pub category: Option<String>,
    pub country: Option<String>,
}

fn not_found(what: &str, id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("{what} {id} not found") })),
    )
        .into_response()
}

/// GET /api/opportunities?category=&country=
///
/// Both filters apply when both are given.
async fn list_opportunities(
    State(catalog): State<Arc<Catalog>>,
    Query(filter): Query<OpportunityFilter>,
) -> impl IntoResponse {
    let mut list: Vec<&DonationOpportunity> = match &filter.category {
        Some(category) => catalog.opportunities_by_category(category),
        None => catalog.all_opportunities().iter().collect(),
    };
    if let Some(country) = &filter.country {
        let in_country = catalog.opportunities_by_country(country);
        list.retain(|o| in_country.iter().any(|c| c.id == o.id));
    }
    Json(list.into_iter().cloned().collect::<Vec<_>>())
}

/// GET /api/opportunities/featured
async fn featured(State(catalog): State<Arc<Catalog>>) -> impl IntoResponse {
    Json(
        catalog
            .featured_opportunities()
            .into_iter()
            .cloned()
            .collect::<Vec<_>>(),
    )
}

/// GET /api/opportunities/{id}
async fn get_opportunity(State(catalog): State<Arc<Catalog>>, Path(id): Path<String>) -> Response {
    match catalog.opportunity_by_id(&id) {
        Some(opportunity) => Json(opportunity.clone()).into_response(),
        None => not_found("Opportunity", &id),
    }
}

/// GET /api/recipients/{id}
async fn get_recipient(State(catalog): State<Arc<Catalog>>, Path(id): Path<String>) -> Response {
    match catalog.recipient_by_id(&id) {
        Some(recipient) => Json(recipient.clone()).into_response(),
        None => not_found("Recipient", &id),
    }
}

/// Build the catalog REST routes.
pub fn catalog_routes(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/api/opportunities", get(list_opportunities))
        .route("/api/opportunities/featured", get(featured))
        .route("/api/opportunities/{id}", get(get_opportunity))
        .route("/api/recipients/{id}", get(get_recipient))
        .with_state(catalog)
}
