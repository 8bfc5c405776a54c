//! HTTP Handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use checkout_core::{ConfirmationRequest, ConfirmationResponse};
use checkout_payments::{CatalogProduct, PaymentError};

use crate::config::ConfigResponse;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub processor: String,
    pub stripe_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct LandingQuery {
    #[serde(default)]
    pub success: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LandingResponse {
    pub success: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        processor: state.orchestrator.processor_name().to_string(),
        stripe_configured: state.config.secret_key.is_some(),
    })
}

/// Expose the publishable key and other store config to the browser
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse::from(state.config.as_ref()))
}

/// Confirmation endpoint.
///
/// A malformed body (neither or both identifiers) is rejected with 400.
/// Every other outcome, including processor faults, is a 200 carrying
/// one of the three wire shapes.
pub async fn confirm_payment(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmationRequest>,
) -> Result<Json<ConfirmationResponse>, (StatusCode, Json<ConfirmationResponse>)> {
    match state.orchestrator.confirm(&payload).await {
        Ok(response) => Ok(Json(response)),
        Err(e @ PaymentError::InvalidRequest(_)) => {
            tracing::warn!(error = %e, "rejected confirmation request");
            Err((
                StatusCode::BAD_REQUEST,
                Json(ConfirmationResponse::error(e.user_message())),
            ))
        }
        Err(e) => {
            tracing::error!(error = %e, "confirmation failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ConfirmationResponse::error(e.user_message())),
            ))
        }
    }
}

/// Redirect landing probe: reports whether the redirect carried the
/// success flag
pub async fn payment_intent_landing(Query(query): Query<LandingQuery>) -> Json<LandingResponse> {
    Json(LandingResponse {
        success: query.success.as_deref() == Some("true"),
    })
}

/// List sellable products with current prices
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogProduct>>, (StatusCode, Json<ErrorResponse>)> {
    let products = state.catalog.list_products().await.map_err(|e| {
        tracing::error!(error = %e, "product listing failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.user_message(),
                code: "CATALOG_ERROR".into(),
            }),
        )
    })?;

    Ok(Json(products))
}
