//! card-checkout HTTP Server
//!
//! Axum-based server exposing the checkout demo's routes: store config,
//! the payment confirmation endpoint, the redirect landing probe, and
//! the static WASM frontend.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_payments::{
    ConfirmationOrchestrator, CustomerProfile, DemoCatalog, MemoryCustomerLedger, MockProcessor,
    ProcessorClient, ProductCatalog, StripeCatalog, StripeProcessor,
};

use crate::config::StoreConfig;
use crate::handlers::{
    confirm_payment, get_config, health_check, list_products, payment_intent_landing,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = Arc::new(StoreConfig::from_env());

    // A store configured with a currency the processor cannot charge in
    // must refuse to boot rather than mischarge at payment time.
    checkout_payments::parse_currency(&config.currency)?;

    // Pick the processor: Stripe when a secret key is configured,
    // otherwise the scripted mock so the demo runs keyless.
    let processor: Arc<dyn ProcessorClient>;
    let catalog: Arc<dyn ProductCatalog>;
    match &config.secret_key {
        Some(key) => {
            tracing::info!("✓ Stripe configured");
            processor = Arc::new(StripeProcessor::new(key));
            catalog = Arc::new(StripeCatalog::new(key));
        }
        None => {
            tracing::warn!("⚠ STRIPE_SECRET_KEY not set - using the mock processor");
            tracing::warn!("  Tokens: tok_ok settles, tok_3ds challenges, tok_err declines");
            processor = Arc::new(MockProcessor::new());
            catalog = Arc::new(DemoCatalog::new(config.currency.clone()));
        }
    }

    let orchestrator = Arc::new(ConfirmationOrchestrator::new(
        processor,
        Arc::new(MemoryCustomerLedger::new()),
        config.charge(),
        CustomerProfile::demo(),
    ));

    tracing::info!(
        processor = orchestrator.processor_name(),
        amount = config.amount,
        currency = %config.currency,
        "checkout configured"
    );

    // Build application state
    let state = AppState {
        orchestrator,
        catalog,
        config: config.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health & store config
        .route("/health", get(health_check))
        .route("/config", get(get_config))
        .route("/products", get(list_products))
        // Payment confirmation
        .route("/confirm_payment", post(confirm_payment))
        .route("/paymentIntent", get(payment_intent_landing))
        // Static files (WASM frontend)
        .fallback_service(tower_http::services::ServeDir::new("static"))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🛒 card-checkout server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  GET  /config          - Store config for the browser");
    tracing::info!("  GET  /products        - Product catalog");
    tracing::info!("  POST /confirm_payment - Payment confirmation");
    tracing::info!("  GET  /paymentIntent   - Redirect landing probe");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
