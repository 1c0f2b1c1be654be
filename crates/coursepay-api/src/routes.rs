//! # Routes
//!
//! Axum router configuration. Two API endpoints sit in front of the payment
//! units; everything else falls through to static files served from the
//! working directory (the storefront's front end).

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - POST/OPTIONS /create-payment-intent - Create a payment intent
/// - POST/OPTIONS /payments - Payment webhook receiver
/// - GET /health - Health check
/// - GET /* - Static files from the working directory (404 if absent)
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route(
            "/create-payment-intent",
            post(handlers::create_payment_intent).options(handlers::preflight),
        )
        .route(
            "/payments",
            post(handlers::payments_webhook).options(handlers::preflight),
        )
        .layer(cors);

    Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes)
        .fallback_service(ServeDir::new("."))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
