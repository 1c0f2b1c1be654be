//! # coursepay-api
//!
//! HTTP API layer for the coursepay backend.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Payment-intent creation endpoint for the storefront
//! - Webhook receiver for payment events
//! - Static file serving for the front end
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/create-payment-intent` | Create a payment intent |
//! | POST | `/payments` | Payment webhook receiver |
//! | GET | `/health` | Health check |
//! | GET | `/*` | Static file from working directory |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
