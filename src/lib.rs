//! Service Inquiry API Library
//!
//! Core functionality for the service inquiry API: request validation,
//! email composition and delivery, optional Postgres persistence, and the
//! HTTP handlers orchestrating them.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `email`: Pure email composition (admin notification, customer confirmation).
//! - `errors`: Error handling types.
//! - `inquiry_handler`: HTTP request handlers and routing.
//! - `mailer`: SMTP transport and the `Mailer` seam.
//! - `models`: Core data models.
//! - `storage`: Inquiry persistence.
//! - `validation`: Inquiry schema validation.

pub mod config;
pub mod db;
pub mod email;
pub mod errors;
pub mod inquiry_handler;
pub mod mailer;
pub mod models;
pub mod storage;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::inquiry_handler::AppState;

/// Build the API router. Middleware (tracing, CORS, rate limiting, body
/// limits) is layered on by the binary so tests can exercise the routes
/// directly.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(inquiry_handler::health))
        .route("/api/ping", get(inquiry_handler::ping))
        .route(
            "/api/send-inquiry",
            post(inquiry_handler::send_inquiry)
                .fallback(inquiry_handler::method_not_allowed),
        )
        .with_state(state)
}
