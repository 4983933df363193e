//! API routing
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`cart_lock`] - checkout lock lifecycle (create, cancel, release)
//! - [`orders`] - order finalization

pub mod cart_lock;
pub mod health;
pub mod orders;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(cart_lock::router())
        .merge(orders::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
