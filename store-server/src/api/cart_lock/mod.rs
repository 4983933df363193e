//! Cart lock API module

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/cart/lock",
            post(handler::create).delete(handler::cancel),
        )
        .route("/api/cart/lock/release", post(handler::release))
}
