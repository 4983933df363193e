//! Health check

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<ServerState>) -> Json<Value> {
    let db_ok = state.db.query("RETURN 1").await.is_ok();
    let status = if db_ok { "ok" } else { "degraded" };
    Json(json!({ "status": status, "database": db_ok }))
}
