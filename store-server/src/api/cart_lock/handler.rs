//! Cart lock API handlers

use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};

use shared::error::{ApiResponse, AppError, AppResult};

use crate::core::ServerState;
use crate::db::repository::CartRepository;
use crate::services::PaymentAuthorization;
use crate::utils::time;

const SESSION_HEADER: &str = "x-session-id";

/// Wire shape of a freshly created lock
#[derive(Debug, Serialize)]
pub struct LockResponse {
    pub token: String,
    /// RFC 3339 deadline
    pub expires_at: String,
    pub expires_in_seconds: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_authorization: Option<PaymentAuthorization>,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ReleaseResponse {
    pub ok: bool,
}

fn session_cart_id(headers: &HeaderMap) -> AppResult<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| AppError::invalid_request("Missing X-Session-ID header"))
}

/// POST /api/cart/lock - reserve the session cart's stock
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> AppResult<Json<ApiResponse<LockResponse>>> {
    let session_id = session_cart_id(&headers)?;

    let cart_repo = CartRepository::new(state.db.clone());
    let cart = cart_repo
        .find_by_session(&session_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::new(shared::error::ErrorCode::CartNotFound))?;
    let cart_id = cart
        .id
        .ok_or_else(|| AppError::internal("Cart record has no id"))?;

    let created = state
        .reservations
        .create(&cart_id)
        .await
        .map_err(AppError::from)?;

    let now = time::now_millis();
    let response = LockResponse {
        token: created.reservation.token.clone(),
        expires_at: time::millis_to_rfc3339(created.reservation.expires_at),
        expires_in_seconds: time::seconds_until(created.reservation.expires_at, now),
        payment_authorization: created.authorization,
    };

    Ok(Json(ApiResponse::success(response)))
}

/// DELETE /api/cart/lock - release a lock; always 200
pub async fn cancel(
    State(state): State<ServerState>,
    Json(request): Json<CancelRequest>,
) -> Json<ApiResponse<ReleaseResponse>> {
    if let Err(e) = state.reservations.cancel(&request.token).await {
        // Release is fire-and-forget; the caller never sees a failure
        tracing::warn!(token = %request.token, error = %e, "Lock cancel failed");
    }
    Json(ApiResponse::success(ReleaseResponse { ok: true }))
}

/// POST /api/cart/lock/release - unload-time release; always 200
///
/// Accepts either a plain-text token or `{"token": "..."}`, since
/// `sendBeacon` cannot always set a JSON content type.
pub async fn release(
    State(state): State<ServerState>,
    body: String,
) -> Json<ApiResponse<ReleaseResponse>> {
    let token = parse_release_token(&body);
    if let Some(token) = token {
        if let Err(e) = state.reservations.cancel(&token).await {
            tracing::warn!(token = %token, error = %e, "Lock release failed");
        }
    }
    Json(ApiResponse::success(ReleaseResponse { ok: true }))
}

fn parse_release_token(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct TokenBody {
        token: String,
    }

    if let Ok(parsed) = serde_json::from_str::<TokenBody>(body) {
        return Some(parsed.token);
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::parse_release_token;

    #[test]
    fn test_parse_release_token_json() {
        assert_eq!(
            parse_release_token(r#"{"token":"lock_abc"}"#),
            Some("lock_abc".to_string())
        );
    }

    #[test]
    fn test_parse_release_token_plain() {
        assert_eq!(
            parse_release_token("lock_abc\n"),
            Some("lock_abc".to_string())
        );
    }

    #[test]
    fn test_parse_release_token_empty() {
        assert_eq!(parse_release_token("   "), None);
    }
}
