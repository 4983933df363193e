//! Order API handlers

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shared::error::{ApiResponse, AppError, AppResult};
use shared::models::{Order, ReservedItem};

use crate::core::ServerState;
use crate::utils::time;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub token: String,
    /// Present when the client already settled payment out of band
    #[serde(default)]
    pub payment_confirmation: Option<bool>,
}

/// Wire shape of a finalized order
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub id: String,
    pub status: String,
    pub items: Vec<ReservedItem>,
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    pub created_at: String,
}

impl From<Order> for OrderSummary {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.unwrap_or_default(),
            status: order.status.name().to_string(),
            items: order.items,
            subtotal: order.subtotal,
            shipping_fee: order.shipping_fee,
            total: order.total,
            payment_method: order.payment_method.name().to_string(),
            payment_reference: order.payment_reference,
            created_at: time::millis_to_rfc3339(order.created_at),
        }
    }
}

/// POST /api/orders - consume a checkout lock into an order
pub async fn create(
    State(state): State<ServerState>,
    Json(request): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderSummary>>> {
    let confirmed = request.payment_confirmation.unwrap_or(false);
    let order = state
        .finalizer
        .finalize(&request.token, confirmed)
        .await
        .map_err(AppError::from)?;

    Ok(Json(ApiResponse::success(OrderSummary::from(order))))
}
