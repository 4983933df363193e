//! Order Model

use super::cart::PaymentMethod;
use super::reservation::ReservedItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settlement state of a finalized order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Payment confirmed at finalization
    Paid,
    /// Placed without upfront confirmation (transfer, cash on delivery)
    PendingVerification,
}

impl OrderStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::PendingVerification => "pending_verification",
        }
    }
}

/// Order entity
///
/// Items and totals are copied verbatim from the reservation that backed
/// the order, so the customer pays exactly what the lock quoted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Cart reference (String ID)
    pub cart: String,
    /// Token of the lock this order consumed
    pub lock_token: String,
    pub items: Vec<ReservedItem>,
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_reference: Option<String>,
    pub status: OrderStatus,
    /// Unix millis
    pub created_at: i64,
}
