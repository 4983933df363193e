//! Reservation Model
//!
//! A reservation is the durable side of a checkout lock: a short-lived
//! soft hold on stock with totals frozen at creation time.

use super::cart::PaymentMethod;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a reservation
///
/// `Active` is the only non-terminal state. Once a reservation leaves it,
/// the record never changes state again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockStatus {
    Active,
    Used,
    Cancelled,
    Expired,
}

impl LockStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Used => "used",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

/// A held line item with its price frozen at lock time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservedItem {
    /// Sellable unit reference (String ID)
    pub unit: String,
    pub quantity: i64,
    /// Unit price captured when the lock was created
    pub unit_price: Decimal,
}

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Opaque lock token handed to the client
    pub token: String,
    /// Cart reference (String ID)
    pub cart: String,
    pub status: LockStatus,
    pub items: Vec<ReservedItem>,
    pub payment_method: PaymentMethod,
    /// Totals frozen at creation, never recomputed
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
    /// Provider reference when the payment was pre-authorized
    pub payment_reference: Option<String>,
    /// Unix millis
    pub created_at: i64,
    pub expires_at: i64,
    pub used_at: Option<i64>,
}

impl Reservation {
    /// Whether the deadline has passed at `now` (Unix millis).
    ///
    /// The stored status may still read `active`; expiry is decided by the
    /// clock, not by the sweeper having visited the row.
    pub fn is_past_deadline(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

/// One unit the stock check could not cover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortfallItem {
    pub unit: String,
    pub name: String,
    pub requested: i64,
    pub available: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_status_terminal() {
        assert!(!LockStatus::Active.is_terminal());
        assert!(LockStatus::Used.is_terminal());
        assert!(LockStatus::Cancelled.is_terminal());
        assert!(LockStatus::Expired.is_terminal());
    }

    #[test]
    fn test_lock_status_serde() {
        assert_eq!(
            serde_json::to_string(&LockStatus::Active).unwrap(),
            "\"active\""
        );
        let s: LockStatus = serde_json::from_str("\"expired\"").unwrap();
        assert_eq!(s, LockStatus::Expired);
    }

    #[test]
    fn test_past_deadline_is_inclusive() {
        let r = Reservation {
            id: None,
            token: "lock_x".into(),
            cart: "cart:c1".into(),
            status: LockStatus::Active,
            items: vec![],
            payment_method: PaymentMethod::Cash,
            subtotal: Decimal::ZERO,
            shipping_fee: Decimal::ZERO,
            total: Decimal::ZERO,
            payment_reference: None,
            created_at: 0,
            expires_at: 1000,
            used_at: None,
        };
        assert!(!r.is_past_deadline(999));
        assert!(r.is_past_deadline(1000));
        assert!(r.is_past_deadline(1001));
    }
}
