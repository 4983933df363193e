//! Cart Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A line in a shopping cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Sellable unit reference (String ID)
    pub unit: String,
    pub quantity: i64,
}

/// Shipping option chosen on the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingSelection {
    pub method: String,
    pub fee: Decimal,
}

/// How the customer intends to pay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Transfer,
    Cash,
}

impl PaymentMethod {
    /// Card payments must be authorized with the provider before a lock
    /// is handed out; transfer and cash settle out of band.
    pub fn requires_authorization(&self) -> bool {
        matches!(self, Self::Card)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Transfer => "transfer",
            Self::Cash => "cash",
        }
    }
}

/// Cart entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub session_id: String,
    pub items: Vec<CartItem>,
    pub shipping: Option<ShippingSelection>,
    pub payment_method: Option<PaymentMethod>,
    /// Unix millis of last mutation
    pub updated_at: i64,
}

impl Cart {
    /// Total quantity requested for `unit` across all lines.
    pub fn quantity_of(&self, unit: &str) -> i64 {
        self.items
            .iter()
            .filter(|i| i.unit == unit)
            .map(|i| i.quantity)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_serde() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Card).unwrap(),
            "\"card\""
        );
        let m: PaymentMethod = serde_json::from_str("\"transfer\"").unwrap();
        assert_eq!(m, PaymentMethod::Transfer);
    }

    #[test]
    fn test_requires_authorization() {
        assert!(PaymentMethod::Card.requires_authorization());
        assert!(!PaymentMethod::Transfer.requires_authorization());
        assert!(!PaymentMethod::Cash.requires_authorization());
    }

    #[test]
    fn test_quantity_of_sums_duplicate_lines() {
        let cart = Cart {
            id: None,
            session_id: "s1".into(),
            items: vec![
                CartItem {
                    unit: "product:a".into(),
                    quantity: 2,
                },
                CartItem {
                    unit: "product:b".into(),
                    quantity: 1,
                },
                CartItem {
                    unit: "product:a".into(),
                    quantity: 3,
                },
            ],
            shipping: None,
            payment_method: None,
            updated_at: 0,
        };
        assert_eq!(cart.quantity_of("product:a"), 5);
        assert_eq!(cart.quantity_of("product:b"), 1);
        assert_eq!(cart.quantity_of("product:c"), 0);
    }
}
