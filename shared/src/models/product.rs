//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sellable unit entity
///
/// A variant is a regular row with `parent` pointing at its base product;
/// stock and price always live on the row being sold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Unit price at the current moment (not frozen anywhere here)
    pub price: Decimal,
    /// On-hand stock, the authoritative count decremented at finalization
    pub stock: i64,
    /// Base product reference when this row is a variant
    pub parent: Option<String>,
    pub is_active: bool,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
    pub parent: Option<String>,
}
