//! Unified error codes for the storefront backend
//!
//! This module defines all error codes used across the server and clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Cart errors
//! - 3xxx: Checkout / reservation errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product / stock errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 2xxx: Cart ====================
    /// Cart not found for the session
    CartNotFound = 2001,
    /// Cart has no items
    CartEmpty = 2002,
    /// Cart has no shipping/delivery selection
    CartMissingShipping = 2003,
    /// Cart has no payment method selected
    CartMissingPaymentMethod = 2004,

    // ==================== 3xxx: Checkout / Reservation ====================
    /// Reservation token is unknown or past its deadline
    LockExpired = 3001,
    /// Reservation was already consumed or cancelled
    LockAlreadyUsed = 3002,
    /// One or more units lack sufficient stock for a new reservation
    StockUnavailable = 3003,
    /// Stock dropped below the reserved snapshot between lock and finalize
    StockChanged = 3004,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order creation failed
    OrderCreateFailed = 4002,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed
    PaymentFailed = 5001,
    /// Invalid payment method
    PaymentInvalidMethod = 5002,
    /// Payment gateway is not configured
    PaymentNotConfigured = 5003,
    /// Upfront payment authorization failed
    PaymentAuthorizationFailed = 5004,

    // ==================== 6xxx: Product / Stock ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Product is out of stock
    ProductOutOfStock = 6003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the stable snake_case wire name for this error code
    ///
    /// Clients branch on this name (e.g. `lock_expired` restarts the
    /// checkout step, `stock_unavailable` shows the shortfall list).
    pub const fn name(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "success",
            ErrorCode::Unknown => "unknown",
            ErrorCode::ValidationFailed => "validation_failed",
            ErrorCode::NotFound => "not_found",
            ErrorCode::AlreadyExists => "already_exists",
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::InvalidFormat => "invalid_format",
            ErrorCode::RequiredField => "required_field",

            // Cart preconditions all share one wire name; the `details`
            // payload identifies the missing field.
            ErrorCode::CartNotFound => "cart_not_found",
            ErrorCode::CartEmpty => "precondition_failed",
            ErrorCode::CartMissingShipping => "precondition_failed",
            ErrorCode::CartMissingPaymentMethod => "precondition_failed",

            // Checkout / reservation
            ErrorCode::LockExpired => "lock_expired",
            ErrorCode::LockAlreadyUsed => "lock_already_used",
            ErrorCode::StockUnavailable => "stock_unavailable",
            ErrorCode::StockChanged => "stock_changed",

            // Order
            ErrorCode::OrderNotFound => "order_not_found",
            ErrorCode::OrderCreateFailed => "order_create_failed",

            // Payment
            ErrorCode::PaymentFailed => "payment_failed",
            ErrorCode::PaymentInvalidMethod => "payment_invalid_method",
            ErrorCode::PaymentNotConfigured => "payment_not_configured",
            ErrorCode::PaymentAuthorizationFailed => "payment_authorization_failed",

            // Product / stock
            ErrorCode::ProductNotFound => "product_not_found",
            ErrorCode::ProductInvalidPrice => "product_invalid_price",
            ErrorCode::ProductOutOfStock => "product_out_of_stock",

            // System
            ErrorCode::InternalError => "internal_error",
            ErrorCode::DatabaseError => "database_error",
            ErrorCode::NetworkError => "network_error",
            ErrorCode::TimeoutError => "timeout",
            ErrorCode::ConfigError => "config_error",
        }
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Cart
            ErrorCode::CartNotFound => "Cart not found",
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::CartMissingShipping => {
                "Shipping or delivery selection is required before checkout"
            }
            ErrorCode::CartMissingPaymentMethod => {
                "Payment method must be selected before checkout"
            }

            // Checkout / reservation
            ErrorCode::LockExpired => "Checkout lock has expired",
            ErrorCode::LockAlreadyUsed => "Checkout lock was already used or released",
            ErrorCode::StockUnavailable => "Some products do not have sufficient stock",
            ErrorCode::StockChanged => "Stock changed while the checkout lock was held",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderCreateFailed => "Failed to create order",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::PaymentNotConfigured => "Payment gateway is not configured",
            ErrorCode::PaymentAuthorizationFailed => "Payment authorization failed",

            // Product / stock
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductOutOfStock => "Product is out of stock",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Cart
            2001 => Ok(ErrorCode::CartNotFound),
            2002 => Ok(ErrorCode::CartEmpty),
            2003 => Ok(ErrorCode::CartMissingShipping),
            2004 => Ok(ErrorCode::CartMissingPaymentMethod),

            // Checkout / reservation
            3001 => Ok(ErrorCode::LockExpired),
            3002 => Ok(ErrorCode::LockAlreadyUsed),
            3003 => Ok(ErrorCode::StockUnavailable),
            3004 => Ok(ErrorCode::StockChanged),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderCreateFailed),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::PaymentInvalidMethod),
            5003 => Ok(ErrorCode::PaymentNotConfigured),
            5004 => Ok(ErrorCode::PaymentAuthorizationFailed),

            // Product / stock
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductOutOfStock),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::CartEmpty.code(), 2002);
        assert_eq!(ErrorCode::LockExpired.code(), 3001);
        assert_eq!(ErrorCode::StockChanged.code(), 3004);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(ErrorCode::CartEmpty.name(), "precondition_failed");
        assert_eq!(ErrorCode::CartMissingShipping.name(), "precondition_failed");
        assert_eq!(ErrorCode::LockExpired.name(), "lock_expired");
        assert_eq!(ErrorCode::LockAlreadyUsed.name(), "lock_already_used");
        assert_eq!(ErrorCode::StockUnavailable.name(), "stock_unavailable");
        assert_eq!(ErrorCode::StockChanged.name(), "stock_changed");
    }

    #[test]
    fn test_try_from_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::CartMissingPaymentMethod,
            ErrorCode::LockAlreadyUsed,
            ErrorCode::StockUnavailable,
            ErrorCode::PaymentNotConfigured,
            ErrorCode::DatabaseError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_serialize_as_u16() {
        let json = serde_json::to_string(&ErrorCode::LockExpired).unwrap();
        assert_eq!(json, "3001");

        let code: ErrorCode = serde_json::from_str("3003").unwrap();
        assert_eq!(code, ErrorCode::StockUnavailable);
    }
}
