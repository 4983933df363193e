//! Checkout error types

use shared::error::{AppError, ErrorCode};
use shared::models::ShortfallItem;
use thiserror::Error;

use crate::db::repository::RepoError;
use crate::services::PaymentError;

/// Errors from the reservation manager and order finalizer
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart {0} not found")]
    CartNotFound(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Cart has no shipping selection")]
    MissingShipping,

    #[error("Cart has no payment method")]
    MissingPaymentMethod,

    /// Sufficiency check failed at lock creation
    #[error("Insufficient stock for {} unit(s)", .0.len())]
    StockShortfall(Vec<ShortfallItem>),

    /// Token unknown, or the lock's deadline has passed
    #[error("Checkout lock has expired")]
    LockExpired,

    /// Lock already consumed or released
    #[error("Checkout lock was already used or released")]
    LockAlreadyUsed,

    /// Stock dropped below the reserved snapshot between lock and finalize
    #[error("Stock changed for {} unit(s) while the lock was held", .0.len())]
    StockChanged(Vec<ShortfallItem>),

    #[error("Payment provider is not configured")]
    PaymentNotConfigured,

    #[error("Payment authorization failed: {0}")]
    PaymentAuthorization(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<PaymentError> for CheckoutError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::NotConfigured => CheckoutError::PaymentNotConfigured,
            PaymentError::Gateway(msg) => CheckoutError::PaymentAuthorization(msg),
        }
    }
}

fn shortfall_details(items: &[ShortfallItem]) -> serde_json::Value {
    serde_json::to_value(items).unwrap_or(serde_json::Value::Null)
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::CartNotFound(id) => {
                AppError::new(ErrorCode::CartNotFound).with_detail("cart", id)
            }
            CheckoutError::EmptyCart => {
                AppError::new(ErrorCode::CartEmpty).with_detail("missing", "items")
            }
            CheckoutError::MissingShipping => {
                AppError::new(ErrorCode::CartMissingShipping).with_detail("missing", "shipping")
            }
            CheckoutError::MissingPaymentMethod => {
                AppError::new(ErrorCode::CartMissingPaymentMethod)
                    .with_detail("missing", "payment_method")
            }
            CheckoutError::StockShortfall(items) => AppError::new(ErrorCode::StockUnavailable)
                .with_detail("items", shortfall_details(&items)),
            CheckoutError::LockExpired => AppError::new(ErrorCode::LockExpired),
            CheckoutError::LockAlreadyUsed => AppError::new(ErrorCode::LockAlreadyUsed),
            CheckoutError::StockChanged(items) => AppError::new(ErrorCode::StockChanged)
                .with_detail("items", shortfall_details(&items)),
            CheckoutError::PaymentNotConfigured => AppError::new(ErrorCode::PaymentNotConfigured),
            CheckoutError::PaymentAuthorization(msg) => {
                AppError::with_message(ErrorCode::PaymentAuthorizationFailed, msg)
            }
            CheckoutError::Repo(e) => AppError::database(e.to_string()),
        }
    }
}
