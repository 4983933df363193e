//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::CartNotFound | Self::OrderNotFound | Self::ProductNotFound => {
                StatusCode::NOT_FOUND
            }

            // 410 Gone — the lock deadline has passed and cannot be extended
            Self::LockExpired => StatusCode::GONE,

            // 409 Conflict — stock or lifecycle contention, client must adjust and retry
            Self::AlreadyExists
            | Self::LockAlreadyUsed
            | Self::StockUnavailable
            | Self::StockChanged => StatusCode::CONFLICT,

            // 422 Unprocessable Entity — checkout preconditions on the cart
            Self::ValidationFailed
            | Self::CartEmpty
            | Self::CartMissingShipping
            | Self::CartMissingPaymentMethod
            | Self::ProductInvalidPrice
            | Self::ProductOutOfStock => StatusCode::UNPROCESSABLE_ENTITY,

            // 400 Bad Request
            Self::Unknown
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::PaymentInvalidMethod => StatusCode::BAD_REQUEST,

            // 502 Bad Gateway — upstream payment provider failed
            Self::PaymentFailed | Self::PaymentAuthorizationFailed => StatusCode::BAD_GATEWAY,

            // 503 Service Unavailable
            Self::PaymentNotConfigured => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::OrderCreateFailed
            | Self::InternalError
            | Self::DatabaseError
            | Self::NetworkError
            | Self::TimeoutError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
        assert_eq!(ErrorCode::CartNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::LockExpired.http_status(), StatusCode::GONE);
        assert_eq!(ErrorCode::LockAlreadyUsed.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::StockUnavailable.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::CartEmpty.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::PaymentAuthorizationFailed.http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
