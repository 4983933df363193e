//! External service clients

pub mod payment;

pub use payment::{
    PaymentAuthorization, PaymentError, PaymentGateway, payment_gateway_from_config,
};
