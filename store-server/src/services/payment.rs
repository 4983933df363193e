//! Payment Gateway
//!
//! Card checkouts are pre-authorized with the payment provider before a
//! lock is handed out; the authorization reference is stored on the
//! reservation and echoed onto the order at finalization.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::core::Config;

const DEFAULT_CURRENCY: &str = "eur";

/// A successful pre-authorization from the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAuthorization {
    /// Provider-side reference for the held funds
    pub reference: String,
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment provider is not configured")]
    NotConfigured,

    #[error("Payment provider error: {0}")]
    Gateway(String),
}

/// Client side of the payment provider
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Place a hold on `amount` for the checkout identified by `lock_token`
    async fn authorize(
        &self,
        amount: Decimal,
        lock_token: &str,
    ) -> Result<PaymentAuthorization, PaymentError>;
}

/// HTTP client for the real provider
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpPaymentGateway {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Serialize)]
struct IntentRequest<'a> {
    amount: Decimal,
    currency: &'a str,
    reference: &'a str,
}

#[derive(Deserialize)]
struct IntentResponse {
    id: String,
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn authorize(
        &self,
        amount: Decimal,
        lock_token: &str,
    ) -> Result<PaymentAuthorization, PaymentError> {
        let url = format!("{}/intents", self.endpoint.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&IntentRequest {
                amount,
                currency: DEFAULT_CURRENCY,
                reference: lock_token,
            })
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Gateway(format!(
                "provider returned {status}: {body}"
            )));
        }

        let intent: IntentResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;

        tracing::info!(reference = %intent.id, %amount, "Payment pre-authorized");

        Ok(PaymentAuthorization {
            reference: intent.id,
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
        })
    }
}

/// Placeholder used when no provider is configured
///
/// Card checkouts fail fast; other methods never reach the gateway.
pub struct UnconfiguredGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredGateway {
    async fn authorize(
        &self,
        _amount: Decimal,
        _lock_token: &str,
    ) -> Result<PaymentAuthorization, PaymentError> {
        Err(PaymentError::NotConfigured)
    }
}

/// Build the gateway the configuration asks for
pub fn payment_gateway_from_config(config: &Config) -> Arc<dyn PaymentGateway> {
    match (&config.payment_endpoint, &config.payment_api_key) {
        (Some(endpoint), Some(key)) => Arc::new(HttpPaymentGateway::new(endpoint, key)),
        _ => {
            tracing::warn!("Payment provider not configured, card checkout disabled");
            Arc::new(UnconfiguredGateway)
        }
    }
}
