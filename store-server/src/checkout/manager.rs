//! Reservation Manager
//!
//! The checkout lock state machine. `create` hands out a short-lived
//! soft hold on the cart's stock, `cancel` releases it. Terminal states
//! are never left; the first transition out of `active` wins.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dashmap::DashMap;
use rand::RngCore;
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::models::{Cart, LockStatus, Product, Reservation, ReservedItem, ShortfallItem};

use crate::checkout::CheckoutError;
use crate::db::repository::{CartRepository, ProductRepository, ReservationRepository};
use crate::services::{PaymentAuthorization, PaymentGateway};
use crate::utils::time::now_millis;

/// Result of a successful `create`
#[derive(Debug, Clone)]
pub struct CreatedLock {
    pub reservation: Reservation,
    /// Present when the payment method required upfront authorization
    pub authorization: Option<PaymentAuthorization>,
}

/// Result of `cancel` — never an error for a stale or unknown token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The lock was active and is now cancelled
    Released,
    /// The lock had already reached a terminal state
    AlreadyTerminal(LockStatus),
    /// No such token was ever issued
    NotFound,
}

pub struct ReservationManager {
    db: Surreal<Db>,
    payment: Arc<dyn PaymentGateway>,
    ttl: Duration,
    /// Per-cart gates serializing `create` so two concurrent calls cannot
    /// both pass the cancel-and-replace step
    cart_gates: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
}

impl ReservationManager {
    pub fn new(db: Surreal<Db>, payment: Arc<dyn PaymentGateway>, ttl: Duration) -> Self {
        Self {
            db,
            payment,
            ttl,
            cart_gates: DashMap::new(),
        }
    }

    /// Create a checkout lock for a cart
    ///
    /// Cancel-and-replace: an existing active lock for the same cart is
    /// cancelled first, so a cart re-entering checkout never blocks on
    /// its own previous hold. The sufficiency check counts other carts'
    /// live holds against available stock but never decrements it;
    /// stock only moves at finalization.
    pub async fn create(&self, cart_id: &str) -> Result<CreatedLock, CheckoutError> {
        let gate = self
            .cart_gates
            .entry(cart_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone();
        let _guard = gate.lock().await;

        let cart_repo = CartRepository::new(self.db.clone());
        let cart = cart_repo
            .find_by_id(cart_id)
            .await?
            .ok_or_else(|| CheckoutError::CartNotFound(cart_id.to_string()))?;

        let (shipping, payment_method) = Self::check_preconditions(&cart)?;

        let now = now_millis();
        let reservation_repo = ReservationRepository::new(self.db.clone());

        // Step 1: retire the cart's own previous hold
        let cancelled = reservation_repo.cancel_active_for_cart(cart_id, now).await?;
        for old in &cancelled {
            tracing::info!(token = %old.token, cart = %cart_id, "Replaced previous checkout lock");
        }

        // Step 2: sufficiency against stock minus other carts' live holds
        let items = self.check_sufficiency(&cart, cart_id, now).await?;

        // Totals are frozen here; the order will charge exactly this
        let subtotal: Decimal = items
            .iter()
            .map(|i| i.unit_price * Decimal::from(i.quantity))
            .sum();
        let shipping_fee = shipping.fee;
        let total = subtotal + shipping_fee;

        let token = generate_token();
        let expires_at = now + self.ttl.as_millis() as i64;

        // Step 3: authorize before persisting, so a declined card never
        // leaves an active lock behind
        let authorization = if payment_method.requires_authorization() {
            Some(self.payment.authorize(total, &token).await?)
        } else {
            None
        };

        let reservation = Reservation {
            id: None,
            token: token.clone(),
            cart: cart_id.to_string(),
            status: LockStatus::Active,
            items,
            payment_method,
            subtotal,
            shipping_fee,
            total,
            payment_reference: authorization.as_ref().map(|a| a.reference.clone()),
            created_at: now,
            expires_at,
            used_at: None,
        };

        let reservation = reservation_repo.create(reservation).await?;
        tracing::info!(
            token = %reservation.token,
            cart = %cart_id,
            expires_at = reservation.expires_at,
            "Checkout lock created"
        );

        Ok(CreatedLock {
            reservation,
            authorization,
        })
    }

    /// Release a lock
    ///
    /// Idempotent: a terminal or unknown token reports its state instead
    /// of erroring. Possession of the token is the only authorization.
    pub async fn cancel(&self, token: &str) -> Result<CancelOutcome, CheckoutError> {
        let now = now_millis();
        let repo = ReservationRepository::new(self.db.clone());

        if let Some(r) = repo.cancel(token, now).await? {
            tracing::info!(token = %r.token, "Checkout lock released");
            return Ok(CancelOutcome::Released);
        }

        // Past-deadline lock the sweeper has not visited yet
        if let Some(r) = repo.expire_if_due(token, now).await? {
            return Ok(CancelOutcome::AlreadyTerminal(r.status));
        }

        match repo.find_by_token(token).await? {
            Some(r) => Ok(CancelOutcome::AlreadyTerminal(r.status)),
            None => Ok(CancelOutcome::NotFound),
        }
    }

    fn check_preconditions(
        cart: &Cart,
    ) -> Result<(shared::models::ShippingSelection, shared::models::PaymentMethod), CheckoutError>
    {
        if cart.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let shipping = cart.shipping.clone().ok_or(CheckoutError::MissingShipping)?;
        let payment_method = cart
            .payment_method
            .ok_or(CheckoutError::MissingPaymentMethod)?;
        Ok((shipping, payment_method))
    }

    /// Verify every line fits into stock minus other carts' live holds,
    /// returning the reserved snapshot with frozen prices
    async fn check_sufficiency(
        &self,
        cart: &Cart,
        cart_id: &str,
        now: i64,
    ) -> Result<Vec<ReservedItem>, CheckoutError> {
        let mut units: Vec<String> = cart.items.iter().map(|i| i.unit.clone()).collect();
        units.sort();
        units.dedup();

        let product_repo = ProductRepository::new(self.db.clone());
        let products = product_repo.find_many(&units).await?;

        let reservation_repo = ReservationRepository::new(self.db.clone());
        let holds = reservation_repo.active_holds(&units, cart_id, now).await?;

        let mut shortfalls: Vec<ShortfallItem> = Vec::new();
        let mut items: Vec<ReservedItem> = Vec::new();

        for unit in &units {
            let requested = cart.quantity_of(unit);
            let product = products
                .iter()
                .find(|p| p.id.as_deref() == Some(unit.as_str()))
                .filter(|p| p.is_active);

            match product {
                Some(p) => {
                    let held = holds.get(unit).copied().unwrap_or(0);
                    let available = (p.stock - held).max(0);
                    if requested > available {
                        shortfalls.push(shortfall(p, unit, requested, available));
                    } else {
                        items.push(ReservedItem {
                            unit: unit.clone(),
                            quantity: requested,
                            unit_price: p.price,
                        });
                    }
                }
                None => shortfalls.push(ShortfallItem {
                    unit: unit.clone(),
                    name: unit.clone(),
                    requested,
                    available: 0,
                }),
            }
        }

        if !shortfalls.is_empty() {
            return Err(CheckoutError::StockShortfall(shortfalls));
        }
        Ok(items)
    }
}

fn shortfall(product: &Product, unit: &str, requested: i64, available: i64) -> ShortfallItem {
    ShortfallItem {
        unit: unit.to_string(),
        name: product.name.clone(),
        requested,
        available,
    }
}

/// Generate an unguessable lock token
fn generate_token() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("lock_{}", URL_SAFE_NO_PAD.encode(bytes))
}

#[cfg(test)]
mod token_tests {
    use super::generate_token;

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert!(token.starts_with("lock_"));
        // 16 bytes -> 22 base64url chars, no padding
        assert_eq!(token.len(), 5 + 22);
    }

    #[test]
    fn test_tokens_unique() {
        assert_ne!(generate_token(), generate_token());
    }
}
