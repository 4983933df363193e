use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio_util::sync::CancellationToken;

use shared::models::{
    Cart, CartItem, LockStatus, PaymentMethod, ProductCreate, ShippingSelection,
};

use crate::checkout::{
    CancelOutcome, CheckoutError, ExpirySweeper, OrderFinalizer, ReservationManager,
};
use crate::db::DbService;
use crate::db::repository::{CartRepository, ProductRepository, ReservationRepository};
use crate::services::{PaymentAuthorization, PaymentError, PaymentGateway};
use crate::utils::time::now_millis;

const TTL: Duration = Duration::from_secs(300);

// ========================================================================
// Mock payment gateway
// ========================================================================

struct MockGateway {
    fail: bool,
    calls: AtomicUsize,
}

impl MockGateway {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn authorize(
        &self,
        amount: Decimal,
        lock_token: &str,
    ) -> Result<PaymentAuthorization, PaymentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PaymentError::Gateway("card declined".to_string()));
        }
        Ok(PaymentAuthorization {
            reference: format!("auth_{lock_token}"),
            amount,
            currency: "eur".to_string(),
        })
    }
}

// ========================================================================
// Fixtures
// ========================================================================

async fn test_db() -> Surreal<Db> {
    DbService::memory().await.unwrap().db
}

fn manager(db: &Surreal<Db>) -> ReservationManager {
    ReservationManager::new(db.clone(), MockGateway::ok(), TTL)
}

fn manager_with(db: &Surreal<Db>, gateway: Arc<MockGateway>) -> ReservationManager {
    ReservationManager::new(db.clone(), gateway, TTL)
}

fn sweeper(db: &Surreal<Db>) -> ExpirySweeper {
    ExpirySweeper::new(db.clone(), TTL, CancellationToken::new())
}

async fn seed_product(db: &Surreal<Db>, name: &str, price_cents: i64, stock: i64) -> String {
    ProductRepository::new(db.clone())
        .create(ProductCreate {
            name: name.to_string(),
            price: Decimal::new(price_cents, 2),
            stock,
            parent: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
}

fn standard_shipping() -> ShippingSelection {
    ShippingSelection {
        method: "standard".to_string(),
        fee: Decimal::new(499, 2),
    }
}

async fn seed_cart_with(
    db: &Surreal<Db>,
    session: &str,
    items: &[(&str, i64)],
    shipping: Option<ShippingSelection>,
    payment_method: Option<PaymentMethod>,
) -> String {
    let cart = Cart {
        id: None,
        session_id: session.to_string(),
        items: items
            .iter()
            .map(|(unit, quantity)| CartItem {
                unit: unit.to_string(),
                quantity: *quantity,
            })
            .collect(),
        shipping,
        payment_method,
        updated_at: now_millis(),
    };
    CartRepository::new(db.clone())
        .create(cart)
        .await
        .unwrap()
        .id
        .unwrap()
}

/// Checkout-ready cart: shipping selected, pays by transfer
async fn seed_cart(db: &Surreal<Db>, session: &str, items: &[(&str, i64)]) -> String {
    seed_cart_with(
        db,
        session,
        items,
        Some(standard_shipping()),
        Some(PaymentMethod::Transfer),
    )
    .await
}

// ========================================================================
// Assertion helpers
// ========================================================================

async fn stock_of(db: &Surreal<Db>, unit: &str) -> i64 {
    ProductRepository::new(db.clone())
        .find_by_id(unit)
        .await
        .unwrap()
        .unwrap()
        .stock
}

async fn lock_status(db: &Surreal<Db>, token: &str) -> LockStatus {
    ReservationRepository::new(db.clone())
        .find_by_token(token)
        .await
        .unwrap()
        .unwrap()
        .status
}

/// Move a lock's deadline into the past without waiting for it
async fn backdate_lock(db: &Surreal<Db>, token: &str, expires_at: i64) {
    ReservationRepository::new(db.clone())
        .set_expires_at(token, expires_at)
        .await
        .unwrap();
}

mod test_cancel;
mod test_finalizer;
mod test_sweeper;
