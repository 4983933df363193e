//! Order Finalizer
//!
//! Consumes an active checkout lock and converts it into an order inside
//! one database transaction: flip the lock to `used`, decrement stock
//! with a conditional guard per unit, create the order, clear the cart.
//! Any failure rolls the whole thing back.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;

use shared::models::{LockStatus, Order, OrderStatus, Reservation, ShortfallItem};

use crate::checkout::CheckoutError;
use crate::db::repository::{
    OrderRepository, ProductRepository, RepoError, ReservationRepository, parse_record_id,
};
use crate::utils::time::now_millis;

const LOCK_UNAVAILABLE: &str = "lock_unavailable";
const STOCK_CHANGED: &str = "stock_changed";

pub struct OrderFinalizer {
    db: Surreal<Db>,
}

impl OrderFinalizer {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Finalize a checkout lock into an order
    ///
    /// `payment_confirmed` marks the order as paid up front; a lock that
    /// carries a payment pre-authorization is treated as confirmed too.
    /// Expiry is judged by the clock: an `active` lock past its deadline
    /// fails the same way as one the sweeper already flipped.
    pub async fn finalize(
        &self,
        token: &str,
        payment_confirmed: bool,
    ) -> Result<Order, CheckoutError> {
        let now = now_millis();
        let reservation_repo = ReservationRepository::new(self.db.clone());

        let reservation = reservation_repo
            .find_by_token(token)
            .await?
            .ok_or(CheckoutError::LockExpired)?;

        match reservation.status {
            LockStatus::Expired => return Err(CheckoutError::LockExpired),
            LockStatus::Used | LockStatus::Cancelled => {
                return Err(CheckoutError::LockAlreadyUsed);
            }
            LockStatus::Active if reservation.is_past_deadline(now) => {
                // Don't wait for the sweeper
                let _ = reservation_repo.expire_if_due(token, now).await;
                return Err(CheckoutError::LockExpired);
            }
            LockStatus::Active => {}
        }

        let order_key = Uuid::new_v4().simple().to_string();
        let order_id = format!("order:{order_key}");
        let confirmed = payment_confirmed || reservation.payment_reference.is_some();

        let cart_rid = parse_record_id(&reservation.cart)?;
        let unit_rids = reservation
            .items
            .iter()
            .map(|i| parse_record_id(&i.unit))
            .collect::<Result<Vec<_>, _>>()?;

        match self
            .run_commit(&reservation, token, now, &order_key, confirmed, cart_rid, unit_rids)
            .await
        {
            Ok(()) => {}
            Err(e) => return Err(self.classify_commit_error(token, &reservation, e).await),
        }

        let order = OrderRepository::new(self.db.clone())
            .find_by_id(&order_id)
            .await?
            .ok_or_else(|| RepoError::Database("Order vanished after commit".to_string()))?;

        tracing::info!(
            token = %token,
            order = %order_id,
            status = %order.status.name(),
            "Order finalized"
        );
        Ok(order)
    }

    /// Execute the commit transaction; returns the raw database error on
    /// rollback so the caller can classify it
    #[allow(clippy::too_many_arguments)]
    async fn run_commit(
        &self,
        reservation: &Reservation,
        token: &str,
        now: i64,
        order_key: &str,
        confirmed: bool,
        cart_rid: surrealdb::RecordId,
        unit_rids: Vec<surrealdb::RecordId>,
    ) -> Result<(), surrealdb::Error> {
        let mut sql = String::from(
            "BEGIN;\n\
             LET $res = (UPDATE type::thing('reservation', $lock_token) \
             SET status = 'used', used_at = $now \
             WHERE status = 'active' AND expires_at > $now RETURN AFTER);\n\
             IF array::len($res) = 0 { THROW 'lock_unavailable' };\n",
        );
        for i in 0..reservation.items.len() {
            sql.push_str(&format!(
                "LET $u{i} = (UPDATE $unit{i} SET stock -= $qty{i} \
                 WHERE stock >= $qty{i} RETURN AFTER);\n\
                 IF array::len($u{i}) = 0 {{ THROW 'stock_changed' }};\n"
            ));
        }
        sql.push_str(
            "CREATE type::thing('order', $order_key) CONTENT $order;\n\
             UPDATE $cart SET items = [], updated_at = $now;\n\
             COMMIT;",
        );

        let order = Order {
            id: None,
            cart: reservation.cart.clone(),
            lock_token: token.to_string(),
            items: reservation.items.clone(),
            subtotal: reservation.subtotal,
            shipping_fee: reservation.shipping_fee,
            total: reservation.total,
            payment_method: reservation.payment_method,
            payment_reference: reservation.payment_reference.clone(),
            status: if confirmed {
                OrderStatus::Paid
            } else {
                OrderStatus::PendingVerification
            },
            created_at: now,
        };

        let mut query = self
            .db
            .query(sql)
            .bind(("lock_token", token.to_string()))
            .bind(("now", now))
            .bind(("order_key", order_key.to_string()))
            .bind(("order", order))
            .bind(("cart", cart_rid));

        for (i, (rid, item)) in unit_rids.into_iter().zip(&reservation.items).enumerate() {
            query = query
                .bind((format!("unit{i}"), rid))
                .bind((format!("qty{i}"), item.quantity));
        }

        let response = query.await?;
        response.check()?;
        Ok(())
    }

    /// Map a rolled-back commit onto the checkout error taxonomy
    async fn classify_commit_error(
        &self,
        token: &str,
        reservation: &Reservation,
        err: surrealdb::Error,
    ) -> CheckoutError {
        let message = err.to_string();

        if message.contains(LOCK_UNAVAILABLE) {
            // Someone else won the transition race; report what they did
            let repo = ReservationRepository::new(self.db.clone());
            return match repo.find_by_token(token).await {
                Ok(Some(r)) => match r.status {
                    LockStatus::Used | LockStatus::Cancelled => CheckoutError::LockAlreadyUsed,
                    _ => CheckoutError::LockExpired,
                },
                _ => CheckoutError::LockExpired,
            };
        }

        if message.contains(STOCK_CHANGED) {
            return CheckoutError::StockChanged(self.stock_changed_details(reservation).await);
        }

        CheckoutError::Repo(RepoError::Database(message))
    }

    /// Re-read stock after rollback to tell the client which units shrank
    async fn stock_changed_details(&self, reservation: &Reservation) -> Vec<ShortfallItem> {
        let product_repo = ProductRepository::new(self.db.clone());
        let mut details = Vec::new();
        for item in &reservation.items {
            if let Ok(Some(p)) = product_repo.find_by_id(&item.unit).await
                && p.stock < item.quantity
            {
                details.push(ShortfallItem {
                    unit: item.unit.clone(),
                    name: p.name,
                    requested: item.quantity,
                    available: p.stock.max(0),
                });
            }
        }
        details
    }
}
