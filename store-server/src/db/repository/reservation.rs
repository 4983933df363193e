//! Reservation Repository
//!
//! Persistence for checkout locks. Every state transition out of
//! `active` goes through a conditional UPDATE so the first writer wins
//! and terminal states stay terminal.

use std::collections::HashMap;

use super::{BaseRepository, RepoError, RepoResult};
use shared::models::Reservation;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "reservation";

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new reservation, keyed by its token
    pub async fn create(&self, reservation: Reservation) -> RepoResult<Reservation> {
        let token = reservation.token.clone();
        let mut result = self
            .base
            .db()
            .query(
                "CREATE type::thing($tb, $lock_token) CONTENT $data \
                 RETURN *, type::string(id) AS id",
            )
            .bind(("tb", TABLE))
            .bind(("lock_token", token))
            .bind(("data", reservation))
            .await?;
        let created: Vec<Reservation> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create reservation".to_string()))
    }

    /// Look up a reservation by its token
    pub async fn find_by_token(&self, token: &str) -> RepoResult<Option<Reservation>> {
        let mut result = self
            .base
            .db()
            .query("SELECT *, type::string(id) AS id FROM type::thing($tb, $lock_token)")
            .bind(("tb", TABLE))
            .bind(("lock_token", token.to_string()))
            .await?;
        let rows: Vec<Reservation> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Retire every active lock a cart still holds
    ///
    /// Past-deadline locks are flipped to `expired`, live ones to
    /// `cancelled`. Returns the locks that were cancelled.
    pub async fn cancel_active_for_cart(
        &self,
        cart_id: &str,
        now: i64,
    ) -> RepoResult<Vec<Reservation>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE reservation SET status = 'expired' \
                 WHERE cart = $cart AND status = 'active' AND expires_at <= $now \
                 RETURN NONE;
                 UPDATE reservation SET status = 'cancelled' \
                 WHERE cart = $cart AND status = 'active' \
                 RETURN *, type::string(id) AS id;",
            )
            .bind(("cart", cart_id.to_string()))
            .bind(("now", now))
            .await?;
        let cancelled: Vec<Reservation> = result.take(1)?;
        Ok(cancelled)
    }

    /// Cancel one lock if it is still active and within its deadline
    ///
    /// Returns the updated record, or None when the lock was already
    /// terminal (or past its deadline, or unknown).
    pub async fn cancel(&self, token: &str, now: i64) -> RepoResult<Option<Reservation>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE type::thing($tb, $lock_token) SET status = 'cancelled' \
                 WHERE status = 'active' AND expires_at > $now \
                 RETURN *, type::string(id) AS id",
            )
            .bind(("tb", TABLE))
            .bind(("lock_token", token.to_string()))
            .bind(("now", now))
            .await?;
        let rows: Vec<Reservation> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Flip one past-deadline lock to `expired` if the sweeper has not
    /// visited it yet
    pub async fn expire_if_due(&self, token: &str, now: i64) -> RepoResult<Option<Reservation>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE type::thing($tb, $lock_token) SET status = 'expired' \
                 WHERE status = 'active' AND expires_at <= $now \
                 RETURN *, type::string(id) AS id",
            )
            .bind(("tb", TABLE))
            .bind(("lock_token", token.to_string()))
            .bind(("now", now))
            .await?;
        let rows: Vec<Reservation> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Expire every overdue active lock, returning how many were flipped
    pub async fn expire_due(&self, now: i64) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE reservation SET status = 'expired' \
                 WHERE status = 'active' AND expires_at <= $now \
                 RETURN type::string(id) AS id",
            )
            .bind(("now", now))
            .await?;

        #[derive(serde::Deserialize)]
        struct IdRow {
            #[allow(dead_code)]
            id: String,
        }
        let rows: Vec<IdRow> = result.take(0)?;
        Ok(rows.len())
    }

    /// Quantities of `units` held by other carts' live locks
    ///
    /// Only active locks within their deadline count toward a hold; the
    /// clock decides, not the sweeper.
    pub async fn active_holds(
        &self,
        units: &[String],
        exclude_cart: &str,
        now: i64,
    ) -> RepoResult<HashMap<String, i64>> {
        #[derive(serde::Deserialize)]
        struct HeldItem {
            unit: String,
            quantity: i64,
        }
        #[derive(serde::Deserialize)]
        struct HoldRow {
            items: Vec<HeldItem>,
        }

        let mut result = self
            .base
            .db()
            .query(
                "SELECT items FROM reservation \
                 WHERE status = 'active' AND expires_at > $now AND cart != $cart",
            )
            .bind(("now", now))
            .bind(("cart", exclude_cart.to_string()))
            .await?;
        let rows: Vec<HoldRow> = result.take(0)?;

        let mut holds: HashMap<String, i64> = HashMap::new();
        for row in rows {
            for item in row.items {
                if units.contains(&item.unit) {
                    *holds.entry(item.unit).or_insert(0) += item.quantity;
                }
            }
        }
        Ok(holds)
    }

    /// Test hook shared with the sweeper tests: move a lock's deadline
    pub async fn set_expires_at(&self, token: &str, expires_at: i64) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE type::thing($tb, $lock_token) SET expires_at = $expires_at")
            .bind(("tb", TABLE))
            .bind(("lock_token", token.to_string()))
            .bind(("expires_at", expires_at))
            .await?
            .check()?;
        Ok(())
    }
}
