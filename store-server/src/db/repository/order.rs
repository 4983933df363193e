//! Order Repository

use super::{BaseRepository, RepoResult, parse_record_id};
use shared::models::Order;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find an order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT *, type::string(id) AS id FROM $id")
            .bind(("id", rid))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Find the order that consumed a given lock token
    pub async fn find_by_lock_token(&self, token: &str) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            // `order` collides with the ORDER keyword, so bind it as a table value
            .query("SELECT *, type::string(id) AS id FROM type::table($tb) WHERE lock_token = $lock_token")
            .bind(("tb", "order"))
            .bind(("lock_token", token.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }
}
