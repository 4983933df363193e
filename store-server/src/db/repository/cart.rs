//! Cart Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use shared::models::Cart;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a cart
    pub async fn create(&self, cart: Cart) -> RepoResult<Cart> {
        let mut result = self
            .base
            .db()
            .query("CREATE cart CONTENT $data RETURN *, type::string(id) AS id")
            .bind(("data", cart))
            .await?;
        let created: Vec<Cart> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create cart".to_string()))
    }

    /// Find a cart by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Cart>> {
        let rid = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT *, type::string(id) AS id FROM $id")
            .bind(("id", rid))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Find the cart bound to a browsing session
    pub async fn find_by_session(&self, session_id: &str) -> RepoResult<Option<Cart>> {
        let mut result = self
            .base
            .db()
            .query("SELECT *, type::string(id) AS id FROM cart WHERE session_id = $session")
            .bind(("session", session_id.to_string()))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Empty a cart after its order has been placed
    pub async fn clear(&self, id: &str, now: i64) -> RepoResult<()> {
        let rid = parse_record_id(id)?;
        self.base
            .db()
            .query("UPDATE $id SET items = [], updated_at = $now")
            .bind(("id", rid))
            .bind(("now", now))
            .await?
            .check()?;
        Ok(())
    }
}
