//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use shared::models::{Product, ProductCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new sellable unit
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.stock < 0 {
            return Err(RepoError::Validation("stock cannot be negative".into()));
        }

        let product = Product {
            id: None,
            name: data.name,
            price: data.price,
            stock: data.stock,
            parent: data.parent,
            is_active: true,
        };

        let mut result = self
            .base
            .db()
            .query("CREATE product CONTENT $data RETURN *, type::string(id) AS id")
            .bind(("data", product))
            .await?;
        let created: Vec<Product> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Find a unit by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let rid = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT *, type::string(id) AS id FROM $id")
            .bind(("id", rid))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Fetch several units at once, preserving nothing about order
    pub async fn find_many(&self, ids: &[String]) -> RepoResult<Vec<Product>> {
        let rids = ids
            .iter()
            .map(|id| parse_record_id(id))
            .collect::<RepoResult<Vec<_>>>()?;
        let mut result = self
            .base
            .db()
            .query("SELECT *, type::string(id) AS id FROM product WHERE id IN $ids")
            .bind(("ids", rids))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products)
    }

    /// Overwrite the on-hand stock of a unit
    pub async fn set_stock(&self, id: &str, stock: i64) -> RepoResult<Product> {
        let rid = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET stock = $stock RETURN *, type::string(id) AS id")
            .bind(("id", rid))
            .bind(("stock", stock))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }
}
