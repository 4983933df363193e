//! Database Module
//!
//! Embedded SurrealDB storage (RocksDB on disk, in-memory for tests).

pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use shared::error::AppError;

const NAMESPACE: &str = "store";
const DATABASE: &str = "store";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::setup(&db).await?;
        tracing::info!("Database connection established ({db_path})");

        Ok(Self { db })
    }

    /// Open a fresh in-memory database, used by tests
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        Self::setup(&db).await?;

        Ok(Self { db })
    }

    async fn setup(db: &Surreal<Db>) -> Result<(), AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        // Indexes for the hot lookups: carts by session, reservations by
        // token lifecycle and by cart.
        db.query(
            "
            DEFINE INDEX IF NOT EXISTS cart_session ON TABLE cart FIELDS session_id UNIQUE;
            DEFINE INDEX IF NOT EXISTS reservation_status ON TABLE reservation FIELDS status;
            DEFINE INDEX IF NOT EXISTS reservation_cart ON TABLE reservation FIELDS cart, status;
            ",
        )
        .await
        .map_err(|e| AppError::database(format!("Failed to define indexes: {e}")))?;

        Ok(())
    }
}
