use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::checkout::{ExpirySweeper, OrderFinalizer, ReservationManager};
use crate::core::{BackgroundTasks, Config, TaskKind};
use crate::db::DbService;
use crate::services::{PaymentGateway, payment_gateway_from_config};

/// Server state - shared handles to every service
///
/// Cloning is cheap: everything inside is either `Clone` over a handle
/// or behind an `Arc`.
///
/// | Field | Description |
/// |-------|-------------|
/// | config | Immutable configuration |
/// | db | Embedded SurrealDB |
/// | payment | Payment provider client |
/// | reservations | Checkout lock manager |
/// | finalizer | Order finalization service |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub payment: Arc<dyn PaymentGateway>,
    pub reservations: Arc<ReservationManager>,
    pub finalizer: Arc<OrderFinalizer>,
}

impl ServerState {
    /// Initialize the server state
    ///
    /// Order of operations:
    /// 1. working directory layout
    /// 2. embedded database (work_dir/database/store.db)
    /// 3. payment gateway from config
    /// 4. checkout services
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be opened; the server is useless
    /// without it.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("store.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        let payment = payment_gateway_from_config(config);
        let reservations = Arc::new(ReservationManager::new(
            db.clone(),
            payment.clone(),
            std::time::Duration::from_secs(config.lock_ttl_secs),
        ));
        let finalizer = Arc::new(OrderFinalizer::new(db.clone()));

        Self {
            config: config.clone(),
            db,
            payment,
            reservations,
            finalizer,
        }
    }

    /// Start background tasks
    ///
    /// Must be called before [`crate::core::Server::run`]. Currently
    /// registers the expiry sweeper.
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let sweeper = ExpirySweeper::new(
            self.db.clone(),
            std::time::Duration::from_secs(self.config.sweep_interval_secs),
            tasks.shutdown_token(),
        );
        tasks.spawn("expiry_sweeper", TaskKind::Periodic, async move {
            sweeper.run().await;
        });

        tasks.log_summary();
        tasks
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
