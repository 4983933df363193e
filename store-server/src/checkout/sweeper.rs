//! Expiry Sweeper
//!
//! Catch-up sweep at startup, then a fixed-interval loop. The sweeper is
//! the backstop for clients that never release their lock; finalize and
//! cancel judge expiry by the clock, so a late sweep never lets a stale
//! lock through.

use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio_util::sync::CancellationToken;

use crate::db::repository::ReservationRepository;
use crate::utils::time::now_millis;

/// Registered as `TaskKind::Periodic` in `start_background_tasks()`
pub struct ExpirySweeper {
    db: Surreal<Db>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl ExpirySweeper {
    pub fn new(db: Surreal<Db>, interval: Duration, shutdown: CancellationToken) -> Self {
        Self {
            db,
            interval,
            shutdown,
        }
    }

    /// Main loop: startup catch-up, then periodic sweeps
    pub async fn run(self) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Expiry sweeper started");

        // Catch up on anything that went overdue while we were down
        self.sweep_once().await;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Expiry sweeper received shutdown signal");
                    return;
                }
            }
            self.sweep_once().await;
        }
    }

    /// Expire every overdue active lock
    ///
    /// Uses the same status-guarded transition as cancel and finalize, so
    /// racing against either is safe: the first transition wins.
    pub async fn sweep_once(&self) {
        let now = now_millis();
        let repo = ReservationRepository::new(self.db.clone());
        match repo.expire_due(now).await {
            Ok(0) => tracing::debug!("Expiry sweep found nothing overdue"),
            Ok(count) => tracing::info!(count, "Expired overdue checkout locks"),
            Err(e) => tracing::error!(error = %e, "Expiry sweep failed"),
        }
    }
}
