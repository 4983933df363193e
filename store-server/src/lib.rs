//! Store Server - storefront checkout backend
//!
//! # Overview
//!
//! - **Checkout locks** (`checkout`): short-lived stock reservations with
//!   cancel-and-replace semantics, a background expiry sweeper, and an
//!   atomic order finalizer
//! - **Database** (`db`): embedded SurrealDB storage
//! - **HTTP API** (`api`): lock lifecycle and order endpoints
//!
//! # Module structure
//!
//! ```text
//! store-server/src/
//! ├── core/          # config, state, server, background tasks
//! ├── checkout/      # reservation manager, finalizer, sweeper
//! ├── services/      # payment gateway client
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # database layer
//! └── utils/         # logging, time helpers
//! ```

pub mod api;
pub mod checkout;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export public types
pub use checkout::{ExpirySweeper, OrderFinalizer, ReservationManager};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: .env, working directory, logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.to_str());

    Ok(())
}
