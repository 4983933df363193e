//! Utilities
//!
//! - [`logger`] - tracing setup
//! - [`time`] - timestamp helpers
//!
//! Error types come from `shared::error` and are re-exported here for
//! handler convenience.

pub mod logger;
pub mod time;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
