//! Shared types for the storefront backend
//!
//! Common types used across the server and clients: domain models
//! (product, cart, reservation, order), the unified error system and
//! the API response envelope.

pub mod error;
pub mod models;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
