//! Data models
//!
//! Shared between store-server and frontend (via API).
//! Record IDs are opaque strings (`table:key`), money is `rust_decimal::Decimal`,
//! timestamps are Unix milliseconds.

pub mod cart;
pub mod order;
pub mod product;
pub mod reservation;

// Re-exports
pub use cart::*;
pub use order::*;
pub use product::*;
pub use reservation::*;
