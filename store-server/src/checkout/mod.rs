//! Checkout stock reservation
//!
//! The "cart lock" subsystem. A lock is a short-lived soft hold on stock
//! with totals frozen at creation:
//!
//! - [`ReservationManager`] - create and cancel locks
//! - [`OrderFinalizer`] - consume a lock into an order plus a stock commit
//! - [`ExpirySweeper`] - background expiry of abandoned locks
//!
//! Stock is never decremented by a lock. Holds only count against the
//! sufficiency check; the permanent decrement happens inside the finalize
//! transaction.

pub mod error;
pub mod finalizer;
pub mod manager;
pub mod sweeper;

#[cfg(test)]
mod tests;

pub use error::CheckoutError;
pub use finalizer::OrderFinalizer;
pub use manager::{CancelOutcome, CreatedLock, ReservationManager};
pub use sweeper::ExpirySweeper;
