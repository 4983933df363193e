//! Core module - server configuration, state and errors
//!
//! # Structure
//!
//! - [`Config`] - Server configuration
//! - [`ServerState`] - Server state
//! - [`Server`] - HTTP server
//! - [`BackgroundTasks`] - Background task supervisor

pub mod config;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
pub use tasks::{BackgroundTasks, TaskKind};
