//! Core module: configuration, shared state, server lifecycle
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - state shared by every handler
//! - [`Server`] - HTTP server
//! - [`ServerError`] - startup errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{BootstrapAdmin, Config};
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
