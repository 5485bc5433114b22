//! # auction-api
//!
//! The keep-alive HTTP server and the wiring that assembles storage,
//! services, and the gateway into a running process.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_dispatcher, create_moderation, create_service_context, run};
pub use state::AppState;
