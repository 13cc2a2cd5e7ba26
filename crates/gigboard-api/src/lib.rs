//! Axum HTTP/WS API server.
//!
//! This crate provides:
//! - REST surface for users, gigs, and bids
//! - JWT authentication
//! - The hire transition with conflict-safe concurrency
//! - WebSocket fan-out over room subscriptions

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod ws;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use response::ApiResponse;
pub use routes::create_router;
pub use services::{BidService, GigService, HireService};
pub use state::AppState;
