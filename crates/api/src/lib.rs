//! Parley API Library
//!
//! This crate contains the chat server: HTTP routes for accounts and messages,
//! and the WebSocket presence and delivery layer.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
pub mod upload;
pub mod websocket;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
