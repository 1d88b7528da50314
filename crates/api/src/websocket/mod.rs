//! WebSocket support for real-time features
//!
//! Provides presence tracking and real-time message delivery:
//! - Online-user broadcasts when someone connects or disconnects
//! - Best-effort push of newly persisted messages to their recipient
//!
//! # Architecture
//!
//! - **Presence**: user id -> live connection id registry
//! - **Lifecycle**: connect/disconnect handling and presence broadcasts
//! - **Dispatch**: pushes persisted messages to the recipient's connection
//! - **State**: table of every open connection, with push and broadcast
//! - **Handler**: Axum WebSocket route handler
//! - **Events**: Type-safe event definitions for client/server communication

pub mod connection;
pub mod dispatch;
pub mod events;
pub mod handler;
pub mod lifecycle;
pub mod presence;
pub mod state;

pub use dispatch::{DeliveryOutcome, MessageDispatcher};
pub use handler::ws_handler;
pub use lifecycle::{Handshake, PresenceHandler, PresenceSession, SessionPhase};
pub use presence::PresenceRegistry;
pub use state::WebSocketState;
