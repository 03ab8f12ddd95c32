//! Data Transfer Objects (DTOs) for the chat application.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket message DTOs and payload validation
//! - `http`: HTTP API response DTOs
//! - `conversion`: DTO ↔ domain entity conversions

pub mod conversion;
pub mod http;
pub mod websocket;
