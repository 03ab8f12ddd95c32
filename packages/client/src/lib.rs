//! WebSocket matchmaking chat client implementation.

mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
