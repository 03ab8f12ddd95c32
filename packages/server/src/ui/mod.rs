//! WebSocket matchmaking server implementation.

mod handler;
mod server;
mod signal;
mod sweeper;
pub mod state;

pub use server::Server;
pub use sweeper::spawn_sweeper;
