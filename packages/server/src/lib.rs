//! Matchmaking server for anonymous one-on-one chat.
//!
//! Pairs anonymous participants into one-on-one sessions over WebSocket,
//! routes messages and typing signals between paired participants, and
//! reclaims sessions from inactive connections.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
