//! Shared utilities for the tokumei chat application.
//!
//! Logging setup and the clock abstraction used by both the server and
//! the CLI client.

pub mod logger;
pub mod time;
