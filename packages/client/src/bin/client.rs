//! Anonymous 1-on-1 chat CLI client.
//!
//! Connects to the matchmaking server, registers with a display name, and
//! chats with whoever the server pairs you with. Type /next to request a
//! new partner. Automatically reconnects on disconnection (max 5 attempts
//! with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tokumei-client -- --username Alice
//! cargo run --bin tokumei-client -- -n Bob -g male
//! ```

use clap::Parser;

use tokumei_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "tokumei-client")]
#[command(about = "Anonymous 1-on-1 chat CLI client", long_about = None)]
struct Args {
    /// Display name shown to your chat partner
    #[arg(short = 'n', long)]
    username: String,

    /// Optional gender tag passed through to the partner view
    #[arg(short = 'g', long)]
    gender: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3000/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = tokumei_client::run_client(args.url, args.username, args.gender).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
