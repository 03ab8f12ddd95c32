//! Anonymous 1-on-1 chat matchmaking server over WebSocket.
//!
//! Pairs waiting participants FIFO, relays messages and typing
//! notifications between them, and evicts inactive sessions.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tokumei-server
//! cargo run --bin tokumei-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{collections::HashMap, sync::Arc, time::Duration};

use clap::Parser;
use tokio::sync::Mutex;

use tokumei_server::{
    domain::Lobby,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryLobbyRepository},
    ui::{Server, spawn_sweeper},
    usecase::{
        DisconnectParticipantUseCase, ForwardTypingUseCase, LobbyStatsUseCase, NextPartnerUseCase,
        RegisterParticipantUseCase, SendMessageUseCase, SweepInactiveUseCase,
    },
};
use tokumei_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "tokumei-server")]
#[command(about = "Anonymous 1-on-1 chat matchmaking server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Seconds of inactivity after which a participant is evicted
    #[arg(long, default_value = "300")]
    inactivity_timeout_secs: u64,

    /// Interval in seconds between inactivity sweeps
    #[arg(long, default_value = "60")]
    sweep_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Clock
    // 4. UseCases
    // 5. Sweeper + Server

    // 1. Create Repository (in-memory lobby)
    let lobby = Arc::new(Mutex::new(Lobby::new(Duration::from_secs(
        args.inactivity_timeout_secs,
    ))));
    let repository = Arc::new(InMemoryLobbyRepository::new(lobby));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

    // 3. Create Clock
    let clock = Arc::new(SystemClock);

    // 4. Create UseCases
    let register_usecase = Arc::new(RegisterParticipantUseCase::new(
        repository.clone(),
        clock.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(repository.clone(), clock.clone()));
    let forward_typing_usecase =
        Arc::new(ForwardTypingUseCase::new(repository.clone(), clock.clone()));
    let next_partner_usecase = Arc::new(NextPartnerUseCase::new(repository.clone(), clock.clone()));
    let disconnect_usecase = Arc::new(DisconnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let lobby_stats_usecase = Arc::new(LobbyStatsUseCase::new(repository.clone()));
    let sweep_usecase = Arc::new(SweepInactiveUseCase::new(repository.clone(), clock.clone()));

    // 5. Start the sweeper, then create and run the server
    let sweeper = spawn_sweeper(
        sweep_usecase,
        message_pusher.clone(),
        Duration::from_secs(args.sweep_interval_secs),
    );

    let server = Server::new(
        register_usecase,
        send_message_usecase,
        forward_typing_usecase,
        next_partner_usecase,
        disconnect_usecase,
        lobby_stats_usecase,
        message_pusher,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    sweeper.abort();
}
