//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::domain::MessagePusher;
use crate::usecase::{
    DisconnectParticipantUseCase, ForwardTypingUseCase, LobbyStatsUseCase, NextPartnerUseCase,
    RegisterParticipantUseCase, SendMessageUseCase,
};

use super::{
    handler::{get_stats, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket matchmaking server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     register_usecase,
///     send_message_usecase,
///     forward_typing_usecase,
///     next_partner_usecase,
///     disconnect_usecase,
///     lobby_stats_usecase,
///     message_pusher,
/// );
/// server.run("127.0.0.1".to_string(), 3000).await?;
/// ```
pub struct Server {
    /// RegisterParticipantUseCase（参加者登録のユースケース）
    register_usecase: Arc<RegisterParticipantUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    send_message_usecase: Arc<SendMessageUseCase>,
    /// ForwardTypingUseCase（タイピング通知のユースケース）
    forward_typing_usecase: Arc<ForwardTypingUseCase>,
    /// NextPartnerUseCase（「次の相手」要求のユースケース）
    next_partner_usecase: Arc<NextPartnerUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    disconnect_usecase: Arc<DisconnectParticipantUseCase>,
    /// LobbyStatsUseCase（ロビー状態取得のユースケース）
    lobby_stats_usecase: Arc<LobbyStatsUseCase>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl Server {
    /// Create a new Server instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        register_usecase: Arc<RegisterParticipantUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        forward_typing_usecase: Arc<ForwardTypingUseCase>,
        next_partner_usecase: Arc<NextPartnerUseCase>,
        disconnect_usecase: Arc<DisconnectParticipantUseCase>,
        lobby_stats_usecase: Arc<LobbyStatsUseCase>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            register_usecase,
            send_message_usecase,
            forward_typing_usecase,
            next_partner_usecase,
            disconnect_usecase,
            lobby_stats_usecase,
            message_pusher,
        }
    }

    /// Build the axum router
    ///
    /// 統合テストからは `run` を経由せずにこのルーターを直接
    /// エフェメラルポートで立ち上げられる。
    pub fn into_router(self) -> Router {
        let app_state = Arc::new(AppState {
            register_usecase: self.register_usecase,
            send_message_usecase: self.send_message_usecase,
            forward_typing_usecase: self.forward_typing_usecase,
            next_partner_usecase: self.next_partner_usecase,
            disconnect_usecase: self.disconnect_usecase,
            lobby_stats_usecase: self.lobby_stats_usecase,
            message_pusher: self.message_pusher,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/stats", get(get_stats))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the WebSocket matchmaking server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 3000)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.into_router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "WebSocket matchmaking server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
