//! Server state and connection management.

use std::sync::Arc;

use crate::domain::MessagePusher;
use crate::usecase::{
    DisconnectParticipantUseCase, ForwardTypingUseCase, LobbyStatsUseCase, NextPartnerUseCase,
    RegisterParticipantUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// RegisterParticipantUseCase（参加者登録のユースケース）
    pub register_usecase: Arc<RegisterParticipantUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// ForwardTypingUseCase（タイピング通知のユースケース）
    pub forward_typing_usecase: Arc<ForwardTypingUseCase>,
    /// NextPartnerUseCase（「次の相手」要求のユースケース）
    pub next_partner_usecase: Arc<NextPartnerUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_usecase: Arc<DisconnectParticipantUseCase>,
    /// LobbyStatsUseCase（ロビー状態取得のユースケース）
    pub lobby_stats_usecase: Arc<LobbyStatsUseCase>,
    /// MessagePusher（メッセージ通知の抽象化）
    pub message_pusher: Arc<dyn MessagePusher>,
}
