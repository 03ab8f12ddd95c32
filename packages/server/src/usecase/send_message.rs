//! UseCase: チャットメッセージの転送準備
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - セッション状態のゲート（chatting + 相手あり）、活動時刻の更新、
//!   メッセージ ID の採番
//!
//! ### なぜこのテストが必要か
//! - chatting でない参加者のメッセージが転送されないことを保証
//! - 送信が inactivity タイマーをリセットすることを確認
//! - 転送レコードに送信者の表示名と一意な ID が付与されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ペア成立中のテキスト／画像メッセージ
//! - 異常系：未登録セッション、待機中（相手なし）のセッション

use std::sync::Arc;

use tokumei_shared::time::Clock;

use crate::domain::{
    ChatPayload, ChatRecord, LobbyRepository, MessageIdFactory, ParticipantStatus, SessionId,
    Timestamp,
};

use super::error::SendMessageError;

/// 転送の指示
///
/// UI 層はこのレコードを DTO に変換して `partner_id` へ配送する。
#[derive(Debug, Clone)]
pub struct Delivery {
    pub partner_id: SessionId,
    pub record: ChatRecord,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（ロビー状態の抽象化）
    repository: Arc<dyn LobbyRepository>,
    /// Clock（現在時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `session_id` - 送信者のセッション ID
    /// * `payload` - 検証済みのメッセージ本体（添付の検証は境界層で完了している）
    ///
    /// # Returns
    ///
    /// * `Ok(Delivery)` - 転送先とサーバ採番済みレコード
    /// * `Err(SendMessageError)` - 未登録、または chatting 状態でない
    pub async fn execute(
        &self,
        session_id: &SessionId,
        payload: ChatPayload,
    ) -> Result<Delivery, SendMessageError> {
        // 1. 現在のレジストリ状態に対する鮮度チェック
        let participant = self
            .repository
            .get_participant(session_id)
            .await
            .map_err(|_| SendMessageError::NotRegistered)?;

        // 2. chatting + 相手あり、のゲート
        let partner_id = match (participant.status, participant.partner_id) {
            (ParticipantStatus::Chatting, Some(partner_id)) => partner_id,
            _ => return Err(SendMessageError::NotChatting),
        };

        // 3. 受信アクティビティとして活動時刻を更新
        self.repository
            .touch(session_id, Timestamp::new(self.clock.now_millis()))
            .await;

        // 4. サーバ側でメッセージ ID を採番し、送信者名を確定する
        let record = ChatRecord {
            id: MessageIdFactory::generate(),
            sender_name: participant.username,
            payload,
        };

        Ok(Delivery { partner_id, record })
    }
}
