//! UseCase: タイピング通知の転送準備
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ForwardTypingUseCase::execute() メソッド
//! - メッセージ送信と同じセッション状態のゲート、活動時刻の更新
//!
//! ### なぜこのテストが必要か
//! - chatting でない参加者のタイピング通知が漏れないことを保証
//! - タイピングも inactivity タイマーをリセットすることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ペア成立中の typing on/off
//! - 異常系：待機中のセッション

use std::sync::Arc;

use tokumei_shared::time::Clock;

use crate::domain::{LobbyRepository, ParticipantStatus, SessionId, Timestamp};

use super::error::ForwardTypingError;

/// タイピング通知転送のユースケース
pub struct ForwardTypingUseCase {
    /// Repository（ロビー状態の抽象化）
    repository: Arc<dyn LobbyRepository>,
    /// Clock（現在時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl ForwardTypingUseCase {
    /// 新しい ForwardTypingUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// タイピング通知の転送先を決定する
    ///
    /// # Returns
    ///
    /// * `Ok(SessionId)` - 通知を転送すべき相手のセッション ID
    /// * `Err(ForwardTypingError)` - 未登録、または chatting 状態でない
    pub async fn execute(&self, session_id: &SessionId) -> Result<SessionId, ForwardTypingError> {
        let participant = self
            .repository
            .get_participant(session_id)
            .await
            .map_err(|_| ForwardTypingError::NotRegistered)?;

        let partner_id = match (participant.status, participant.partner_id) {
            (ParticipantStatus::Chatting, Some(partner_id)) => partner_id,
            _ => return Err(ForwardTypingError::NotChatting),
        };

        self.repository
            .touch(session_id, Timestamp::new(self.clock.now_millis()))
            .await;

        Ok(partner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GenderTag, Lobby, Participant, Username};
    use crate::infrastructure::repository::InMemoryLobbyRepository;
    use std::time::Duration;
    use tokio::sync::Mutex;
    use tokumei_shared::time::FixedClock;

    fn sid(raw: &str) -> SessionId {
        SessionId::new(raw.to_string()).unwrap()
    }

    async fn create_paired_repository() -> Arc<InMemoryLobbyRepository> {
        let lobby = Arc::new(Mutex::new(Lobby::new(Duration::from_secs(300))));
        let repository = Arc::new(InMemoryLobbyRepository::new(lobby));
        for id in ["s-alice", "s-bob"] {
            let participant = Participant::new(
                sid(id),
                Username::new(id).unwrap(),
                GenderTag::default(),
                Timestamp::new(0),
            );
            repository.add_participant(participant).await.unwrap();
        }
        repository
            .find_match(&sid("s-alice"), Timestamp::new(0))
            .await
            .unwrap();
        repository
            .find_match(&sid("s-bob"), Timestamp::new(0))
            .await
            .unwrap();
        repository
    }

    #[tokio::test]
    async fn test_typing_is_forwarded_to_partner() {
        // テスト項目: ペア成立中のタイピング通知は相手に向けられる
        // given (前提条件):
        let repository = create_paired_repository().await;
        let usecase =
            ForwardTypingUseCase::new(repository.clone(), Arc::new(FixedClock::new(7_000)));

        // when (操作):
        let partner = usecase.execute(&sid("s-alice")).await.unwrap();

        // then (期待する結果): 相手が返り、活動時刻も更新される
        assert_eq!(partner.as_str(), "s-bob");
        let alice = repository.get_participant(&sid("s-alice")).await.unwrap();
        assert_eq!(alice.last_activity_at, Timestamp::new(7_000));
    }

    #[tokio::test]
    async fn test_typing_from_waiting_participant_is_gated() {
        // テスト項目: 待機中の参加者のタイピング通知は転送されない
        // given (前提条件):
        let lobby = Arc::new(Mutex::new(Lobby::new(Duration::from_secs(300))));
        let repository = Arc::new(InMemoryLobbyRepository::new(lobby));
        let participant = Participant::new(
            sid("s-alice"),
            Username::new("alice").unwrap(),
            GenderTag::default(),
            Timestamp::new(0),
        );
        repository.add_participant(participant).await.unwrap();
        let usecase = ForwardTypingUseCase::new(repository, Arc::new(FixedClock::new(0)));

        // when (操作):
        let result = usecase.execute(&sid("s-alice")).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ForwardTypingError::NotChatting);
    }
}
