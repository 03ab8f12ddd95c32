//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - レジストリからの削除（ペア解消込み）、孤立した相手の報告
//!
//! ### なぜこのテストが必要か
//! - 切断時に必ずペアが解消され、相手が waiting に戻ることを保証
//! - 二重切断が冪等であること（2 回目は通知対象なし）を確認
//! - 待機キューに残骸が残らないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ペア中の切断、待機中の切断
//! - エッジケース：同じセッションの二重切断
//! - 異常系：存在しないセッションの切断（no-op）

use std::sync::Arc;

use crate::domain::{LobbyRepository, MessagePusher, SessionId};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（ロビー状態の抽象化）
    repository: Arc<dyn LobbyRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 参加者切断を実行
    ///
    /// ペア解消とレジストリ・待機キューからの削除は 1 回の
    /// クリティカルセクションで行われる。冪等：既に削除済みなら
    /// 何もせず `None` を返す（エラーではない — 同時切断は日常的なレース）。
    ///
    /// # Returns
    ///
    /// * `Some(SessionId)` - partner left を通知すべき孤立した元の相手
    /// * `None` - 元の相手はいない（未ペア、または二重切断）
    pub async fn execute(&self, session_id: &SessionId) -> Option<SessionId> {
        // 送信チャンネルはレジストリ登録の有無にかかわらず破棄する
        // （登録前に切断したクライアントのチャンネルもここで回収される）
        self.message_pusher.unregister_client(session_id).await;
        let removed = self.repository.remove_participant(session_id).await?;

        tracing::info!(
            "Participant '{}' disconnected and removed from registry",
            session_id.as_str()
        );

        removed.former_partner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        GenderTag, Lobby, LobbyError, Participant, ParticipantStatus, Timestamp, Username,
    };
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryLobbyRepository,
    };
    use std::{collections::HashMap, time::Duration};
    use tokio::sync::Mutex;

    fn sid(raw: &str) -> SessionId {
        SessionId::new(raw.to_string()).unwrap()
    }

    fn create_test_message_pusher() -> Arc<WebSocketMessagePusher> {
        let clients = Arc::new(Mutex::new(HashMap::new()));
        Arc::new(WebSocketMessagePusher::new(clients))
    }

    async fn create_repository_with(ids: &[&str]) -> Arc<InMemoryLobbyRepository> {
        let lobby = Arc::new(Mutex::new(Lobby::new(Duration::from_secs(300))));
        let repository = Arc::new(InMemoryLobbyRepository::new(lobby));
        for id in ids {
            let participant = Participant::new(
                sid(id),
                Username::new(id).unwrap(),
                GenderTag::default(),
                Timestamp::new(0),
            );
            repository.add_participant(participant).await.unwrap();
        }
        repository
    }

    #[tokio::test]
    async fn test_disconnect_paired_participant_reports_partner() {
        // テスト項目: ペア中の切断で孤立した相手が報告され、相手は waiting に戻る
        // given (前提条件):
        let repository = create_repository_with(&["s-alice", "s-bob"]).await;
        repository
            .find_match(&sid("s-alice"), Timestamp::new(0))
            .await
            .unwrap();
        repository
            .find_match(&sid("s-bob"), Timestamp::new(0))
            .await
            .unwrap();
        let usecase =
            DisconnectParticipantUseCase::new(repository.clone(), create_test_message_pusher());

        // when (操作):
        let orphan = usecase.execute(&sid("s-alice")).await;

        // then (期待する結果):
        assert_eq!(orphan.unwrap().as_str(), "s-bob");
        assert_eq!(repository.participant_count().await, 1);
        let bob = repository.get_participant(&sid("s-bob")).await.unwrap();
        assert_eq!(bob.status, ParticipantStatus::Waiting);
        assert_eq!(bob.partner_id, None);
    }

    #[tokio::test]
    async fn test_disconnect_waiting_participant_clears_queue() {
        // テスト項目: 待機中の切断でキューが空になり、後続はマッチしない
        // given (前提条件): alice が待機中に切断
        let repository = create_repository_with(&["s-alice"]).await;
        repository
            .find_match(&sid("s-alice"), Timestamp::new(0))
            .await
            .unwrap();
        let usecase =
            DisconnectParticipantUseCase::new(repository.clone(), create_test_message_pusher());

        // when (操作):
        let orphan = usecase.execute(&sid("s-alice")).await;

        // then (期待する結果): 通知対象なし、キューは空
        assert!(orphan.is_none());
        assert_eq!(repository.waiting_count().await, 0);
        assert!(matches!(
            repository.get_participant(&sid("s-alice")).await,
            Err(LobbyError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_double_disconnect_is_idempotent() {
        // テスト項目: 二重切断の 2 回目は no-op（通知対象なし・エラーなし）
        // given (前提条件):
        let repository = create_repository_with(&["s-alice", "s-bob"]).await;
        repository
            .find_match(&sid("s-alice"), Timestamp::new(0))
            .await
            .unwrap();
        repository
            .find_match(&sid("s-bob"), Timestamp::new(0))
            .await
            .unwrap();
        let usecase =
            DisconnectParticipantUseCase::new(repository.clone(), create_test_message_pusher());

        // when (操作):
        let first = usecase.execute(&sid("s-alice")).await;
        let second = usecase.execute(&sid("s-alice")).await;

        // then (期待する結果): 2 回目は通知対象が返らない
        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_disconnect_unregisters_pusher_channel() {
        // テスト項目: 切断時に MessagePusher からチャンネルが破棄される
        // given (前提条件):
        let repository = create_repository_with(&["s-alice"]).await;
        let mut mock_pusher = crate::domain::MockMessagePusher::new();
        mock_pusher
            .expect_unregister_client()
            .withf(|session_id| session_id.as_str() == "s-alice")
            .times(1)
            .returning(|_| ());
        let usecase = DisconnectParticipantUseCase::new(repository, Arc::new(mock_pusher));

        // when (操作):
        let orphan = usecase.execute(&sid("s-alice")).await;

        // then (期待する結果): 期待した呼び出しが行われた（drop 時に検証）
        assert!(orphan.is_none());
    }

    #[tokio::test]
    async fn test_disconnect_unknown_session_is_a_noop() {
        // テスト項目: 存在しないセッションの切断は何も起こさない
        // given (前提条件):
        let repository = create_repository_with(&[]).await;
        let usecase =
            DisconnectParticipantUseCase::new(repository.clone(), create_test_message_pusher());

        // when (操作):
        let orphan = usecase.execute(&sid("s-ghost")).await;

        // then (期待する結果):
        assert!(orphan.is_none());
    }
}
