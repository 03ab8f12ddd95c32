//! UseCase: 無活動参加者の一掃
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SweepInactiveUseCase::execute() メソッド
//! - 閾値超過の参加者の退去と、孤立した相手の報告
//!
//! ### なぜこのテストが必要か
//! - 無活動の参加者がセッションとキュー枠を占有し続けないことを保証
//! - 退去後にそのセッションが参照不能（NotFound）になることを確認
//! - 活動中の参加者が巻き込まれないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ペア中の片方だけが無活動、全員活動中
//! - エッジケース：ペアの両方が無活動

use std::sync::Arc;

use tokumei_shared::time::Clock;

use crate::domain::{LobbyRepository, RemovedParticipant, Timestamp};

/// 無活動一掃のユースケース
///
/// 呼び出し周期は UI 層（sweeper タスク）が決める。テストからは
/// 合成クロックで直接駆動できる。
pub struct SweepInactiveUseCase {
    /// Repository（ロビー状態の抽象化）
    repository: Arc<dyn LobbyRepository>,
    /// Clock（現在時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl SweepInactiveUseCase {
    /// 新しい SweepInactiveUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 一掃を実行し、退去させた参加者のリストを返す
    ///
    /// UI 層はリストの各要素について、本人に inactive を送って
    /// エンドポイントを閉じ、孤立した相手に partner left を送る。
    pub async fn execute(&self) -> Vec<RemovedParticipant> {
        let now = Timestamp::new(self.clock.now_millis());
        let evicted = self.repository.sweep(now).await;

        if !evicted.is_empty() {
            tracing::info!("Sweep evicted {} inactive participant(s)", evicted.len());
        }

        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        GenderTag, Lobby, LobbyError, Participant, SessionId, Timestamp, Username,
    };
    use crate::infrastructure::repository::InMemoryLobbyRepository;
    use std::time::Duration;
    use tokio::sync::Mutex;
    use tokumei_shared::time::ManualClock;

    const TIMEOUT_MS: i64 = 300_000;

    fn sid(raw: &str) -> SessionId {
        SessionId::new(raw.to_string()).unwrap()
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
    async fn test_sweep_evicts_idle_half_of_a_pair() {
        // テスト項目: ペアの片方が無活動なら退去し、相手が報告される
        // given (前提条件): alice と bob がペア、bob だけが活動を続ける
        let repository = create_repository_with(&["s-alice", "s-bob"]).await;
        repository
            .find_match(&sid("s-alice"), Timestamp::new(0))
            .await
            .unwrap();
        repository
            .find_match(&sid("s-bob"), Timestamp::new(0))
            .await
            .unwrap();

        let clock = Arc::new(ManualClock::new(0));
        let usecase = SweepInactiveUseCase::new(repository.clone(), clock.clone());

        clock.advance(TIMEOUT_MS + 1);
        repository
            .touch(&sid("s-bob"), Timestamp::new(clock.now_millis()))
            .await;

        // when (操作):
        let evicted = usecase.execute().await;

        // then (期待する結果): alice だけが退去し、以後は NotFound
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].participant.id.as_str(), "s-alice");
        assert_eq!(evicted[0].former_partner.as_ref().unwrap().as_str(), "s-bob");
        assert!(matches!(
            repository.get_participant(&sid("s-alice")).await,
            Err(LobbyError::SessionNotFound(_))
        ));
        assert_eq!(repository.participant_count().await, 1);
    }

    #[tokio::test]
    async fn test_sweep_with_all_active_evicts_nobody() {
        // テスト項目: 閾値未満なら誰も退去しない
        // given (前提条件):
        let repository = create_repository_with(&["s-alice", "s-bob"]).await;
        let clock = Arc::new(ManualClock::new(0));
        let usecase = SweepInactiveUseCase::new(repository.clone(), clock.clone());

        clock.advance(TIMEOUT_MS); // ちょうど閾値はまだ active

        // when (操作):
        let evicted = usecase.execute().await;

        // then (期待する結果):
        assert!(evicted.is_empty());
        assert_eq!(repository.participant_count().await, 2);
    }

    #[tokio::test]
    async fn test_sweep_evicts_both_halves_of_an_idle_pair() {
        // テスト項目: ペアの両方が無活動なら両方退去する
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
        let clock = Arc::new(ManualClock::new(0));
        let usecase = SweepInactiveUseCase::new(repository.clone(), clock.clone());

        clock.advance(TIMEOUT_MS + 1);

        // when (操作):
        let evicted = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(evicted.len(), 2);
        assert_eq!(repository.participant_count().await, 0);
        assert_eq!(repository.waiting_count().await, 0);
    }
}
