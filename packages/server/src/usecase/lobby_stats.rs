//! UseCase: ロビー状態の取得
//!
//! 運用確認用の HTTP エンドポイントから参照される読み取り専用の
//! ユースケース。

use std::sync::Arc;

use crate::domain::LobbyRepository;

/// ロビーの現在のサマリ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LobbyStats {
    /// 接続中の参加者数
    pub participants: usize,
    /// 待機キューの長さ
    pub waiting: usize,
}

/// ロビー状態取得のユースケース
pub struct LobbyStatsUseCase {
    /// Repository（ロビー状態の抽象化）
    repository: Arc<dyn LobbyRepository>,
}

impl LobbyStatsUseCase {
    /// 新しい LobbyStatsUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// 現在のサマリを取得
    pub async fn execute(&self) -> LobbyStats {
        LobbyStats {
            participants: self.repository.participant_count().await,
            waiting: self.repository.waiting_count().await,
        }
    }
}
