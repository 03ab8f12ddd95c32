//! UseCase: 「次の相手」要求
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - NextPartnerUseCase::execute() メソッド
//! - 現在のペアの解消、孤立した相手の報告、再マッチング
//!
//! ### なぜこのテストが必要か
//! - 元の相手に partner left を通知するための情報が返ることを保証
//! - 解消された相手が自動では再キューされないことを確認
//!   （再探索するかは相手自身の操作に委ねる）
//! - 候補がいなければ本人が待機キューに戻ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ペア中の next（解消 + 待機）、候補がいる場合の即再マッチ
//! - エッジケース：未ペアの next（単なる再探索）
//! - 異常系：未登録セッション

use std::sync::Arc;

use tokumei_shared::time::Clock;

use crate::domain::{LobbyRepository, Participant, SessionId, Timestamp};

use super::error::NextPartnerError;

/// 「次の相手」要求の結果
#[derive(Debug, Clone)]
pub struct NextPartnerOutcome {
    /// 解消されて孤立した元の相手（partner left の通知先）
    pub former_partner: Option<SessionId>,
    /// 再マッチングで即成立した新しい相手
    pub new_partner: Option<Participant>,
}

/// 「次の相手」要求のユースケース
pub struct NextPartnerUseCase {
    /// Repository（ロビー状態の抽象化）
    repository: Arc<dyn LobbyRepository>,
    /// Clock（現在時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl NextPartnerUseCase {
    /// 新しい NextPartnerUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 「次の相手」要求を実行
    ///
    /// 現在のペアを解消し（あれば）、すぐに再マッチングを試みる。
    ///
    /// # Returns
    ///
    /// * `Ok(NextPartnerOutcome)` - 元の相手と新しい相手（いずれも任意）
    /// * `Err(NextPartnerError)` - セッションが未登録
    pub async fn execute(
        &self,
        session_id: &SessionId,
    ) -> Result<NextPartnerOutcome, NextPartnerError> {
        let now = Timestamp::new(self.clock.now_millis());

        // 1. 鮮度チェック（切断済みなら何もしない）
        self.repository
            .get_participant(session_id)
            .await
            .map_err(|_| NextPartnerError::NotRegistered)?;

        // 2. 明示的な操作なので活動時刻を更新
        self.repository.touch(session_id, now).await;

        // 3. 現在のペアを解消（両者 waiting に戻る。相手は再キューしない）
        let former_partner = self
            .repository
            .dissolve_pairing(session_id)
            .await
            .map(|p| p.id);

        // 4. 再マッチング（候補がいなければ待機キューへ）
        let new_partner = self
            .repository
            .find_match(session_id, now)
            .await
            .map_err(|_| NextPartnerError::NotRegistered)?;

        Ok(NextPartnerOutcome {
            former_partner,
            new_partner,
        })
    }
}
