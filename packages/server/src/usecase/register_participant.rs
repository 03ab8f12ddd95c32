//! UseCase: 参加者登録とマッチング開始
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterParticipantUseCase::execute() メソッド
//! - 表示名の検証、参加者レコードの作成、即時マッチング
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：不正な表示名での登録を防ぐ
//! - 候補がいれば 1 回の呼び出しでペアが成立することを保証
//! - 候補がいなければ待機キューに入ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：1 人目の登録（waiting）、2 人目の登録（即マッチ）
//! - 異常系：空の表示名、同一セッション ID の二重登録

use std::sync::Arc;

use tokumei_shared::time::Clock;

use crate::domain::{GenderTag, LobbyRepository, Participant, SessionId, Timestamp, Username};

use super::error::RegisterError;

/// 登録の結果
///
/// `partner` が `Some` なら即時にペアが成立しており、UI 層は両者に
/// chat start を配送する。`None` なら本人に waiting を配送する。
#[derive(Debug, Clone)]
pub struct RegisterOutcome {
    pub participant: Participant,
    pub partner: Option<Participant>,
}

/// 参加者登録のユースケース
///
/// 送信チャンネルの登録は接続確立時に UI 層が済ませている前提。
/// ここではロビー状態の変更だけを行う。
pub struct RegisterParticipantUseCase {
    /// Repository（ロビー状態の抽象化）
    repository: Arc<dyn LobbyRepository>,
    /// Clock（現在時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl RegisterParticipantUseCase {
    /// 新しい RegisterParticipantUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 参加者登録を実行
    ///
    /// # Arguments
    ///
    /// * `session_id` - トランスポート層が払い出したセッション ID
    /// * `raw_username` - クライアントが申告した表示名（未検証）
    /// * `gender` - クライアントが申告した性別タグ（素通し）
    ///
    /// # Returns
    ///
    /// * `Ok(RegisterOutcome)` - 登録成功（即マッチの有無を含む）
    /// * `Err(RegisterError)` - 表示名の検証エラー、または二重登録
    pub async fn execute(
        &self,
        session_id: SessionId,
        raw_username: &str,
        gender: GenderTag,
    ) -> Result<RegisterOutcome, RegisterError> {
        // 1. 表示名の検証（トリム・20 文字上限・非空）
        let username = Username::new(raw_username)?;

        // 2. 参加者レコードを作成して登録
        let now = Timestamp::new(self.clock.now_millis());
        let participant = Participant::new(session_id.clone(), username, gender, now);
        self.repository.add_participant(participant.clone()).await?;

        // 3. 即時マッチングを試みる（候補がいなければ待機キューへ）
        let partner = self.repository.find_match(&session_id, now).await?;

        if let Some(partner) = &partner {
            tracing::info!(
                "Matched '{}' with '{}'",
                session_id.as_str(),
                partner.id.as_str()
            );
        } else {
            tracing::info!("No candidate for '{}', now waiting", session_id.as_str());
        }

        Ok(RegisterOutcome {
            participant,
            partner,
        })
    }
}
