//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::entity::Participant;
use super::error::LobbyError;
use super::lobby::RemovedParticipant;
use super::value_object::{SessionId, Timestamp};

/// Lobby Repository trait
///
/// ドメイン層が必要とするロビー状態へのインターフェース。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// ## 並行性
///
/// レジストリと待機キューは複数ステップにまたがる read-modify-write を行うため、
/// 各メソッドは実装側で単一のクリティカルセクションとして実行されること。
/// メソッドとメソッドの間の割り込みは許容される（古くなった参照は
/// 呼び出し側が握りつぶす）。
#[async_trait]
pub trait LobbyRepository: Send + Sync {
    /// 参加者を登録する
    async fn add_participant(&self, participant: Participant) -> Result<(), LobbyError>;

    /// 参加者のスナップショットを取得する
    async fn get_participant(&self, id: &SessionId) -> Result<Participant, LobbyError>;

    /// 参加者を取り除く（ペア解消込み・冪等）
    async fn remove_participant(&self, id: &SessionId) -> Option<RemovedParticipant>;

    /// 相手を探す（見つからなければ待機キューに入る）
    async fn find_match(
        &self,
        id: &SessionId,
        now: Timestamp,
    ) -> Result<Option<Participant>, LobbyError>;

    /// ペアリングを解消し、元の相手のスナップショットを返す
    async fn dissolve_pairing(&self, id: &SessionId) -> Option<Participant>;

    /// 最終活動時刻を更新する
    async fn touch(&self, id: &SessionId, now: Timestamp);

    /// 無活動の参加者を一掃する
    async fn sweep(&self, now: Timestamp) -> Vec<RemovedParticipant>;

    /// 接続中の参加者数を取得する
    async fn participant_count(&self) -> usize;

    /// 待機キューの長さを取得する
    async fn waiting_count(&self) -> usize;
}
