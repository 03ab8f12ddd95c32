//! MessagePusher trait 定義
//!
//! エンジンからトランスポートへの通知は「状態を確定してから送る」
//! fire-and-forget の二段階。送信はこの trait の実装（Infrastructure 層）に
//! 委ねることで、ドメイン層と UseCase 層をトランスポート非依存に保つ。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::SessionId;

/// クライアントへの送信チャンネル
///
/// sender を drop するとトランスポート側の送信ループが終了し、
/// エンドポイントが閉じられる。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// メッセージ送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 宛先クライアントが登録されていない（切断直後の通常のレース）
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    /// チャンネルへの送信に失敗した
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// クライアントへのメッセージ送信の抽象化
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録する
    async fn register_client(&self, session_id: SessionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを破棄する（エンドポイントを閉じる）
    async fn unregister_client(&self, session_id: &SessionId);

    /// 特定のクライアントに送信する
    async fn push_to(&self, session_id: &SessionId, content: &str)
    -> Result<(), MessagePushError>;
}
