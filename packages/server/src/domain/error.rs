//! ドメイン層のエラー定義

use thiserror::Error;

/// ロビー（レジストリ + 待機キュー）操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    /// 同じセッション ID が既に登録されている
    ///
    /// トランスポート層が一意な ID を払い出す前提なので通常は起きない。
    /// 防御的なチェック。
    #[error("session '{0}' is already registered")]
    DuplicateSession(String),

    /// セッションが見つからない（切断済み・掃除済み）
    #[error("session '{0}' not found")]
    SessionNotFound(String),
}
