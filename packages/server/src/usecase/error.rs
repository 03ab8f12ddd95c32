//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{LobbyError, ValueObjectError};

/// 参加者登録のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// 表示名の検証エラー（空・不正）— 本人にのみ通知され、接続は維持される
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] ValueObjectError),

    /// ロビー操作のエラー（二重登録など）
    #[error(transparent)]
    Lobby(#[from] LobbyError),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// セッションが未登録（切断済み・掃除済み）
    #[error("session is not registered")]
    NotRegistered,

    /// chatting 状態でない（相手がいない）
    #[error("session is not in a chat")]
    NotChatting,
}

/// タイピング通知転送のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForwardTypingError {
    /// セッションが未登録
    #[error("session is not registered")]
    NotRegistered,

    /// chatting 状態でない
    #[error("session is not in a chat")]
    NotChatting,
}

/// 「次の相手」要求のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NextPartnerError {
    /// セッションが未登録
    #[error("session is not registered")]
    NotRegistered,
}
