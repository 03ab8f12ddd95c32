//! 値オブジェクト定義
//!
//! セッション ID・表示名・タイムスタンプなど、不変条件を持つ小さな型。
//! 生成時に検証し、以降は常に正しい値であることを保証する。

use thiserror::Error;

/// 表示名の最大文字数
pub const MAX_USERNAME_CHARS: usize = 20;

/// 値オブジェクト生成時の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// 表示名が空（トリム後）
    #[error("username cannot be empty")]
    EmptyUsername,

    /// セッション ID が空
    #[error("session id cannot be empty")]
    EmptySessionId,
}

/// セッション ID
///
/// 接続ごとにトランスポート層が払い出す一意な識別子。
/// 接続の生存期間中は不変。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// 新しい SessionId を作成（空文字列は拒否）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptySessionId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// SessionId のファクトリ
pub struct SessionIdFactory;

impl SessionIdFactory {
    /// UUID v4 で新しい SessionId を生成
    pub fn generate() -> SessionId {
        SessionId(uuid::Uuid::new_v4().to_string())
    }
}

/// 表示名
///
/// 前後の空白をトリムし、20 文字を超える部分は切り捨てる。
/// トリム後に空になる表示名は登録時に拒否される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// 表示名を検証して作成
    pub fn new(raw: &str) -> Result<Self, ValueObjectError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyUsername);
        }
        let capped: String = trimmed.chars().take(MAX_USERNAME_CHARS).collect();
        Ok(Self(capped))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 性別タグ
///
/// クライアントが申告する任意の属性。コアは内容を検証せず素通しする。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenderTag(String);

impl GenderTag {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// `earlier` からの経過ミリ秒（負にはならない）
    pub fn saturating_elapsed_since(&self, earlier: Timestamp) -> i64 {
        (self.0 - earlier.0).max(0)
    }
}

/// メッセージ ID
///
/// 転送するチャットメッセージ 1 件ごとにサーバ側で払い出す識別子。
/// UUID v4（ランダム 122 ビット）なので実用上衝突しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// MessageId のファクトリ
pub struct MessageIdFactory;

impl MessageIdFactory {
    pub fn generate() -> MessageId {
        MessageId(uuid::Uuid::new_v4().to_string())
    }
}
