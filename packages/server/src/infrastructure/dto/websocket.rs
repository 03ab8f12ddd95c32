//! WebSocket メッセージの DTO 定義
//!
//! クライアント ⇔ サーバ間の JSON ワイヤフォーマット。内部タグ
//! （`type` フィールド）でイベント種別を判別し、チャット本体は
//! `kind` タグ付きのペイロードとして運ぶ。
//!
//! 画像ペイロードの検証（data URL 形式・MIME・サイズ）はこの境界層の
//! 責務で、検証済みのものだけがドメイン層に渡る。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 画像のデコード後サイズの上限（5 MiB）
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// 受け入れる画像の MIME タイプ
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// チャットメッセージ本体の DTO
///
/// `kind` でテキストと画像を判別する。`reply_to` は返信先のメッセージ ID。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatPayloadDto {
    Text {
        body: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reply_to: Option<String>,
    },
    Image {
        data_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reply_to: Option<String>,
    },
}

/// ペイロード検証エラー
///
/// `reason` としてそのままクライアントに返せる文言を持つ。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadValidationError {
    #[error("image must be a base64 data URL")]
    NotADataUrl,

    #[error("unsupported image type '{0}'")]
    UnsupportedImageType(String),

    #[error("image exceeds the 5 MiB size limit")]
    ImageTooLarge,

    #[error("message body must not be empty")]
    EmptyBody,
}

impl ChatPayloadDto {
    /// ペイロードを検証する
    ///
    /// テキストは空でないこと、画像は `data:image/...;base64,` 形式で
    /// 許可された MIME かつデコード後サイズが上限以下であることを確認する。
    /// base64 のデコードはせず、パディングを差し引いた長さで判定する。
    pub fn validate(&self) -> Result<(), PayloadValidationError> {
        match self {
            Self::Text { body, .. } => {
                if body.trim().is_empty() {
                    return Err(PayloadValidationError::EmptyBody);
                }
                Ok(())
            }
            Self::Image { data_url, .. } => {
                let rest = data_url
                    .strip_prefix("data:")
                    .ok_or(PayloadValidationError::NotADataUrl)?;
                let (mime, encoded) = rest
                    .split_once(";base64,")
                    .ok_or(PayloadValidationError::NotADataUrl)?;
                if !ALLOWED_IMAGE_TYPES.contains(&mime) {
                    return Err(PayloadValidationError::UnsupportedImageType(
                        mime.to_string(),
                    ));
                }
                let padding = encoded.bytes().rev().take_while(|b| *b == b'=').count();
                let decoded_len = encoded.len() * 3 / 4 - padding;
                if decoded_len > MAX_IMAGE_BYTES {
                    return Err(PayloadValidationError::ImageTooLarge);
                }
                Ok(())
            }
        }
    }
}

/// クライアントから受信するイベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// 入室とマッチング開始
    Register {
        username: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gender: Option<String>,
    },
    /// チャットメッセージの送信
    ChatMessage { message: ChatPayloadDto },
    /// タイピング状態の通知
    Typing { is_typing: bool },
    /// 現在の相手との会話を終えて次の相手を探す
    NextPartner,
}

/// サーバから送信するイベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// 入室の拒否（ユーザー名不正・セッション重複）
    RegistrationError { reason: String },
    /// 相手が見つかるまで待機
    Waiting,
    /// ペアリング成立（相手の表示名を通知）
    ChatStart { partner_name: String },
    /// 相手からのチャットメッセージ
    ChatMessage {
        id: String,
        sender: String,
        message: ChatPayloadDto,
    },
    /// 相手のタイピング状態
    PartnerTyping { is_typing: bool },
    /// 相手が退出した（切断・次の相手探し・無活動退去）
    PartnerLeft,
    /// 無活動のためサーバから退去させられた
    Inactive,
    /// そのほかの操作エラー（不正ペイロード・相手不在での送信など）
    Error { reason: String },
}

impl ServerEvent {
    /// JSON 文字列にシリアライズする
    ///
    /// フィールドはすべて単純な文字列・真偽値なのでシリアライズは
    /// 失敗しない。
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("ServerEvent serialization is infallible")
    }
}
