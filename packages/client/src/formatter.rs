//! Message formatting utilities for client display.

use tokumei_server::infrastructure::dto::websocket::ChatPayloadDto;
use tokumei_shared::time::timestamp_to_rfc3339;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the waiting notification
    pub fn format_waiting() -> String {
        "\n... waiting for a partner ...\n".to_string()
    }

    /// Format the chat-start notification
    ///
    /// # Arguments
    ///
    /// * `partner_name` - Display name of the matched partner
    pub fn format_chat_start(partner_name: &str) -> String {
        format!(
            "\n\n============================================================\n\
             You are now chatting with '{}'.\n\
             Type a message, /next for a new partner, /quit to leave.\n\
             ============================================================\n",
            partner_name
        )
    }

    /// Format an incoming chat message
    ///
    /// # Arguments
    ///
    /// * `sender` - Display name of the sender
    /// * `payload` - The message payload (text or image)
    pub fn format_chat_message(sender: &str, payload: &ChatPayloadDto) -> String {
        let (body, reply_to) = match payload {
            ChatPayloadDto::Text { body, reply_to } => (body.clone(), reply_to),
            ChatPayloadDto::Image { data_url, reply_to } => {
                (format!("[image, {} bytes as data URL]", data_url.len()), reply_to)
            }
        };
        let reply_marker = match reply_to {
            Some(id) => format!(" (reply to {})", id),
            None => String::new(),
        };
        format!(
            "\n\n------------------------------------------------------------\n\
             @{}{}: {}\n\
             ------------------------------------------------------------\n",
            sender, reply_marker, body
        )
    }

    /// Format a partner-typing notification
    pub fn format_partner_typing(is_typing: bool) -> String {
        if is_typing {
            "\n(partner is typing...)\n".to_string()
        } else {
            String::new()
        }
    }

    /// Format a partner-left notification
    pub fn format_partner_left() -> String {
        "\n- Your partner left the chat. Use /next to find a new one.\n".to_string()
    }

    /// Format the inactivity eviction notification
    pub fn format_inactive() -> String {
        "\n- You were disconnected due to inactivity.\n".to_string()
    }

    /// Format a server error notification
    ///
    /// # Arguments
    ///
    /// * `reason` - Error reason reported by the server
    pub fn format_error(reason: &str) -> String {
        format!("\n! {}\n", reason)
    }

    /// Format a confirmation message after sending
    ///
    /// # Arguments
    ///
    /// * `sent_at` - Unix timestamp when the message was sent (milliseconds)
    pub fn format_sent_confirmation(sent_at: i64) -> String {
        let timestamp_str = timestamp_to_rfc3339(sent_at);
        format!("sent at {}\n", timestamp_str)
    }

    /// Format a raw text message (when parsing fails)
    ///
    /// # Arguments
    ///
    /// * `text` - The raw text received
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_chat_start_contains_partner_name() {
        // テスト項目: マッチ成立通知に相手の表示名が含まれる
        // given (前提条件):
        let partner_name = "alice";

        // when (操作):
        let result = MessageFormatter::format_chat_start(partner_name);

        // then (期待する結果):
        assert!(result.contains("chatting with 'alice'"));
        assert!(result.contains("/next"));
        assert!(result.contains("============================================================"));
    }

    #[test]
    fn test_format_text_message() {
        // テスト項目: テキストメッセージが送信者名付きでフォーマットされる
        // given (前提条件):
        let payload = ChatPayloadDto::Text {
            body: "Hello, world!".to_string(),
            reply_to: None,
        };

        // when (操作):
        let result = MessageFormatter::format_chat_message("alice", &payload);

        // then (期待する結果):
        assert!(result.contains("@alice:"));
        assert!(result.contains("Hello, world!"));
        assert!(result.contains("------------------------------------------------------------"));
    }

    #[test]
    fn test_format_reply_message_shows_marker() {
        // テスト項目: 返信メッセージには返信先 ID のマークが付く
        // given (前提条件):
        let payload = ChatPayloadDto::Text {
            body: "I agree".to_string(),
            reply_to: Some("m-42".to_string()),
        };

        // when (操作):
        let result = MessageFormatter::format_chat_message("bob", &payload);

        // then (期待する結果):
        assert!(result.contains("@bob (reply to m-42):"));
    }

    #[test]
    fn test_format_image_message_shows_placeholder() {
        // テスト項目: 画像メッセージは中身の代わりにプレースホルダが表示される
        // given (前提条件):
        let payload = ChatPayloadDto::Image {
            data_url: "data:image/png;base64,iVBORw0KGgo=".to_string(),
            reply_to: None,
        };

        // when (操作):
        let result = MessageFormatter::format_chat_message("alice", &payload);

        // then (期待する結果):
        assert!(result.contains("[image,"));
        assert!(!result.contains("iVBORw0KGgo="));
    }

    #[test]
    fn test_format_partner_typing_only_when_typing() {
        // テスト項目: タイピング中のみ通知が表示される
        // given (前提条件):

        // when (操作):
        let typing = MessageFormatter::format_partner_typing(true);
        let stopped = MessageFormatter::format_partner_typing(false);

        // then (期待する結果):
        assert!(typing.contains("typing"));
        assert!(stopped.is_empty());
    }

    #[test]
    fn test_format_sent_confirmation() {
        // テスト項目: 送信確認メッセージが正しくフォーマットされる
        // given (前提条件):
        // 2023-01-01 00:00:00 UTC in milliseconds
        let sent_at = 1672531200000;

        // when (操作):
        let result = MessageFormatter::format_sent_confirmation(sent_at);

        // then (期待する結果):
        assert!(result.contains("sent at"));
        assert!(result.contains("2023-01-01"));
    }

    #[test]
    fn test_format_raw_message() {
        // テスト項目: 生メッセージが正しくフォーマットされる
        // given (前提条件):
        let text = "unknown message format";

        // when (操作):
        let result = MessageFormatter::format_raw_message(text);

        // then (期待する結果):
        assert!(result.contains("unknown message format"));
        assert!(result.contains("Received:"));
    }
}
