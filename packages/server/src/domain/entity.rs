//! エンティティ定義
//!
//! 接続中の参加者 1 人分の状態（`Participant`）と、転送されるチャット
//! メッセージのドメイン表現（`ChatPayload` / `ChatRecord`）。

use std::time::Duration;

use super::value_object::{GenderTag, MessageId, SessionId, Timestamp, Username};

/// 参加者のライフサイクル状態
///
/// `Waiting` は相手を探している（またはただ待っている）状態、
/// `Chatting` はペアリング成立中。メッセージとタイピング通知は
/// `Chatting` の間だけ転送される。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantStatus {
    Waiting,
    Chatting,
}

/// 参加者 1 人分のレコード
///
/// `partner_id` は所有関係ではなく、ルーティングと対称的な解消のための
/// 相互参照。ペアリングが成立している間は必ず対称になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: SessionId,
    pub username: Username,
    pub gender: GenderTag,
    pub connected_at: Timestamp,
    pub last_activity_at: Timestamp,
    pub partner_id: Option<SessionId>,
    pub status: ParticipantStatus,
    /// 相手を積極的に探している間だけ true（ペア成立で false に戻る）
    pub seeking: bool,
}

impl Participant {
    pub fn new(id: SessionId, username: Username, gender: GenderTag, now: Timestamp) -> Self {
        Self {
            id,
            username,
            gender,
            connected_at: now,
            last_activity_at: now,
            partner_id: None,
            status: ParticipantStatus::Waiting,
            seeking: false,
        }
    }

    /// 受信アクティビティで最終活動時刻を更新する
    pub fn touch(&mut self, now: Timestamp) {
        self.last_activity_at = now;
    }

    /// 最終活動からの経過が閾値を超えているか
    pub fn is_inactive(&self, now: Timestamp, timeout: Duration) -> bool {
        now.saturating_elapsed_since(self.last_activity_at) > timeout.as_millis() as i64
    }
}

/// チャットメッセージの本体
///
/// テキストと画像で必要なフィールドだけを持つタグ付きバリアント。
/// 画像の中身の検証（MIME・サイズ）は境界層の責務で、ここには届かない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatPayload {
    Text {
        body: String,
        reply_to: Option<MessageId>,
    },
    Image {
        data_url: String,
        reply_to: Option<MessageId>,
    },
}

/// 転送用に確定したメッセージ 1 件
///
/// サーバが採番した ID と送信者の表示名を付与した状態。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRecord {
    pub id: MessageId,
    pub sender_name: Username,
    pub payload: ChatPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(now: i64) -> Participant {
        Participant::new(
            SessionId::new("s-1".to_string()).unwrap(),
            Username::new("alice").unwrap(),
            GenderTag::new("female"),
            Timestamp::new(now),
        )
    }

    #[test]
    fn test_new_participant_starts_waiting_and_unpaired() {
        // テスト項目: 新規参加者は waiting・未ペア・非探索で始まる
        // given (前提条件):

        // when (操作):
        let p = participant(1_000);

        // then (期待する結果):
        assert_eq!(p.status, ParticipantStatus::Waiting);
        assert_eq!(p.partner_id, None);
        assert!(!p.seeking);
        assert_eq!(p.last_activity_at, p.connected_at);
    }

    #[test]
    fn test_touch_updates_last_activity() {
        // テスト項目: touch で最終活動時刻が更新される
        // given (前提条件):
        let mut p = participant(1_000);

        // when (操作):
        p.touch(Timestamp::new(9_999));

        // then (期待する結果):
        assert_eq!(p.last_activity_at, Timestamp::new(9_999));
        assert_eq!(p.connected_at, Timestamp::new(1_000));
    }

    #[test]
    fn test_is_inactive_beyond_threshold() {
        // テスト項目: 閾値を超えて無活動なら inactive と判定される
        // given (前提条件):
        let p = participant(0);
        let timeout = Duration::from_secs(300);

        // when (操作):
        let at_threshold = p.is_inactive(Timestamp::new(300_000), timeout);
        let beyond = p.is_inactive(Timestamp::new(300_001), timeout);

        // then (期待する結果): ちょうど閾値ではまだ active
        assert!(!at_threshold);
        assert!(beyond);
    }
}
