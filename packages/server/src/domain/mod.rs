//! ドメイン層
//!
//! マッチメイキングとセッション状態機械の中核。トランスポートに依存しない
//! 純粋なビジネスロジックのみを置く。

pub mod entity;
pub mod error;
pub mod lobby;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{ChatPayload, ChatRecord, Participant, ParticipantStatus};
pub use error::LobbyError;
pub use lobby::{Lobby, RemovedParticipant};
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use repository::LobbyRepository;
pub use value_object::{
    GenderTag, MAX_USERNAME_CHARS, MessageId, MessageIdFactory, SessionId, SessionIdFactory,
    Timestamp, Username, ValueObjectError,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
