//! UseCase 層
//!
//! ドメイン層の操作を 1 ユースケース = 1 型に束ねる。状態の変更と結果の
//! 返却までが責務で、DTO の組み立てと実際の配送は UI 層が行う
//! （状態を確定してから通知する二段階プロトコル）。

mod disconnect_participant;
mod error;
mod forward_typing;
mod lobby_stats;
mod next_partner;
mod register_participant;
mod send_message;
mod sweep_inactive;

pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ForwardTypingError, NextPartnerError, RegisterError, SendMessageError};
pub use forward_typing::ForwardTypingUseCase;
pub use lobby_stats::{LobbyStats, LobbyStatsUseCase};
pub use next_partner::{NextPartnerOutcome, NextPartnerUseCase};
pub use register_participant::{RegisterOutcome, RegisterParticipantUseCase};
pub use send_message::{Delivery, SendMessageUseCase};
pub use sweep_inactive::SweepInactiveUseCase;
