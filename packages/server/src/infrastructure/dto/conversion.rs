//! Conversion logic between DTOs and domain entities.

use crate::domain::{entity, value_object::MessageId};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::ChatPayloadDto> for entity::ChatPayload {
    fn from(dto: dto::ChatPayloadDto) -> Self {
        match dto {
            dto::ChatPayloadDto::Text { body, reply_to } => Self::Text {
                body,
                reply_to: reply_to.map(MessageId::new),
            },
            dto::ChatPayloadDto::Image { data_url, reply_to } => Self::Image {
                data_url,
                reply_to: reply_to.map(MessageId::new),
            },
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<entity::ChatPayload> for dto::ChatPayloadDto {
    fn from(model: entity::ChatPayload) -> Self {
        match model {
            entity::ChatPayload::Text { body, reply_to } => Self::Text {
                body,
                reply_to: reply_to.map(MessageId::into_string),
            },
            entity::ChatPayload::Image { data_url, reply_to } => Self::Image {
                data_url,
                reply_to: reply_to.map(MessageId::into_string),
            },
        }
    }
}

impl From<entity::ChatRecord> for dto::ServerEvent {
    fn from(record: entity::ChatRecord) -> Self {
        Self::ChatMessage {
            id: record.id.into_string(),
            sender: record.sender_name.into_string(),
            message: record.payload.into(),
        }
    }
}
