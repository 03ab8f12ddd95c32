//! Infrastructure 層
//!
//! ドメイン層が定義する trait（Repository / MessagePusher）の具体実装と、
//! ワイヤフォーマット（DTO）を置く。

pub mod dto;
pub mod message_pusher;
pub mod repository;
