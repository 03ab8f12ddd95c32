//! Repository 実装
//!
//! ドメイン層が定義する LobbyRepository trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `inmemory`: HashMap + VecDeque をインメモリ DB として使用

pub mod inmemory;

pub use inmemory::InMemoryLobbyRepository;
