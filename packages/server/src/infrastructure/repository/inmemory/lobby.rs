//! InMemory Lobby Repository 実装
//!
//! ドメイン層が定義する LobbyRepository trait の具体的な実装。
//! `Lobby` ドメインモデルを単一の Mutex で保護し、インメモリ DB として
//! 使用します。
//!
//! ## 並行性
//!
//! 各メソッドはロックを 1 回だけ取得し、その内側でドメインモデルの
//! メソッドを 1 回呼んで返します。複数ステップの read-modify-write は
//! すべて `Lobby` 側に閉じ込めてあるため、ここで割り込みが起きることは
//! ありません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Lobby, LobbyError, LobbyRepository, Participant, RemovedParticipant, SessionId, Timestamp,
};

/// インメモリ Lobby Repository 実装
///
/// Lobby ドメインモデルを保持し、ドメイン層の LobbyRepository trait を実装します（依存性の逆転）。
pub struct InMemoryLobbyRepository {
    /// Lobby ドメインモデル
    lobby: Arc<Mutex<Lobby>>,
}

impl InMemoryLobbyRepository {
    /// 新しい InMemoryLobbyRepository を作成
    pub fn new(lobby: Arc<Mutex<Lobby>>) -> Self {
        Self { lobby }
    }
}

#[async_trait]
impl LobbyRepository for InMemoryLobbyRepository {
    async fn add_participant(&self, participant: Participant) -> Result<(), LobbyError> {
        let mut lobby = self.lobby.lock().await;
        lobby.add_participant(participant)
    }

    async fn get_participant(&self, id: &SessionId) -> Result<Participant, LobbyError> {
        let lobby = self.lobby.lock().await;
        lobby
            .get(id)
            .cloned()
            .ok_or_else(|| LobbyError::SessionNotFound(id.as_str().to_string()))
    }

    async fn remove_participant(&self, id: &SessionId) -> Option<RemovedParticipant> {
        let mut lobby = self.lobby.lock().await;
        lobby.remove_participant(id)
    }

    async fn find_match(
        &self,
        id: &SessionId,
        now: Timestamp,
    ) -> Result<Option<Participant>, LobbyError> {
        let mut lobby = self.lobby.lock().await;
        lobby.find_match(id, now)
    }

    async fn dissolve_pairing(&self, id: &SessionId) -> Option<Participant> {
        let mut lobby = self.lobby.lock().await;
        lobby.dissolve_pairing(id)
    }

    async fn touch(&self, id: &SessionId, now: Timestamp) {
        let mut lobby = self.lobby.lock().await;
        lobby.touch(id, now);
    }

    async fn sweep(&self, now: Timestamp) -> Vec<RemovedParticipant> {
        let mut lobby = self.lobby.lock().await;
        lobby.sweep(now)
    }

    async fn participant_count(&self) -> usize {
        let lobby = self.lobby.lock().await;
        lobby.participant_count()
    }

    async fn waiting_count(&self) -> usize {
        let lobby = self.lobby.lock().await;
        lobby.waiting_count()
    }
}
