//! WebSocket connection handler.
//!
//! ## 責務
//!
//! - 接続ごとのセッション ID の払い出しと送信チャンネルの生成
//! - 受信イベントのパースとユースケースへのディスパッチ
//! - ユースケースの結果からサーバイベントを組み立てて配送
//!   （本人へは自分のチャンネル、相手へは MessagePusher 経由）
//!
//! 接続の確立時に送信チャンネルを MessagePusher に登録し、切断処理で
//! 破棄する。一掃タスクがチャンネルを破棄した場合は送信ループが終了し、
//! この接続も閉じられる。

use std::sync::Arc;

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::{GenderTag, SessionId, SessionIdFactory, Username};
use crate::infrastructure::dto::websocket::{ChatPayloadDto, ClientEvent, ServerEvent};
use crate::ui::state::AppState;

/// WebSocket フレームの上限サイズ（10 MiB）
///
/// 画像ペイロード（デコード後 5 MiB）を base64 + JSON で包んでも収まる値。
const MAX_WS_MESSAGE_BYTES: usize = 10 * 1024 * 1024;

/// GET /ws
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.max_message_size(MAX_WS_MESSAGE_BYTES)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// 1 接続分のライフサイクル
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = SessionIdFactory::generate();
    tracing::info!("New connection: '{}'", session_id.as_str());

    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    // 送信チャンネルは接続時に登録する。以後このチャンネルの唯一の
    // sender は MessagePusher が持ち、破棄されれば送信ループが終わる。
    state
        .message_pusher
        .register_client(session_id.clone(), tx)
        .await;

    let mut send_task = tokio::spawn(async move {
        while let Some(content) = rx.recv().await {
            if ws_sender.send(Message::Text(content.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    let recv_state = state.clone();
    let recv_session_id = session_id.clone();
    let mut recv_task = tokio::spawn(async move {
        let mut session = ClientSession::new(recv_session_id, recv_state);
        while let Some(Ok(message)) = ws_receiver.next().await {
            match message {
                Message::Text(text) => session.handle_text(text.as_str()).await,
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // どちらかのループが終わったら接続全体を畳む
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    // 切断処理（一掃タスクによる退去後でも冪等）
    if let Some(former_partner) = state.disconnect_usecase.execute(&session_id).await {
        push_event(&state, &former_partner, ServerEvent::PartnerLeft).await;
    }

    tracing::info!("Connection closed: '{}'", session_id.as_str());
}

/// MessagePusher 経由でイベントを配送する（失敗はログのみ）
///
/// 宛先が見つからないのは切断直後の通常のレースなので debug に落とす。
async fn push_event(state: &AppState, target: &SessionId, event: ServerEvent) {
    if let Err(e) = state.message_pusher.push_to(target, &event.to_json()).await {
        tracing::debug!("Could not push to '{}': {}", target.as_str(), e);
    }
}

/// 1 接続分の受信イベント処理
struct ClientSession {
    session_id: SessionId,
    state: Arc<AppState>,
    /// 登録済みなら自分の表示名（相手への chat start に載せる）
    username: Option<Username>,
}

impl ClientSession {
    fn new(session_id: SessionId, state: Arc<AppState>) -> Self {
        Self {
            session_id,
            state,
            username: None,
        }
    }

    /// 自分自身へのイベント配送
    async fn send_self(&self, event: ServerEvent) {
        push_event(&self.state, &self.session_id, event).await;
    }

    async fn handle_text(&mut self, raw: &str) {
        let event = match serde_json::from_str::<ClientEvent>(raw) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(
                    "Malformed event from '{}': {}",
                    self.session_id.as_str(),
                    e
                );
                self.send_self(ServerEvent::Error {
                    reason: "invalid message format".to_string(),
                })
                .await;
                return;
            }
        };

        match event {
            ClientEvent::Register { username, gender } => {
                self.handle_register(username, gender).await;
            }
            ClientEvent::ChatMessage { message } => self.handle_chat_message(message).await,
            ClientEvent::Typing { is_typing } => self.handle_typing(is_typing).await,
            ClientEvent::NextPartner => self.handle_next_partner().await,
        }
    }

    async fn handle_register(&mut self, username: String, gender: Option<String>) {
        if self.username.is_some() {
            self.send_self(ServerEvent::RegistrationError {
                reason: "already registered".to_string(),
            })
            .await;
            return;
        }

        let gender = GenderTag::new(gender.unwrap_or_default());
        let outcome = match self
            .state
            .register_usecase
            .execute(self.session_id.clone(), &username, gender)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                self.send_self(ServerEvent::RegistrationError {
                    reason: e.to_string(),
                })
                .await;
                return;
            }
        };

        self.username = Some(outcome.participant.username.clone());

        match outcome.partner {
            Some(partner) => {
                self.send_self(ServerEvent::ChatStart {
                    partner_name: partner.username.as_str().to_string(),
                })
                .await;
                push_event(
                    &self.state,
                    &partner.id,
                    ServerEvent::ChatStart {
                        partner_name: outcome.participant.username.into_string(),
                    },
                )
                .await;
            }
            None => self.send_self(ServerEvent::Waiting).await,
        }
    }

    async fn handle_chat_message(&self, payload: ChatPayloadDto) {
        // 添付の検証はこの境界で行い、不正ならドメイン層には渡さない
        if let Err(e) = payload.validate() {
            self.send_self(ServerEvent::Error {
                reason: e.to_string(),
            })
            .await;
            return;
        }

        match self
            .state
            .send_message_usecase
            .execute(&self.session_id, payload.into())
            .await
        {
            Ok(delivery) => {
                push_event(&self.state, &delivery.partner_id, delivery.record.into()).await;
            }
            Err(e) => {
                self.send_self(ServerEvent::Error {
                    reason: e.to_string(),
                })
                .await;
            }
        }
    }

    async fn handle_typing(&self, is_typing: bool) {
        // 相手がいない間のタイピング通知は黙って捨てる
        if let Ok(partner_id) = self
            .state
            .forward_typing_usecase
            .execute(&self.session_id)
            .await
        {
            push_event(
                &self.state,
                &partner_id,
                ServerEvent::PartnerTyping { is_typing },
            )
            .await;
        }
    }

    async fn handle_next_partner(&self) {
        let outcome = match self
            .state
            .next_partner_usecase
            .execute(&self.session_id)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                self.send_self(ServerEvent::Error {
                    reason: e.to_string(),
                })
                .await;
                return;
            }
        };

        if let Some(former_partner) = outcome.former_partner {
            push_event(&self.state, &former_partner, ServerEvent::PartnerLeft).await;
        }

        // 解消の時点でいったん待機状態に戻るので、再マッチの成否に
        // かかわらず本人にはまず waiting を知らせる
        self.send_self(ServerEvent::Waiting).await;

        if let Some(partner) = outcome.new_partner {
            self.send_self(ServerEvent::ChatStart {
                partner_name: partner.username.as_str().to_string(),
            })
            .await;
            if let Some(username) = &self.username {
                push_event(
                    &self.state,
                    &partner.id,
                    ServerEvent::ChatStart {
                        partner_name: username.as_str().to_string(),
                    },
                )
                .await;
            }
        }
    }
}
