//! 無活動参加者の定期一掃タスク
//!
//! 一定周期で SweepInactiveUseCase を実行し、退去させた参加者本人に
//! inactive を通知してチャンネルを破棄し、孤立した相手に partner left を
//! 通知する。1 人分の通知失敗は他の退去処理に影響しない。

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use crate::domain::MessagePusher;
use crate::infrastructure::dto::websocket::ServerEvent;
use crate::usecase::SweepInactiveUseCase;

/// 一掃タスクを起動する
///
/// 返り値の JoinHandle を drop してもタスクは走り続ける。
/// 明示的に止めたい場合は abort すること。
pub fn spawn_sweeper(
    sweep_usecase: Arc<SweepInactiveUseCase>,
    message_pusher: Arc<dyn MessagePusher>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // interval の最初の tick は即時に完了するので読み捨てる
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let evicted = sweep_usecase.execute().await;

            for removed in evicted {
                let victim = &removed.participant.id;

                if let Err(e) = message_pusher
                    .push_to(victim, &ServerEvent::Inactive.to_json())
                    .await
                {
                    tracing::debug!("Could not notify evicted '{}': {}", victim.as_str(), e);
                }
                // チャンネルを破棄してエンドポイントを閉じる
                message_pusher.unregister_client(victim).await;

                if let Some(former_partner) = &removed.former_partner {
                    if let Err(e) = message_pusher
                        .push_to(former_partner, &ServerEvent::PartnerLeft.to_json())
                        .await
                    {
                        tracing::debug!(
                            "Could not notify orphaned partner '{}': {}",
                            former_partner.as_str(),
                            e
                        );
                    }
                }
            }
        }
    })
}
