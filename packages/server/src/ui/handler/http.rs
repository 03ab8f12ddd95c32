//! HTTP API handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::infrastructure::dto::http::{HealthCheckResponse, StatsResponse};
use crate::ui::state::AppState;

/// GET /api/health
pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}

/// GET /api/stats
///
/// 接続中の参加者数と待機キューの長さを返す。
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let stats = state.lobby_stats_usecase.execute().await;
    Json(StatsResponse {
        participants: stats.participants,
        waiting: stats.waiting,
    })
}
