//! HTTP API レスポンスの DTO 定義

use serde::{Deserialize, Serialize};

/// ヘルスチェックのレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
}

/// ロビー状態のレスポンス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    /// 接続中の参加者数
    pub participants: usize,
    /// 待機キューの長さ
    pub waiting: usize,
}
