//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 健康检查 |
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "uptimeSeconds": 42,
//!   "ordersRevision": 7,
//!   "reportRevision": 7
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    /// 当前订单快照版本
    orders_revision: u64,
    /// 已发布报表对应的快照版本 (尚未计算时为空)
    #[serde(skip_serializing_if = "Option::is_none")]
    report_revision: Option<u64>,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_secs(),
        orders_revision: state.orders.revision(),
        report_revision: state.reports.latest().map(|b| b.revision),
    })
}
