//! Order feed API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::models::{Order, OrderRow};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub revision: u64,
    pub orders: Vec<Order>,
}

/// GET /api/orders - 当前订单快照
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<OrderListResponse>> {
    let snapshot = state.orders.snapshot();
    Ok(ApiResponse::success(OrderListResponse {
        revision: snapshot.revision,
        orders: snapshot.orders.to_vec(),
    }))
}

/// POST /api/orders - 接收后端订单行 (新增或替换)
pub async fn ingest(
    State(state): State<ServerState>,
    Json(row): Json<OrderRow>,
) -> AppResult<ApiResponse<Order>> {
    let order = state.orders.upsert(row)?;
    tracing::info!(order_id = %order.id, items = order.items.len(), "Order ingested");
    Ok(ApiResponse::success(order))
}

/// DELETE /api/orders/{id} - 移除订单
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.orders.remove(&id)?;
    tracing::info!(order_id = %id, "Order removed");
    Ok(ApiResponse::ok())
}
