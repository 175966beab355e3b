//! Order feed API 模块
//!
//! 订单由托管后端写入；这里接收后端推送的订单行并触发报表刷新。

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", get(handler::list).post(handler::ingest))
        .route("/api/orders/{id}", delete(handler::remove))
}
