//! Dish API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Dish, DishCreate, DishUpdate};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/dishes - 获取菜单 (按名称排序)
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Dish>>> {
    Ok(ApiResponse::success(state.menu.list()))
}

/// GET /api/dishes/{id} - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Dish>> {
    Ok(ApiResponse::success(state.menu.get(&id)?))
}

/// POST /api/dishes - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DishCreate>,
) -> AppResult<ApiResponse<Dish>> {
    let dish = state.menu.create(payload)?;
    Ok(ApiResponse::success_with_message("Dish created", dish))
}

/// PUT /api/dishes/{id} - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DishUpdate>,
) -> AppResult<ApiResponse<Dish>> {
    let dish = state.menu.update(&id, payload)?;
    Ok(ApiResponse::success_with_message("Dish updated", dish))
}

/// DELETE /api/dishes/{id} - 删除菜品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Dish>> {
    let dish = state.menu.delete(&id)?;
    Ok(ApiResponse::success_with_message("Dish deleted", dish))
}
