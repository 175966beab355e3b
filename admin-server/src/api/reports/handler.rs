//! Reports API Handlers

use axum::extract::{Query, State};
use serde::Deserialize;
use shared::models::{ReportPeriod, ReportView};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// daily | weekly (默认 daily)
    pub period: Option<String>,
}

/// GET /api/reports?period=daily|weekly - 获取销售报表
pub async fn get_report(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<ApiResponse<ReportView>> {
    let period = match query.period.as_deref() {
        Some(raw) => raw.parse::<ReportPeriod>()?,
        None => ReportPeriod::default(),
    };

    let board = state.reports.current().await?;
    Ok(ApiResponse::success(board.view(period)))
}
