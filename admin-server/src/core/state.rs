use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, Result, ServerError};
use crate::menu::MenuCatalog;
use crate::orders::MemoryOrderSource;
use crate::reports::{ReportBoard, ReportService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，axum 每个请求 clone 一次。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | orders | Arc<MemoryOrderSource> | 订单快照与变更通知 |
/// | menu | Arc<MenuCatalog> | 菜单 |
/// | reports | Arc<ReportService> | 已发布的日报/周报 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub orders: Arc<MemoryOrderSource>,
    pub menu: Arc<MenuCatalog>,
    pub reports: Arc<ReportService>,
    started_at: Instant,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("environment", &self.config.environment)
            .field("orders_revision", &self.orders.revision())
            .field("dishes", &self.menu.len())
            .finish()
    }
}

impl ServerState {
    /// 手动构造 (测试常用)，通常使用 [`ServerState::initialize`]
    pub fn new(config: Config, orders: Arc<MemoryOrderSource>, menu: Arc<MenuCatalog>) -> Self {
        let reports = Arc::new(ReportService::new(
            orders.clone(),
            config.report_timezone,
        ));
        Self {
            config,
            orders,
            menu,
            reports,
            started_at: Instant::now(),
        }
    }

    /// 初始化服务器状态
    ///
    /// 配置了 `ORDERS_FILE` 时从文件加载订单，文件无法读取或解析则启动失败。
    pub fn initialize(config: &Config) -> Result<Self> {
        let orders = match &config.orders_file {
            Some(path) => MemoryOrderSource::load_json_file(path, config.change_channel_capacity)
                .map_err(ServerError::OrderSource)?,
            None => MemoryOrderSource::new(config.change_channel_capacity),
        };

        let state = Self::new(config.clone(), Arc::new(orders), Arc::new(MenuCatalog::new()));
        tracing::info!(
            orders = state.orders.snapshot().len(),
            timezone = %config.report_timezone,
            "Server state initialized"
        );
        Ok(state)
    }

    /// 运行时间 (秒)
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// 启动后台任务: 报表刷新 + 发布日志
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let refresher = self
            .reports
            .clone()
            .run(self.config.refresh_interval(), tasks.shutdown_token());
        tasks.spawn("report_refresher", TaskKind::Worker, refresher);

        let publish_log = log_published_reports(self.reports.subscribe(), tasks.shutdown_token());
        tasks.spawn("report_publish_log", TaskKind::Listener, publish_log);
        tasks.log_summary();
    }
}

async fn log_published_reports(
    mut boards: watch::Receiver<Option<Arc<ReportBoard>>>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            changed = boards.changed() => {
                if changed.is_err() {
                    break;
                }
                let board = boards.borrow_and_update().clone();
                if let Some(board) = board {
                    tracing::info!(
                        revision = board.revision,
                        daily_orders = board.daily.report.total_orders,
                        daily_revenue = board.daily.report.total_revenue,
                        weekly_orders = board.weekly.report.total_orders,
                        weekly_revenue = board.weekly.report.total_revenue,
                        "Reports published"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_initialize_without_seed() {
        let config = Config::with_overrides(0, chrono_tz::UTC);
        let state = ServerState::initialize(&config).unwrap();
        assert!(state.orders.snapshot().is_empty());
        assert!(state.menu.is_empty());
        assert!(state.reports.latest().is_none());
    }

    #[test]
    fn test_initialize_with_bad_seed_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[{{\"id\": 1}}]").unwrap();

        let mut config = Config::with_overrides(0, chrono_tz::UTC);
        config.orders_file = Some(file.path().display().to_string());
        let err = ServerState::initialize(&config).unwrap_err();
        assert!(matches!(err, ServerError::OrderSource(_)));
    }
}
