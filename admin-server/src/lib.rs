//! Admin Server - 餐厅后台销售报表服务
//!
//! # 架构概述
//!
//! - **订单来源** (`orders`): 订单快照 + 变更通知，后端行格式的归一化
//! - **报表** (`reports`): 日报/周报聚合，变更驱动的刷新
//! - **菜单** (`menu`): 菜品目录和校验
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! admin-server/src/
//! ├── core/          # 配置、状态、错误、后台任务
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单来源
//! ├── reports/       # 报表聚合与发布
//! ├── menu/          # 菜单目录
//! └── utils/         # 日志、时间
//! ```

pub mod api;
pub mod core;
pub mod menu;
pub mod orders;
pub mod reports;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use menu::MenuCatalog;
pub use orders::{MemoryOrderSource, OrderSource};
pub use reports::{ReportBoard, ReportService};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 `.env`，初始化日志
///
/// 日志配置直接读环境变量，因为此时 [`Config`] 还未加载。
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenv::dotenv() {
        // .env 是可选的
        eprintln!("No .env loaded: {}", e);
    }

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______           __
  / ____/________ _/ /_
 / /   / ___/ __ `/ __ \
/ /___/ /  / /_/ / /_/ /
\____/_/   \__,_/_.___/
    ___       __          _
   /   | ____/ /___ ___  (_)___
  / /| |/ __  / __ `__ \/ / __ \
 / ___ / /_/ / / / / / / / / / /
/_/  |_\__,_/_/ /_/ /_/_/_/ /_/
    "#
    );
}
