use std::time::Duration;

use chrono_tz::Tz;

use crate::orders::memory::DEFAULT_CHANNEL_CAPACITY;
use crate::utils::time::parse_timezone;

/// 服务器配置 - 报表服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (`.env` 文件会先被加载)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REPORT_TIMEZONE | UTC | 报表时区 (IANA 名称) |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_DIR | - | 日志目录，存在时按天滚动写文件 |
/// | ORDERS_FILE | - | 启动时加载的订单 JSON |
/// | REPORT_REFRESH_SECS | 60 | 报表定时刷新间隔(秒) |
/// | CHANGE_CHANNEL_CAPACITY | 256 | 订单变更通知通道容量 |
/// | SHUTDOWN_TIMEOUT_MS | 5000 | 后台任务关闭超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// REPORT_TIMEZONE=Africa/Dakar ORDERS_FILE=./orders.json cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 报表时区
    pub report_timezone: Tz,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 订单种子文件 (后端行格式的 JSON 数组)
    pub orders_file: Option<String>,
    /// 定时刷新间隔 (秒)，保证跨天/跨周时窗口跟随时钟
    pub report_refresh_secs: u64,
    pub change_channel_capacity: usize,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: env_parse("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            report_timezone: parse_timezone(
                &std::env::var("REPORT_TIMEZONE").unwrap_or_else(|_| "UTC".into()),
            ),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: env_opt("LOG_DIR"),
            orders_file: env_opt("ORDERS_FILE"),
            report_refresh_secs: env_parse("REPORT_REFRESH_SECS", 60).max(1),
            change_channel_capacity: env_parse("CHANGE_CHANNEL_CAPACITY", DEFAULT_CHANNEL_CAPACITY)
                .max(1),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS", 5000),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(http_port: u16, report_timezone: Tz) -> Self {
        let mut config = Self::from_env();
        config.http_port = http_port;
        config.report_timezone = report_timezone;
        config.orders_file = None;
        config
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.report_refresh_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
