use thiserror::Error;

use crate::utils::AppError;

/// 服务器启动/运行错误
///
/// 处理器内部错误使用 [`AppError`]；这里只覆盖服务器生命周期。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("订单数据加载失败: {0}")]
    OrderSource(#[source] AppError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// 服务器 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
