//! 组合层错误类型

use tang_common::{CatalogError, HierarchyError};
use thiserror::Error;

/// 组合层错误
#[derive(Error, Debug)]
pub enum CompositionError {
    /// 类型层级构建失败
    #[error("类型层级构建失败: {0}")]
    Hierarchy(#[from] HierarchyError),

    /// 类型目录加载失败
    #[error("类型目录加载失败: {0}")]
    Catalog(#[from] CatalogError),

    /// 配置加载失败
    #[error("配置加载失败: {0}")]
    Options(#[from] config::ConfigError),

    /// 日志初始化失败
    #[error("日志初始化失败: {message}")]
    Logging { message: String },
}

/// 组合层结果类型
pub type CompositionResult<T> = Result<T, CompositionError>;
