//! 解析器配置项

use crate::metadata::TypeName;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 闭包计算默认最大轮数
pub const DEFAULT_MAX_CLOSURE_ROUNDS: usize = 64;

/// 类型层级构建配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyOptions {
    /// 闭包计算最大轮数，超过即视为不收敛
    pub max_closure_rounds: usize,
    /// 类型目录文件（JSON 或 TOML）
    pub catalogs: Vec<PathBuf>,
    /// 需要注册的根类型
    pub roots: Vec<TypeName>,
    /// 日志配置
    pub logging: LoggingOptions,
}

impl Default for HierarchyOptions {
    fn default() -> Self {
        Self {
            max_closure_rounds: DEFAULT_MAX_CLOSURE_ROUNDS,
            catalogs: Vec::new(),
            roots: Vec::new(),
            logging: LoggingOptions::default(),
        }
    }
}

impl HierarchyOptions {
    /// 设置闭包计算最大轮数
    pub fn with_max_closure_rounds(mut self, rounds: usize) -> Self {
        self.max_closure_rounds = rounds;
        self
    }
}

/// 日志配置项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// 日志级别（trace/debug/info/warn/error）
    pub level: String,
    /// 是否使用 JSON 格式
    pub json: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
