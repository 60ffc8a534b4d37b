//! 错误类型定义

use crate::metadata::TypeName;
use thiserror::Error;

/// 类型层级构建错误
///
/// 除 [`HierarchyError::NameResolution`] 外均为结构性错误，表示输入的类型声明
/// 本身有缺陷，不应被吞掉或重试。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("节点冲突: {message}")]
    Conflict { message: String },

    #[error("类型 {type_name} 存在歧义构造函数: {constructor} 与其他构造函数仅参数顺序不同")]
    AmbiguousConstructor {
        type_name: TypeName,
        constructor: String,
    },

    #[error("非法的可注入声明: {type_name}, 原因: {reason}")]
    IllegalInjectable { type_name: TypeName, reason: String },

    #[error("短名称重复: {short_name} 已被 {existing} 占用, 无法注册 {type_name}")]
    DuplicateShortName {
        short_name: String,
        existing: TypeName,
        type_name: TypeName,
    },

    #[error("名称无法解析: {name}, 可解析的最长前缀: '{resolved_prefix}'")]
    NameResolution {
        name: String,
        resolved_prefix: String,
    },

    #[error(
        "参数类型不匹配: {type_name} 的构造函数期望 {expected}, 但 {parameter} 的值类型为 {actual}"
    )]
    TypeMismatch {
        type_name: TypeName,
        parameter: TypeName,
        expected: TypeName,
        actual: TypeName,
    },

    #[error("未知类型: {type_name}")]
    UnknownType { type_name: TypeName },

    #[error("不支持的类型: {type_name}, 原因: {reason}")]
    UnsupportedType { type_name: TypeName, reason: String },

    #[error("{parameter} 不是命名参数, 无法作为 {type_name} 的构造函数参数绑定")]
    NotNamedParameter {
        type_name: TypeName,
        parameter: TypeName,
    },

    #[error("内部状态异常: {message}")]
    IllegalState { message: String },

    #[error("闭包计算在 {rounds} 轮后仍未收敛, 未解析类型: {unresolved:?}")]
    ClosureDidNotConverge {
        rounds: usize,
        unresolved: Vec<TypeName>,
    },
}

impl HierarchyError {
    /// 创建冲突错误
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// 创建非法可注入错误
    pub fn illegal_injectable(type_name: &TypeName, reason: impl Into<String>) -> Self {
        Self::IllegalInjectable {
            type_name: type_name.clone(),
            reason: reason.into(),
        }
    }

    /// 创建内部状态异常错误
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState {
            message: message.into(),
        }
    }

    /// 是否为可恢复的名称解析失败
    pub fn is_name_resolution(&self) -> bool {
        matches!(self, Self::NameResolution { .. })
    }
}

/// 类型目录错误
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("目录文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("目录文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("目录解析失败: {path}, 原因: {source}")]
    ParseError {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("类型重复声明且内容不一致: {type_name}")]
    DuplicateDescriptor { type_name: TypeName },
}

/// 结果类型别名
pub type HierarchyResult<T> = Result<T, HierarchyError>;
pub type CatalogResult<T> = Result<T, CatalogError>;
