//! # Tang Common
//!
//! Tang 类型层级解析器的公共类型。
//!
//! ## 核心内容
//!
//! - [`TypeName`] - 类型标识
//! - [`TypeDescriptor`] - 类型声明元数据（构造函数、参数绑定、父类型、命名参数）
//! - [`HierarchyError`] - 类型层级构建错误
//! - [`HierarchyOptions`] - 构建配置项

pub mod configuration;
pub mod errors;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use metadata::*;
