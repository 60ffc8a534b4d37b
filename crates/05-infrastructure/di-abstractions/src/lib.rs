//! # Tang Abstractions
//!
//! 类型层级解析器的抽象层，定义元数据来源、目录加载和只读查询的核心接口。
//!
//! ## 核心接口
//!
//! - [`TypeSource`] - 类型元数据来源（给定类型标识，返回其声明信息）
//! - [`CatalogProvider`] - 类型目录提供者（异步加载描述符）
//! - [`HierarchyReader`] - 构建完成后的只读查询接口

pub mod provider;
pub mod reader;
pub mod source;

pub use provider::*;
pub use reader::*;
pub use source::*;
