//! # 类型层级具体实现
//!
//! 提供命名空间树、类型注册引擎、未解析类型闭包计算，以及基于文件的类型目录。
//!
//! ## 核心组件
//!
//! - [`NamespaceTree`] - 以 arena 存储的命名空间树
//! - [`TypeHierarchy`] - 类型注册、校验与闭包计算
//! - [`TypeCatalog`] - 内存类型目录（[`TypeSource`](tang_di_abstractions::TypeSource) 实现）
//! - [`JsonCatalogProvider`] / [`TomlCatalogProvider`] - 目录文件加载

pub mod catalog;
pub mod constructor;
pub mod hierarchy;
pub mod node;
pub mod providers;
pub mod resolution;
pub mod tree;

pub use catalog::*;
pub use constructor::*;
pub use hierarchy::*;
pub use node::*;
pub use providers::*;
pub use tree::*;
