//! # 类型层级组合层
//!
//! 负责把类型目录、构建配置和日志组合成一个完成闭包计算的类型层级。
//!
//! ## 主要功能
//!
//! - **类型层级构建器**: 使用构建者模式加载目录、注册根类型并计算闭包
//! - **配置加载**: 配置文件叠加 `TANG_` 环境变量
//! - **共享包装**: 以读写锁在线程间共享构建中的类型层级
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use tang_composition::HierarchyBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hierarchy = HierarchyBuilder::new()
//!         .add_catalog_json("types.json")?
//!         .add_root("com.example.Timer")
//!         .build()
//!         .await?;
//!
//!     println!("{}", hierarchy.export_namespace());
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod errors;
pub mod options;
pub mod shared;

// 重新导出主要类型
pub use builder::{HierarchyBuilder, LoggingConfig, ResolvedHierarchy};
pub use errors::{CompositionError, CompositionResult};
pub use options::{load_options, ENV_PREFIX};
pub use shared::SharedTypeHierarchy;

#[cfg(test)]
mod tests {
    mod builder_tests;
}
