//! 类型目录提供者抽象接口

use async_trait::async_trait;
use std::path::Path;
use tang_common::{CatalogError, TypeDescriptor};

/// 类型目录提供者 trait
///
/// 从文件、内存或其他来源加载类型描述符
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// 加载全部类型描述符
    async fn load(&self) -> Result<Vec<TypeDescriptor>, CatalogError>;

    /// 提供者名称
    fn name(&self) -> &str;
}

/// 文件类型目录提供者 trait
#[async_trait]
pub trait FileCatalogProvider: CatalogProvider {
    /// 目录文件路径
    fn file_path(&self) -> &Path;

    /// 目录文件是否存在
    async fn file_exists(&self) -> bool;
}

/// 内存类型目录提供者
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogProvider {
    name: String,
    descriptors: Vec<TypeDescriptor>,
}

impl InMemoryCatalogProvider {
    /// 创建新的内存提供者
    pub fn new(name: impl Into<String>, descriptors: Vec<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            descriptors,
        }
    }
}

#[async_trait]
impl CatalogProvider for InMemoryCatalogProvider {
    async fn load(&self) -> Result<Vec<TypeDescriptor>, CatalogError> {
        Ok(self.descriptors.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
