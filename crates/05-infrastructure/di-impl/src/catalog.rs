//! 类型目录
//!
//! 以类型标识为键保存描述符的内存元数据来源，可由目录文件或代码构建。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tang_common::{
    CatalogError, CatalogResult, HierarchyError, HierarchyResult, TypeDescriptor, TypeName,
};
use tang_di_abstractions::TypeSource;
use tracing::debug;

/// 目录文件格式：`{ "types": [...] }` 或 TOML 中的 `[[types]]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    /// 类型描述符列表
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

/// 内存类型目录
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    descriptors: BTreeMap<TypeName, TypeDescriptor>,
}

impl TypeCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 由描述符列表创建目录
    pub fn from_descriptors<I>(descriptors: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        let mut catalog = Self::new();
        catalog.extend(descriptors)?;
        Ok(catalog)
    }

    /// 加入描述符；同名且内容一致的重复声明被忽略，内容不一致时失败
    pub fn insert(&mut self, descriptor: TypeDescriptor) -> CatalogResult<()> {
        match self.descriptors.get(&descriptor.name) {
            Some(existing) if existing == &descriptor => Ok(()),
            Some(_) => Err(CatalogError::DuplicateDescriptor {
                type_name: descriptor.name,
            }),
            None => {
                debug!(type_name = %descriptor.name, "加入类型描述符");
                self.descriptors.insert(descriptor.name.clone(), descriptor);
                Ok(())
            }
        }
    }

    /// 批量加入描述符
    pub fn extend<I>(&mut self, descriptors: I) -> CatalogResult<()>
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        descriptors.into_iter().try_for_each(|d| self.insert(d))
    }

    /// 声明一个没有构造函数和父类型的叶子类型（如基本类型）
    pub fn declare(&mut self, type_name: impl Into<TypeName>) -> CatalogResult<()> {
        self.insert(TypeDescriptor::new(type_name))
    }

    /// 合并另一个目录
    pub fn merge(&mut self, other: Self) -> CatalogResult<()> {
        self.extend(other.descriptors.into_values())
    }

    /// 描述符数量
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// 所有类型标识
    pub fn type_names(&self) -> impl Iterator<Item = &TypeName> {
        self.descriptors.keys()
    }
}

impl TypeSource for TypeCatalog {
    fn describe(&self, type_name: &TypeName) -> HierarchyResult<TypeDescriptor> {
        self.descriptors
            .get(type_name)
            .cloned()
            .ok_or_else(|| HierarchyError::UnknownType {
                type_name: type_name.clone(),
            })
    }

    fn contains(&self, type_name: &TypeName) -> bool {
        self.descriptors.contains_key(type_name)
    }
}
