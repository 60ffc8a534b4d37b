//! 可在线程间共享的类型层级
//!
//! 注册与闭包计算在写锁下整体完成；构建完成后的查询只需读锁。

use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::BTreeSet;
use std::sync::Arc;
use tang_common::{HierarchyResult, TypeName};
use tang_di_abstractions::TypeSource;
use tang_di_impl::{NodeId, TypeHierarchy};
use tracing::debug;

/// 由读写锁保护的共享类型层级
pub struct SharedTypeHierarchy<S> {
    inner: Arc<RwLock<TypeHierarchy<S>>>,
}

impl<S: TypeSource> SharedTypeHierarchy<S> {
    /// 包装类型层级
    pub fn new(hierarchy: TypeHierarchy<S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(hierarchy)),
        }
    }

    /// 在写锁下注册类型
    pub fn register_class(&self, type_name: &TypeName) -> HierarchyResult<NodeId> {
        let mut hierarchy = self.inner.write();
        debug!(%type_name, "获取写锁注册类型");
        hierarchy.register_class(type_name)
    }

    /// 在写锁下计算闭包，返回执行的轮数
    pub fn resolve_all_classes(&self) -> HierarchyResult<usize> {
        self.inner.write().resolve_all_classes()
    }

    /// 获取读锁
    pub fn read(&self) -> RwLockReadGuard<'_, TypeHierarchy<S>> {
        self.inner.read()
    }

    /// 路径是否可解析
    pub fn contains(&self, path: &str) -> bool {
        self.inner.read().contains(path)
    }

    /// 当前未解析的类型
    pub fn find_unresolved_classes(&self) -> BTreeSet<TypeName> {
        self.inner.read().find_unresolved_classes()
    }

    /// 导出整棵命名空间树
    pub fn export_namespace(&self) -> String {
        self.inner.read().export_namespace()
    }

    /// 取回内部类型层级；仍有其他持有者时原样返回 `Err`
    pub fn try_into_inner(self) -> Result<TypeHierarchy<S>, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<S> Clone for SharedTypeHierarchy<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: TypeSource> From<TypeHierarchy<S>> for SharedTypeHierarchy<S> {
    fn from(hierarchy: TypeHierarchy<S>) -> Self {
        Self::new(hierarchy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tang_common::{ConstructorDescriptor, ParameterDescriptor, TypeDescriptor};
    use tang_di_impl::TypeCatalog;

    fn catalog() -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        for i in 0..8 {
            catalog
                .insert(
                    TypeDescriptor::new(format!("pkg.Service{i}")).with_constructor(
                        ConstructorDescriptor::injectable(vec![ParameterDescriptor::positional(
                            "pkg.Shared",
                        )]),
                    ),
                )
                .unwrap();
        }
        catalog.declare("pkg.Shared").unwrap();
        catalog
    }

    #[test]
    fn test_concurrent_registration_under_write_lock() {
        let shared = SharedTypeHierarchy::new(TypeHierarchy::new(catalog()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    shared
                        .register_class(&TypeName::new(format!("pkg.Service{i}")))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            shared
                .find_unresolved_classes()
                .into_iter()
                .collect::<Vec<_>>(),
            vec![TypeName::new("pkg.Shared")]
        );
        assert_eq!(shared.resolve_all_classes().unwrap(), 1);
        for i in 0..8 {
            assert!(shared.contains(&format!("pkg.Service{i}")));
        }
        assert!(shared.read().contains("pkg.Shared"));
    }

    #[test]
    fn test_try_into_inner_requires_sole_owner() {
        let shared = SharedTypeHierarchy::new(TypeHierarchy::new(catalog()));
        let other = shared.clone();
        let shared = shared.try_into_inner().unwrap_err();
        drop(other);
        let hierarchy = shared.try_into_inner().ok().unwrap();
        assert!(hierarchy.tree().is_empty());
    }
}
