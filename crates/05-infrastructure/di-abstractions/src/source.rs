//! 类型元数据来源抽象接口
//!
//! 解析器核心不依赖任何具体的发现机制，只通过此接口按类型标识查询声明信息。

use std::collections::{HashSet, VecDeque};
use tang_common::{HierarchyResult, TypeDescriptor, TypeName};

/// 类型元数据来源 trait
pub trait TypeSource: Send + Sync {
    /// 返回类型声明；来源不认识的类型返回 `UnknownType`
    fn describe(&self, type_name: &TypeName) -> HierarchyResult<TypeDescriptor>;

    /// 来源是否认识该类型
    fn contains(&self, type_name: &TypeName) -> bool {
        self.describe(type_name).is_ok()
    }

    /// `target` 是否可由 `from` 类型的值赋值
    ///
    /// 默认实现沿 `from` 的父类与接口闭包查找 `target`，无法描述的祖先被跳过。
    fn is_assignable(&self, target: &TypeName, from: &TypeName) -> bool {
        if target == from {
            return true;
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([from.clone()]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            let Ok(descriptor) = self.describe(&current) else {
                continue;
            };
            for supertype in descriptor.supertypes() {
                if supertype == target {
                    return true;
                }
                queue.push_back(supertype.clone());
            }
        }
        false
    }
}

impl<S: TypeSource + ?Sized> TypeSource for std::sync::Arc<S> {
    fn describe(&self, type_name: &TypeName) -> HierarchyResult<TypeDescriptor> {
        (**self).describe(type_name)
    }

    fn contains(&self, type_name: &TypeName) -> bool {
        (**self).contains(type_name)
    }

    fn is_assignable(&self, target: &TypeName, from: &TypeName) -> bool {
        (**self).is_assignable(target, from)
    }
}
