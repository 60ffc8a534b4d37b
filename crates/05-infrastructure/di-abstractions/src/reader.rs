//! 类型层级只读查询接口
//!
//! 构建阶段结束后，层级被视为不可变，注入引擎只通过此接口读取。

use std::collections::BTreeSet;
use tang_common::{HierarchyResult, TypeName};

/// 类型层级只读查询 trait
pub trait HierarchyReader: Send + Sync {
    /// 节点句柄
    type NodeRef: Copy + Eq;

    /// 按限定路径查找节点，途经的配置前缀节点会被透明重定向
    fn lookup(&self, path: &str) -> HierarchyResult<Self::NodeRef>;

    /// 路径是否可解析
    fn contains_path(&self, path: &str) -> bool {
        self.lookup(path).is_ok()
    }

    /// 已知的实现类型（按发现顺序）
    fn known_impls(&self, node: Self::NodeRef) -> &[Self::NodeRef];

    /// 按短名称查找命名参数节点
    fn node_from_short_name(&self, short_name: &str) -> Option<Self::NodeRef>;

    /// 所有带短名称的命名参数节点
    fn named_parameter_nodes(&self) -> Vec<Self::NodeRef>;

    /// 导出整棵命名空间树（诊断用，非稳定格式）
    fn export_namespace(&self) -> String;

    /// 已被引用但尚未注册的类型
    fn find_unresolved_classes(&self) -> BTreeSet<TypeName>;
}
