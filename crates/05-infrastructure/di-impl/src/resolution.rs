//! 路径解析与未解析类型闭包

use crate::hierarchy::TypeHierarchy;
use crate::node::{NodeId, NodeKind};
use std::collections::BTreeSet;
use tang_common::{HierarchyError, HierarchyResult, TypeName};
use tang_di_abstractions::{HierarchyReader, TypeSource};
use tracing::{debug, info};

impl<S: TypeSource> TypeHierarchy<S> {
    /// 按限定路径查找节点，失败时返回携带最长可解析前缀的 `NameResolution`
    pub fn get_node(&self, path: &str) -> HierarchyResult<NodeId> {
        self.tree.lookup(path)
    }

    /// 路径是否可解析
    pub fn contains(&self, path: &str) -> bool {
        self.get_node(path).is_ok()
    }

    /// 收集所有被引用但当前无法解析的类型
    ///
    /// 命名参数检查其值类型；类型节点检查构造函数参数类型、父类与接口。
    pub fn find_unresolved_classes(&self) -> BTreeSet<TypeName> {
        let mut unresolved = BTreeSet::new();
        for id in self.tree.walk() {
            match self.tree.node(id).kind() {
                NodeKind::NamedParameter(parameter) => {
                    self.collect_if_unresolved(parameter.arg_type(), &mut unresolved);
                }
                NodeKind::Class(class) => {
                    for referenced in class.referenced_types() {
                        self.collect_if_unresolved(referenced, &mut unresolved);
                    }
                }
                NodeKind::Namespace | NodeKind::ConfigurationPrefix(_) => {}
            }
        }
        unresolved
    }

    fn collect_if_unresolved(&self, type_name: &TypeName, unresolved: &mut BTreeSet<TypeName>) {
        if self.tree.lookup(type_name.as_str()).is_err() {
            unresolved.insert(type_name.clone());
        }
    }

    /// 反复注册未解析类型直至不动点，返回执行的轮数
    pub fn resolve_all_classes(&mut self) -> HierarchyResult<usize> {
        self.resolve_all_classes_with(|_, _| {})
    }

    /// 同 [`resolve_all_classes`](Self::resolve_all_classes)，每轮开始前回调
    /// `observer(轮次, 本轮未解析类型)`
    ///
    /// 超过 `max_closure_rounds` 仍未收敛时返回 `ClosureDidNotConverge`；
    /// 来源无法描述的类型以 `UnknownType` 直接失败。
    pub fn resolve_all_classes_with<F>(&mut self, mut observer: F) -> HierarchyResult<usize>
    where
        F: FnMut(usize, &BTreeSet<TypeName>),
    {
        let mut rounds = 0;
        loop {
            let unresolved = self.find_unresolved_classes();
            if unresolved.is_empty() {
                info!(rounds, nodes = self.tree.len(), "类型闭包计算完成");
                return Ok(rounds);
            }
            if rounds >= self.max_closure_rounds {
                return Err(HierarchyError::ClosureDidNotConverge {
                    rounds,
                    unresolved: unresolved.into_iter().collect(),
                });
            }

            rounds += 1;
            info!(
                round = rounds,
                count = unresolved.len(),
                "发现未解析类型, 开始加载"
            );
            observer(rounds, &unresolved);
            for type_name in &unresolved {
                debug!(%type_name, "加载未解析类型");
                self.register_class(type_name)?;
            }
        }
    }
}

impl<S: TypeSource> HierarchyReader for TypeHierarchy<S> {
    type NodeRef = NodeId;

    fn lookup(&self, path: &str) -> HierarchyResult<NodeId> {
        self.get_node(path)
    }

    fn known_impls(&self, node: NodeId) -> &[NodeId] {
        TypeHierarchy::known_impls(self, node)
    }

    fn node_from_short_name(&self, short_name: &str) -> Option<NodeId> {
        TypeHierarchy::node_from_short_name(self, short_name)
    }

    fn named_parameter_nodes(&self) -> Vec<NodeId> {
        TypeHierarchy::named_parameter_nodes(self)
    }

    fn export_namespace(&self) -> String {
        TypeHierarchy::export_namespace(self)
    }

    fn find_unresolved_classes(&self) -> BTreeSet<TypeName> {
        TypeHierarchy::find_unresolved_classes(self)
    }
}
