//! 命名空间树
//!
//! 所有节点存放在一个只增不减的 arena 中，父子关系以 `名称 -> NodeId` 映射保存，
//! 配置前缀节点只保存目标句柄，避免所有权环。

use crate::node::{Node, NodeId, NodeKind};
use tang_common::{split_path, HierarchyError, HierarchyResult};
use tracing::{debug, warn};

enum Merge {
    KeepExisting,
    Replace,
    Conflict(String),
}

/// 命名空间树
#[derive(Debug, Clone)]
pub struct NamespaceTree {
    nodes: Vec<Node>,
}

impl NamespaceTree {
    /// 创建只含根命名空间的树
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::namespace("")],
        }
    }

    /// 根节点
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// 节点总数（含根）
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 是否只有根节点
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// 访问节点
    ///
    /// # Panics
    ///
    /// 句柄不属于本树时 panic。
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// 直接子节点查找
    pub fn get(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent).get(name)
    }

    /// 是否存在直接子节点
    pub fn contains(&self, parent: NodeId, name: &str) -> bool {
        self.node(parent).contains(name)
    }

    /// 配置前缀节点重定向到其目标，其他节点原样返回
    pub fn redirect(&self, id: NodeId) -> NodeId {
        match self.node(id).kind() {
            NodeKind::ConfigurationPrefix(prefix) => prefix.target(),
            _ => id,
        }
    }

    /// 将 `node` 插入为 `parent` 的子节点，返回最终占据该位置的节点
    ///
    /// 位置已被占用时：
    /// - 旧节点为命名空间：新节点也是命名空间则保留旧节点，否则冲突；
    /// - 双方均为命名参数：按特异性关系保留更具体者，不可比较则冲突；
    /// - 其他情况一律冲突。
    pub fn put(&mut self, parent: NodeId, node: Node) -> HierarchyResult<NodeId> {
        if self.node(parent).as_configuration_prefix().is_some() {
            return Err(HierarchyError::illegal_state(format!(
                "配置前缀节点 {} 不能拥有子节点",
                self.node(parent)
            )));
        }

        let Some(old_id) = self.get(parent, node.name()) else {
            let id = NodeId(self.nodes.len());
            debug!(parent = self.node(parent).name(), node = %node, "插入节点");
            self.node_mut(parent).insert_child(node.name().to_string(), id);
            self.nodes.push(node);
            return Ok(id);
        };

        match self.merge_decision(old_id, &node) {
            Merge::KeepExisting => Ok(old_id),
            Merge::Replace => {
                debug!(node = %node, "以更具体的命名参数定义替换");
                self.replace(old_id, node)
            }
            Merge::Conflict(message) => Err(HierarchyError::conflict(message)),
        }
    }

    fn merge_decision(&self, old_id: NodeId, node: &Node) -> Merge {
        let old = self.node(old_id);
        match (old.kind(), node.kind()) {
            (NodeKind::Namespace, NodeKind::Namespace) => Merge::KeepExisting,
            (NodeKind::Namespace, _) => {
                Merge::Conflict(format!("期望包 {old}, 实际为类型或参数 {node}"))
            }
            (NodeKind::NamedParameter(existing), NodeKind::NamedParameter(incoming)) => {
                if existing == incoming || existing.is_as_specific_as(incoming) {
                    debug!(node = %old, "保留已有的命名参数定义");
                    Merge::KeepExisting
                } else if incoming.is_as_specific_as(existing) {
                    Merge::Replace
                } else {
                    warn!(existing = %old, incoming = %node, "命名参数定义不兼容");
                    Merge::Conflict(format!("命名参数定义冲突: {node} 与 {old} 不兼容"))
                }
            }
            _ => Merge::Conflict(format!("类型冲突: {node} 与 {old} 占据同一位置")),
        }
    }

    /// 用 `node` 替换 `id` 处的节点，句柄保持不变
    ///
    /// 被丢弃节点的子节点只能转移给类型节点。
    fn replace(&mut self, id: NodeId, mut node: Node) -> HierarchyResult<NodeId> {
        let discarded = self.node_mut(id);
        if discarded.has_children() {
            if node.as_class().is_none() {
                return Err(HierarchyError::illegal_state(format!(
                    "叶子节点 {node} 不应拥有子节点"
                )));
            }
            node.adopt_children(discarded.take_children());
        }
        *self.node_mut(id) = node;
        Ok(id)
    }

    /// 确保路径上的各段都存在，缺失的段以命名空间节点补齐，返回末段节点
    pub fn ensure_path(&mut self, segments: &[&str]) -> HierarchyResult<NodeId> {
        let mut current = self.root();
        for segment in segments {
            current = self.redirect(current);
            current = match self.get(current, segment) {
                Some(child) => child,
                None => self.put(current, Node::namespace(*segment))?,
            };
        }
        Ok(self.redirect(current))
    }

    /// 按限定路径逐段查找
    ///
    /// 途经的配置前缀节点被重定向到目标后继续下降；终点为前缀节点时同样返回目标。
    /// 缺失时返回 `NameResolution`，携带可解析的最长前缀。
    pub fn lookup(&self, path: &str) -> HierarchyResult<NodeId> {
        let segments = split_path(path);
        let mut current = self.root();
        for (depth, segment) in segments.iter().enumerate() {
            current = self.redirect(current);
            current = self
                .get(current, segment)
                .ok_or_else(|| HierarchyError::NameResolution {
                    name: path.to_string(),
                    resolved_prefix: segments[..depth].join("."),
                })?;
        }
        Ok(self.redirect(current))
    }

    /// 深度优先、缩进的整树文本
    pub fn to_indented_string(&self) -> String {
        let mut out = String::new();
        self.write_indented(self.root(), 0, &mut out);
        out
    }

    fn write_indented(&self, id: NodeId, level: usize, out: &mut String) {
        let node = self.node(id);
        out.push_str(&"\t".repeat(level));
        out.push_str(&node.to_string());
        if let Some(prefix) = node.as_configuration_prefix() {
            out.push_str(" -> ");
            out.push_str(&self.node(prefix.target()).to_string());
        }
        out.push('\n');
        for (_, child) in node.children() {
            self.write_indented(child, level + 1, out);
        }
    }

    /// 深度优先遍历所有节点（含根）
    pub fn walk(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            let node = self.node(id);
            let mut children: Vec<NodeId> = node.children().map(|(_, c)| c).collect();
            children.reverse();
            stack.extend(children);
            Some(id)
        })
    }
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}
