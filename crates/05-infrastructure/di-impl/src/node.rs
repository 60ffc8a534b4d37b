//! 命名空间树节点模型
//!
//! 四种节点构成封闭集合：命名空间、类型、命名参数、配置前缀。
//! 节点存放在 [`NamespaceTree`](crate::tree::NamespaceTree) 的 arena 中，
//! 通过 [`NodeId`] 互相引用。

use crate::constructor::ConstructorDef;
use std::collections::BTreeMap;
use std::fmt;
use tang_common::{HierarchyError, HierarchyResult, NamedParameterMeta, TypeName};

/// 节点句柄（arena 下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// arena 下标
    pub fn index(self) -> usize {
        self.0
    }
}

/// 命名空间树节点
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    kind: NodeKind,
    children: BTreeMap<String, NodeId>,
}

/// 节点种类
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// 纯分组节点（包路径段）
    Namespace,
    /// 类型节点
    Class(ClassNode),
    /// 命名参数节点
    NamedParameter(NamedParameterNode),
    /// 配置前缀别名节点
    ConfigurationPrefix(ConfigurationPrefixNode),
}

impl NodeKind {
    /// 种类名称，用于导出和错误信息
    pub fn label(&self) -> &'static str {
        match self {
            Self::Namespace => "NamespaceNode",
            Self::Class(_) => "ClassNode",
            Self::NamedParameter(_) => "NamedParameterNode",
            Self::ConfigurationPrefix(_) => "ConfigurationPrefixNode",
        }
    }
}

impl Node {
    /// 创建命名空间节点
    pub fn namespace(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Namespace)
    }

    /// 创建类型节点，名称为类型的简短名称
    pub fn class(class: ClassNode) -> Self {
        let name = class.type_name().simple_name().to_string();
        Self::with_kind(name, NodeKind::Class(class))
    }

    /// 创建命名参数节点，名称为类型的简短名称
    pub fn named_parameter(parameter: NamedParameterNode) -> Self {
        let name = parameter.type_name().simple_name().to_string();
        Self::with_kind(name, NodeKind::NamedParameter(parameter))
    }

    /// 创建配置前缀节点
    pub fn configuration_prefix(name: impl Into<String>, target: NodeId) -> Self {
        Self::with_kind(
            name,
            NodeKind::ConfigurationPrefix(ConfigurationPrefixNode { target }),
        )
    }

    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            children: BTreeMap::new(),
        }
    }

    /// 节点简短名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 节点种类
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// 子节点（按名称排序）
    pub fn children(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.children.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// 是否存在指定名称的子节点
    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// 查找指定名称的子节点
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }

    /// 是否有子节点
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// 是否为命名空间节点
    pub fn is_namespace(&self) -> bool {
        matches!(self.kind, NodeKind::Namespace)
    }

    /// 作为类型节点访问
    pub fn as_class(&self) -> Option<&ClassNode> {
        match &self.kind {
            NodeKind::Class(class) => Some(class),
            _ => None,
        }
    }

    /// 作为命名参数节点访问
    pub fn as_named_parameter(&self) -> Option<&NamedParameterNode> {
        match &self.kind {
            NodeKind::NamedParameter(parameter) => Some(parameter),
            _ => None,
        }
    }

    /// 作为配置前缀节点访问
    pub fn as_configuration_prefix(&self) -> Option<&ConfigurationPrefixNode> {
        match &self.kind {
            NodeKind::ConfigurationPrefix(prefix) => Some(prefix),
            _ => None,
        }
    }

    pub(crate) fn class_mut(&mut self) -> Option<&mut ClassNode> {
        match &mut self.kind {
            NodeKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub(crate) fn insert_child(&mut self, name: String, id: NodeId) {
        self.children.insert(name, id);
    }

    pub(crate) fn take_children(&mut self) -> BTreeMap<String, NodeId> {
        std::mem::take(&mut self.children)
    }

    pub(crate) fn adopt_children(&mut self, children: BTreeMap<String, NodeId>) {
        self.children.extend(children);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = format!("[{} {}]", self.kind.label(), self.name);
        match &self.kind {
            NodeKind::Namespace | NodeKind::ConfigurationPrefix(_) => f.write_str(&header),
            NodeKind::Class(class) => {
                write!(f, "{header}: ")?;
                for constructor in class.constructors() {
                    write!(f, "{constructor}, ")?;
                }
                Ok(())
            }
            NodeKind::NamedParameter(parameter) => {
                write!(f, "{} {header}", parameter.arg_type().simple_name())?;
                if let Some(default_value) = parameter.default_value() {
                    write!(f, " default={default_value}")?;
                }
                if let Some(doc) = parameter.doc() {
                    write!(f, " Documentation: {doc}")?;
                }
                Ok(())
            }
        }
    }
}

/// 类型节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    type_name: TypeName,
    is_prefix_target: bool,
    constructors: Vec<ConstructorDef>,
    superclass: Option<TypeName>,
    interfaces: Vec<TypeName>,
}

impl ClassNode {
    /// 创建新的类型节点
    pub fn new(type_name: impl Into<TypeName>, is_prefix_target: bool) -> Self {
        Self {
            type_name: type_name.into(),
            is_prefix_target,
            constructors: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
        }
    }

    /// 设置父类型
    pub fn with_supertypes(
        mut self,
        superclass: Option<TypeName>,
        interfaces: Vec<TypeName>,
    ) -> Self {
        self.superclass = superclass;
        self.interfaces = interfaces;
        self
    }

    /// 设置已接受的构造函数
    pub fn with_constructors(mut self, constructors: Vec<ConstructorDef>) -> Self {
        self.constructors = constructors;
        self
    }

    pub(crate) fn set_constructors(&mut self, constructors: Vec<ConstructorDef>) {
        self.constructors = constructors;
    }

    /// 类型标识
    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// 是否可作为配置前缀目标
    pub fn is_prefix_target(&self) -> bool {
        self.is_prefix_target
    }

    /// 已接受的可注入构造函数
    pub fn constructors(&self) -> &[ConstructorDef] {
        &self.constructors
    }

    /// 父类
    pub fn superclass(&self) -> Option<&TypeName> {
        self.superclass.as_ref()
    }

    /// 实现的接口
    pub fn interfaces(&self) -> &[TypeName] {
        &self.interfaces
    }

    /// 所有被引用的类型：构造函数参数类型、父类、接口
    pub fn referenced_types(&self) -> impl Iterator<Item = &TypeName> {
        self.constructors
            .iter()
            .flat_map(|c| c.args().iter().map(|a| a.type_name()))
            .chain(self.superclass.iter())
            .chain(self.interfaces.iter())
    }

    /// 选出唯一最具体的构造函数
    ///
    /// 没有可注入构造函数时返回 `None`；不存在唯一极大元时返回
    /// `AmbiguousConstructor`。
    pub fn most_specific_constructor(&self) -> HierarchyResult<Option<&ConstructorDef>> {
        let maximal: Vec<&ConstructorDef> = self
            .constructors
            .iter()
            .filter(|candidate| {
                !self
                    .constructors
                    .iter()
                    .any(|other| other.is_more_specific_than(candidate))
            })
            .collect();

        match maximal.as_slice() {
            [] if self.constructors.is_empty() => Ok(None),
            [only] => Ok(Some(*only)),
            _ => Err(HierarchyError::AmbiguousConstructor {
                type_name: self.type_name.clone(),
                constructor: maximal
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" | "),
            }),
        }
    }
}

/// 命名参数节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedParameterNode {
    type_name: TypeName,
    arg_type: TypeName,
    metadata: Option<NamedParameterMeta>,
}

impl NamedParameterNode {
    /// 创建新的命名参数节点；值类型缺省为声明类型本身
    pub fn new(type_name: impl Into<TypeName>, metadata: Option<NamedParameterMeta>) -> Self {
        let type_name = type_name.into();
        let arg_type = metadata
            .as_ref()
            .and_then(|m| m.value_type.clone())
            .unwrap_or_else(|| type_name.clone());
        Self {
            type_name,
            arg_type,
            metadata,
        }
    }

    /// 声明类型
    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// 参数值类型
    pub fn arg_type(&self) -> &TypeName {
        &self.arg_type
    }

    /// 命名参数标注
    pub fn metadata(&self) -> Option<&NamedParameterMeta> {
        self.metadata.as_ref()
    }

    /// 默认值
    pub fn default_value(&self) -> Option<&str> {
        self.metadata.as_ref()?.default_value.as_deref()
    }

    /// 文档说明
    pub fn doc(&self) -> Option<&str> {
        self.metadata.as_ref()?.doc.as_deref()
    }

    /// 短名称；空字符串视为未注册
    pub fn short_name(&self) -> Option<&str> {
        self.metadata.as_ref()?.effective_short_name()
    }

    /// 特异性关系：`self` 是否至少与 `other` 一样具体
    ///
    /// 只有值类型与名称相同的节点可比较。有标注者支配无标注者，标注相同者互相支配，
    /// 标注不同者不可比较。
    pub fn is_as_specific_as(&self, other: &Self) -> bool {
        if self.arg_type != other.arg_type {
            return false;
        }
        if self.type_name.simple_name() != other.type_name.simple_name() {
            return false;
        }
        match (&self.metadata, &other.metadata) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(mine), Some(theirs)) => mine == theirs,
        }
    }
}

/// 配置前缀节点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigurationPrefixNode {
    target: NodeId,
}

impl ConfigurationPrefixNode {
    /// 别名指向的类型节点
    pub fn target(&self) -> NodeId {
        self.target
    }
}
