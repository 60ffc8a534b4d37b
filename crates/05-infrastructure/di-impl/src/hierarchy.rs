//! 类型层级注册引擎
//!
//! 按类型标识从 [`TypeSource`] 读取声明，校验注入元数据，将节点写入命名空间树，
//! 并维护实现索引与短名称索引。注册只应在单一写者下进行；注册失败后树处于
//! 不确定但可安全丢弃的状态，不做回滚，失败的类型再次注册时报告同一错误。

use crate::constructor::{ConstructorArg, ConstructorDef};
use crate::node::{ClassNode, NamedParameterNode, Node, NodeId};
use crate::tree::NamespaceTree;
use std::collections::{BTreeMap, HashMap, HashSet};
use tang_common::{
    split_path, HierarchyError, HierarchyOptions, HierarchyResult, NamedParameterMeta,
    TypeDescriptor, TypeName, DEFAULT_MAX_CLOSURE_ROUNDS,
};
use tang_di_abstractions::TypeSource;
use tracing::{debug, info, warn};

/// 类型层级
///
/// 拥有命名空间树、实现索引和短名称索引；多个实例互不影响。
#[derive(Debug)]
pub struct TypeHierarchy<S> {
    source: S,
    pub(crate) tree: NamespaceTree,
    known_impls: HashMap<NodeId, Vec<NodeId>>,
    short_names: BTreeMap<String, NodeId>,
    failed: HashMap<TypeName, HierarchyError>,
    pub(crate) max_closure_rounds: usize,
}

impl<S: TypeSource> TypeHierarchy<S> {
    /// 创建空的类型层级
    pub fn new(source: S) -> Self {
        Self {
            source,
            tree: NamespaceTree::new(),
            known_impls: HashMap::new(),
            short_names: BTreeMap::new(),
            failed: HashMap::new(),
            max_closure_rounds: DEFAULT_MAX_CLOSURE_ROUNDS,
        }
    }

    /// 按配置创建类型层级
    pub fn with_options(source: S, options: &HierarchyOptions) -> Self {
        let mut hierarchy = Self::new(source);
        hierarchy.max_closure_rounds = options.max_closure_rounds;
        hierarchy
    }

    /// 元数据来源
    pub fn source(&self) -> &S {
        &self.source
    }

    /// 命名空间树
    pub fn tree(&self) -> &NamespaceTree {
        &self.tree
    }

    /// 访问节点
    pub fn node(&self, id: NodeId) -> &Node {
        self.tree.node(id)
    }

    /// 注册类型（幂等）
    ///
    /// 依次：注册外围类型、检查是否已注册、构建并插入节点（含配置前缀别名）、
    /// 校验并记录可注入构造函数、注册嵌套类型、注册父类与接口并记录实现关系。
    ///
    /// 注册失败的类型被记录下来，再次注册时返回同一错误。
    pub fn register_class(&mut self, type_name: &TypeName) -> HierarchyResult<NodeId> {
        if let Some(error) = self.failed.get(type_name) {
            return Err(error.clone());
        }
        let result = self.try_register(type_name);
        if let Err(error) = &result {
            warn!(%type_name, %error, "类型注册失败");
            self.failed
                .entry(type_name.clone())
                .or_insert_with(|| error.clone());
        }
        result
    }

    fn try_register(&mut self, type_name: &TypeName) -> HierarchyResult<NodeId> {
        if type_name.is_array() {
            return Err(HierarchyError::UnsupportedType {
                type_name: type_name.clone(),
                reason: "数组类型无法注册".to_string(),
            });
        }
        let descriptor = self.source.describe(type_name)?;

        // 由外向内注册外围类型
        for outer in self.enclosing_chain(&descriptor)?.iter().rev() {
            if self.tree.lookup(outer.as_str()).is_err() {
                self.register_class(outer)?;
            }
        }

        if let Ok(existing) = self.tree.lookup(type_name.as_str()) {
            if !self.tree.node(existing).is_namespace() {
                return Ok(existing);
            }
        }

        let id = match &descriptor.named_parameter {
            Some(meta) => self.insert_named_parameter(&descriptor, meta)?,
            None => self.insert_class(&descriptor)?,
        };

        for nested in &descriptor.nested {
            self.register_class(nested)?;
        }

        for supertype in descriptor.supertypes() {
            self.register_class(supertype)?;
            let super_id = self.tree.lookup(supertype.as_str()).map_err(|e| {
                HierarchyError::illegal_state(format!("父类型 {supertype} 注册后仍无法解析: {e}"))
            })?;
            if self.tree.node(super_id).as_class().is_none() {
                return Err(HierarchyError::illegal_state(format!(
                    "{type_name} 的父类型 {supertype} 不是类型节点"
                )));
            }
            if self.tree.node(id).as_class().is_some() {
                self.put_impl(super_id, id);
            }
        }

        Ok(id)
    }

    /// 外围类型链（由内向外），链上出现重复类型时失败
    fn enclosing_chain(&self, descriptor: &TypeDescriptor) -> HierarchyResult<Vec<TypeName>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([descriptor.name.clone()]);
        let mut enclosing = descriptor.enclosing.clone();
        while let Some(outer) = enclosing {
            if !seen.insert(outer.clone()) {
                return Err(HierarchyError::illegal_state(format!(
                    "{} 的外围类型链存在环: {outer}",
                    descriptor.name
                )));
            }
            enclosing = self.source.describe(&outer)?.enclosing;
            chain.push(outer);
        }
        Ok(chain)
    }

    fn insert_named_parameter(
        &mut self,
        descriptor: &TypeDescriptor,
        meta: &NamedParameterMeta,
    ) -> HierarchyResult<NodeId> {
        let type_name = &descriptor.name;
        if descriptor.namespace.is_some() {
            return Err(HierarchyError::conflict(format!(
                "{type_name} 不能同时是命名空间与命名参数"
            )));
        }
        if descriptor.has_injection_marks() {
            return Err(HierarchyError::illegal_injectable(
                type_name,
                "命名参数类型不能声明可注入构造函数",
            ));
        }

        let parameter = NamedParameterNode::new(type_name.clone(), Some(meta.clone()));
        let short_name = parameter.short_name().map(str::to_string);
        if let Some(short_name) = &short_name {
            if let Some(&existing) = self.short_names.get(short_name) {
                let existing = self.owner_name(existing);
                return Err(HierarchyError::DuplicateShortName {
                    short_name: short_name.clone(),
                    existing,
                    type_name: type_name.clone(),
                });
            }
        }

        let id = self.insert_at_type_path(type_name, Node::named_parameter(parameter))?;
        if let Some(short_name) = short_name {
            self.short_names.insert(short_name, id);
        }
        debug!(%type_name, "注册命名参数");
        Ok(id)
    }

    fn insert_class(&mut self, descriptor: &TypeDescriptor) -> HierarchyResult<NodeId> {
        let type_name = &descriptor.name;
        if !descriptor.is_injectable_kind() && descriptor.has_injection_marks() {
            return Err(HierarchyError::illegal_injectable(
                type_name,
                "非静态嵌套类型不可注入",
            ));
        }
        if descriptor.injection_candidates().any(|c| c.synthetic) {
            return Err(HierarchyError::illegal_injectable(
                type_name,
                "合成构造函数不可注入",
            ));
        }

        let constructors = build_constructors(descriptor)?;

        let class = ClassNode::new(type_name.clone(), descriptor.namespace.is_some())
            .with_supertypes(descriptor.superclass.clone(), descriptor.interfaces.clone());
        let id = self.insert_at_type_path(type_name, Node::class(class))?;
        if let Some(alias) = &descriptor.namespace {
            self.insert_prefix(alias, id)?;
        }

        // 节点先入树再解析参数绑定，嵌套在本类型内的命名参数才能找到外围节点
        for arg in constructors.iter().flat_map(ConstructorDef::args) {
            if let Some(named) = arg.named_parameter() {
                self.check_binding(type_name, arg.type_name(), named)?;
            }
        }
        if let Some(class) = self.tree.node_mut(id).class_mut() {
            class.set_constructors(constructors);
        }
        debug!(%type_name, "注册类型");
        Ok(id)
    }

    /// 校验参数绑定：目标必须是命名参数，且参数类型可由其值类型赋值
    fn check_binding(
        &mut self,
        type_name: &TypeName,
        parameter_type: &TypeName,
        named: &TypeName,
    ) -> HierarchyResult<()> {
        let id = match self.tree.lookup(named.as_str()) {
            Ok(id) => id,
            Err(e) if e.is_name_resolution() => self.register_class(named)?,
            Err(e) => return Err(e),
        };
        let Some(parameter) = self.tree.node(id).as_named_parameter() else {
            return Err(HierarchyError::NotNamedParameter {
                type_name: type_name.clone(),
                parameter: named.clone(),
            });
        };
        if !self.source.is_assignable(parameter_type, parameter.arg_type()) {
            return Err(HierarchyError::TypeMismatch {
                type_name: type_name.clone(),
                parameter: named.clone(),
                expected: parameter_type.clone(),
                actual: parameter.arg_type().clone(),
            });
        }
        Ok(())
    }

    fn insert_at_type_path(&mut self, type_name: &TypeName, node: Node) -> HierarchyResult<NodeId> {
        let segments = type_name.segments();
        let (_, packages) = segments
            .split_last()
            .ok_or_else(|| HierarchyError::illegal_state(format!("空类型名: '{type_name}'")))?;
        let parent = self.tree.ensure_path(packages)?;
        self.tree.put(parent, node)
    }

    fn insert_prefix(&mut self, alias: &str, target: NodeId) -> HierarchyResult<NodeId> {
        let is_prefix_target = self
            .tree
            .node(target)
            .as_class()
            .is_some_and(ClassNode::is_prefix_target);
        if !is_prefix_target {
            return Err(HierarchyError::illegal_state(format!(
                "{} 不能作为配置前缀目标",
                self.tree.node(target)
            )));
        }

        let segments = split_path(alias);
        let (last, packages) = segments
            .split_last()
            .ok_or_else(|| HierarchyError::illegal_state("空的命名空间别名"))?;
        let parent = self.tree.ensure_path(packages)?;
        let prefix = Node::configuration_prefix(*last, target);
        let id = self.tree.put(parent, prefix)?;
        debug!(alias, "注册配置前缀");
        Ok(id)
    }

    fn put_impl(&mut self, supertype: NodeId, implementation: NodeId) {
        if supertype == implementation {
            return;
        }
        let impls = self.known_impls.entry(supertype).or_default();
        if !impls.contains(&implementation) {
            impls.push(implementation);
        }
    }

    fn owner_name(&self, id: NodeId) -> TypeName {
        match self.tree.node(id).as_named_parameter() {
            Some(parameter) => parameter.type_name().clone(),
            None => TypeName::new(self.tree.node(id).name()),
        }
    }

    /// 已知的实现类型（按发现顺序）
    pub fn known_impls(&self, node: NodeId) -> &[NodeId] {
        self.known_impls
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 按短名称查找命名参数节点
    pub fn node_from_short_name(&self, short_name: &str) -> Option<NodeId> {
        self.short_names.get(short_name).copied()
    }

    /// 所有带短名称的命名参数节点（按短名称排序）
    pub fn named_parameter_nodes(&self) -> Vec<NodeId> {
        self.short_names.values().copied().collect()
    }

    /// 导出整棵命名空间树
    pub fn export_namespace(&self) -> String {
        self.tree.to_indented_string()
    }

    /// 依次注册多个根类型
    pub fn register_all<'a, I>(&mut self, roots: I) -> HierarchyResult<()>
    where
        I: IntoIterator<Item = &'a TypeName>,
    {
        for root in roots {
            info!(%root, "注册根类型");
            self.register_class(root)?;
        }
        Ok(())
    }
}

/// 由声明构建可注入构造函数，拒绝参数重复与仅顺序不同的构造函数
fn build_constructors(descriptor: &TypeDescriptor) -> HierarchyResult<Vec<ConstructorDef>> {
    let type_name = &descriptor.name;
    let mut accepted: Vec<ConstructorDef> = Vec::new();

    for constructor in descriptor.injection_candidates() {
        let args = constructor
            .parameters
            .iter()
            .map(|p| ConstructorArg::new(p.type_name.clone(), p.named.clone()))
            .collect();
        let def = ConstructorDef::new(type_name, args)?;
        if accepted.iter().any(|other| other.equals_ignore_order(&def)) {
            return Err(HierarchyError::AmbiguousConstructor {
                type_name: type_name.clone(),
                constructor: def.to_string(),
            });
        }
        accepted.push(def);
    }
    Ok(accepted)
}
