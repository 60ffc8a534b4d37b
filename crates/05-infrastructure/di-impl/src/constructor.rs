//! 可注入构造函数定义

use std::fmt;
use tang_common::{HierarchyError, HierarchyResult, TypeName};

/// 构造函数参数
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructorArg {
    type_name: TypeName,
    named: Option<TypeName>,
}

impl ConstructorArg {
    /// 创建新的构造函数参数
    pub fn new(type_name: impl Into<TypeName>, named: Option<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            named,
        }
    }

    /// 参数声明类型
    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// 绑定的命名参数
    pub fn named_parameter(&self) -> Option<&TypeName> {
        self.named.as_ref()
    }

    /// 参数名：绑定了命名参数时为命名参数类型，否则为参数类型
    pub fn name(&self) -> &TypeName {
        self.named.as_ref().unwrap_or(&self.type_name)
    }
}

impl fmt::Display for ConstructorArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.named {
            Some(named) => write!(
                f,
                "{} {}",
                self.type_name.simple_name(),
                named.simple_name()
            ),
            None => f.write_str(self.type_name.simple_name()),
        }
    }
}

/// 构造函数定义
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDef {
    args: Vec<ConstructorArg>,
}

impl ConstructorDef {
    /// 创建构造函数定义，参数名重复时失败
    pub fn new(declaring_type: &TypeName, args: Vec<ConstructorArg>) -> HierarchyResult<Self> {
        for (i, arg) in args.iter().enumerate() {
            if args[i + 1..].iter().any(|other| other.name() == arg.name()) {
                return Err(HierarchyError::illegal_injectable(
                    declaring_type,
                    format!("构造函数参数重复: {}", arg.name()),
                ));
            }
        }
        Ok(Self { args })
    }

    /// 有序参数列表
    pub fn args(&self) -> &[ConstructorArg] {
        &self.args
    }

    /// 参数个数
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// 是否为无参构造函数
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// 忽略顺序时参数名集合是否相同；同一类型内出现即为歧义
    pub fn equals_ignore_order(&self, other: &Self) -> bool {
        self.args.len() == other.args.len()
            && self
                .args
                .iter()
                .all(|arg| other.args.iter().any(|o| o.name() == arg.name()))
    }

    /// 特异性排序：`self` 的每个参数都出现在 `other` 中，且参数严格更少
    pub fn is_more_specific_than(&self, other: &Self) -> bool {
        self.args.len() < other.args.len() && self.args.iter().all(|arg| other.args.contains(arg))
    }
}

impl fmt::Display for ConstructorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.args.iter().map(ToString::to_string).collect();
        write!(f, "({})", rendered.join(","))
    }
}
