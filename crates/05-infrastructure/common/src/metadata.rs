//! 类型声明元数据
//!
//! 描述一个类型对解析器可见的全部静态信息：构造函数、参数绑定、父类、接口、
//! 命名参数标注以及命名空间别名。元数据可以由构建期生成器产出，也可以手写为
//! JSON/TOML 目录文件。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 限定名分隔符：`.` 分隔包，`$` 分隔嵌套类型
pub const PATH_SEPARATORS: [char; 2] = ['.', '$'];

/// 类型标识（全局唯一的限定名）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// 创建新的类型标识
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// 完整限定名
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 按 `.`/`$` 拆分后的路径段
    pub fn segments(&self) -> Vec<&str> {
        split_path(&self.0)
    }

    /// 简短名称（最后一个路径段）
    pub fn simple_name(&self) -> &str {
        self.0
            .rsplit(|c| PATH_SEPARATORS.contains(&c))
            .next()
            .unwrap_or(&self.0)
    }

    /// 是否为数组类型
    pub fn is_array(&self) -> bool {
        self.0.ends_with("[]")
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 拆分限定路径
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(|c| PATH_SEPARATORS.contains(&c)).collect()
}

/// 命名参数标注
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedParameterMeta {
    /// 参数值类型，缺省为声明类型本身
    pub value_type: Option<TypeName>,
    /// 默认值（原样保存，不做解释）
    pub default_value: Option<String>,
    /// 文档说明
    pub doc: Option<String>,
    /// 全局短名称
    pub short_name: Option<String>,
}

impl NamedParameterMeta {
    /// 创建新的命名参数标注
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置值类型
    pub fn with_value_type(mut self, value_type: impl Into<TypeName>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }

    /// 设置默认值
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// 设置文档说明
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// 设置短名称
    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    /// 有效短名称；空字符串视为未设置
    pub fn effective_short_name(&self) -> Option<&str> {
        self.short_name.as_deref().filter(|s| !s.is_empty())
    }
}

/// 构造函数参数声明
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// 参数声明类型
    #[serde(rename = "type")]
    pub type_name: TypeName,
    /// 绑定的命名参数
    #[serde(default)]
    pub named: Option<TypeName>,
}

impl ParameterDescriptor {
    /// 未绑定命名参数的位置参数
    pub fn positional(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            named: None,
        }
    }

    /// 绑定到命名参数的参数
    pub fn named(type_name: impl Into<TypeName>, named: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            named: Some(named.into()),
        }
    }
}

/// 构造函数声明
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructorDescriptor {
    /// 是否单独标记为可注入
    pub injectable: bool,
    /// 是否为编译器合成的构造函数
    pub synthetic: bool,
    /// 有序参数列表
    pub parameters: Vec<ParameterDescriptor>,
}

impl ConstructorDescriptor {
    /// 可注入构造函数
    pub fn injectable(parameters: Vec<ParameterDescriptor>) -> Self {
        Self {
            injectable: true,
            synthetic: false,
            parameters,
        }
    }

    /// 普通（未标记）构造函数
    pub fn plain(parameters: Vec<ParameterDescriptor>) -> Self {
        Self {
            injectable: false,
            synthetic: false,
            parameters,
        }
    }

    /// 标记为合成构造函数
    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

/// 类型声明描述符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// 类型标识
    pub name: TypeName,
    /// 词法外围类型
    #[serde(default)]
    pub enclosing: Option<TypeName>,
    /// 词法嵌套类型
    #[serde(default)]
    pub nested: Vec<TypeName>,
    /// 嵌套类型是否为静态（非静态嵌套类型不可注入）
    #[serde(default = "default_true")]
    pub is_static: bool,
    /// 父类
    #[serde(default)]
    pub superclass: Option<TypeName>,
    /// 实现的接口
    #[serde(default)]
    pub interfaces: Vec<TypeName>,
    /// 所有构造函数均可注入
    #[serde(default)]
    pub inject_all_constructors: bool,
    /// 声明的构造函数
    #[serde(default)]
    pub constructors: Vec<ConstructorDescriptor>,
    /// 命名参数标注
    #[serde(default)]
    pub named_parameter: Option<NamedParameterMeta>,
    /// 配置命名空间别名（点分路径）
    #[serde(default)]
    pub namespace: Option<String>,
}

fn default_true() -> bool {
    true
}

impl TypeDescriptor {
    /// 创建新的类型描述符
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            enclosing: None,
            nested: Vec::new(),
            is_static: true,
            superclass: None,
            interfaces: Vec::new(),
            inject_all_constructors: false,
            constructors: Vec::new(),
            named_parameter: None,
            namespace: None,
        }
    }

    /// 设置外围类型
    pub fn enclosed_by(mut self, enclosing: impl Into<TypeName>) -> Self {
        self.enclosing = Some(enclosing.into());
        self
    }

    /// 标记为非静态嵌套类型
    pub fn non_static(mut self) -> Self {
        self.is_static = false;
        self
    }

    /// 添加嵌套类型
    pub fn with_nested(mut self, nested: impl Into<TypeName>) -> Self {
        self.nested.push(nested.into());
        self
    }

    /// 设置父类
    pub fn extends(mut self, superclass: impl Into<TypeName>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// 添加接口
    pub fn implements(mut self, interface: impl Into<TypeName>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// 标记所有构造函数可注入
    pub fn inject_all(mut self) -> Self {
        self.inject_all_constructors = true;
        self
    }

    /// 添加构造函数
    pub fn with_constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// 设置命名参数标注
    pub fn named_parameter(mut self, meta: NamedParameterMeta) -> Self {
        self.named_parameter = Some(meta);
        self
    }

    /// 设置命名空间别名
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// 所有直接引用的父类型（父类 + 接口）
    pub fn supertypes(&self) -> impl Iterator<Item = &TypeName> {
        self.superclass.iter().chain(self.interfaces.iter())
    }

    /// 是否可注入：非静态嵌套类型不可注入
    pub fn is_injectable_kind(&self) -> bool {
        self.enclosing.is_none() || self.is_static
    }

    /// 是否带有任何注入标记
    pub fn has_injection_marks(&self) -> bool {
        self.inject_all_constructors || self.constructors.iter().any(|c| c.injectable)
    }

    /// 注入候选构造函数
    pub fn injection_candidates(&self) -> impl Iterator<Item = &ConstructorDescriptor> {
        let all = self.inject_all_constructors;
        self.constructors
            .iter()
            .filter(move |c| all || c.injectable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_segments() {
        let name = TypeName::new("com.example.Outer$Inner");
        assert_eq!(name.segments(), vec!["com", "example", "Outer", "Inner"]);
        assert_eq!(name.simple_name(), "Inner");
        assert!(!name.is_array());
        assert!(TypeName::new("int[]").is_array());
        assert_eq!(TypeName::new("int").simple_name(), "int");
    }

    #[test]
    fn test_effective_short_name() {
        assert_eq!(NamedParameterMeta::new().effective_short_name(), None);
        let empty = NamedParameterMeta::new().with_short_name("");
        assert_eq!(empty.effective_short_name(), None);
        let named = NamedParameterMeta::new().with_short_name("n");
        assert_eq!(named.effective_short_name(), Some("n"));
    }

    #[test]
    fn test_injection_candidates() {
        let desc = TypeDescriptor::new("a.B")
            .with_constructor(ConstructorDescriptor::plain(vec![]))
            .with_constructor(ConstructorDescriptor::injectable(vec![
                ParameterDescriptor::positional("int"),
            ]));
        assert_eq!(desc.injection_candidates().count(), 1);
        assert_eq!(desc.clone().inject_all().injection_candidates().count(), 2);
    }

    #[test]
    fn test_non_static_nested_is_not_injectable_kind() {
        let desc = TypeDescriptor::new("a.Outer$Inner").enclosed_by("a.Outer");
        assert!(desc.is_injectable_kind());
        assert!(!desc.non_static().is_injectable_kind());
    }

    #[test]
    fn test_descriptor_deserializes_from_json() {
        let json = serde_json::json!({
            "name": "com.example.Timer",
            "superclass": "com.example.Base",
            "constructors": [
                { "injectable": true, "parameters": [
                    { "type": "int", "named": "com.example.Timer$Seconds" }
                ] }
            ],
            "nested": ["com.example.Timer$Seconds"]
        });
        let desc: TypeDescriptor = serde_json::from_value(json).unwrap();
        assert!(desc.is_static);
        assert_eq!(desc.superclass, Some(TypeName::new("com.example.Base")));
        assert_eq!(
            desc.constructors[0].parameters[0],
            ParameterDescriptor::named("int", "com.example.Timer$Seconds")
        );
    }

    #[test]
    fn test_descriptor_deserializes_from_toml() {
        let text = r#"
            name = "com.example.Seconds"
            [named_parameter]
            value_type = "int"
            default_value = "10"
            short_name = "sec"
        "#;
        let desc: TypeDescriptor = toml::from_str(text).unwrap();
        let meta = desc.named_parameter.unwrap();
        assert_eq!(meta.value_type, Some(TypeName::new("int")));
        assert_eq!(meta.effective_short_name(), Some("sec"));
    }
}
