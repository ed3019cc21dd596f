//! 元数据定义
//!
//! 提供类型信息、限定符和绑定键

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型信息
///
/// 相等性只由 [`TypeId`] 决定，名称仅用于日志和错误信息。
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    /// 类型ID
    pub id: TypeId,
    /// 完整类型名称（包含模块路径）
    pub name: &'static str,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> String {
        short_type_name(self.name)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// 去掉模块路径，保留 `dyn` 前缀和泛型参数
fn short_type_name(name: &str) -> String {
    let (prefix, rest) = match name.strip_prefix("dyn ") {
        Some(rest) => ("dyn ", rest),
        None => ("", name),
    };
    let head = rest.split('<').next().unwrap_or(rest);
    let short = head.rsplit("::").next().unwrap_or(head);
    format!("{}{}{}", prefix, short, &rest[head.len()..])
}

/// 绑定限定符
///
/// 同一类型、不同限定符的键互不相同。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Qualifier {
    /// 名称限定，例如 `@Named("e")`
    Named(String),
    /// 注解限定，由一个标记类型表示
    Annotation(TypeInfo),
}

impl Qualifier {
    /// 创建名称限定符
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// 创建注解限定符
    pub fn annotation<A: ?Sized + 'static>() -> Self {
        Self::Annotation(TypeInfo::of::<A>())
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qualifier::Named(name) => write!(f, "@Named(\"{}\")", name),
            Qualifier::Annotation(marker) => write!(f, "@{}", marker),
        }
    }
}

/// 绑定键
///
/// (类型, 可选限定符) 组成的不可变值，按结构相等。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    type_info: TypeInfo,
    qualifier: Option<Qualifier>,
}

impl Key {
    /// 未限定的类型键
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            qualifier: None,
        }
    }

    /// 名称限定的类型键
    pub fn named<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::of::<T>().with_qualifier(Qualifier::named(name))
    }

    /// 注解限定的类型键
    pub fn annotated<T: ?Sized + 'static, A: ?Sized + 'static>() -> Self {
        Self::of::<T>().with_qualifier(Qualifier::annotation::<A>())
    }

    /// 替换限定符
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }

    /// 是否带限定符
    pub fn is_qualified(&self) -> bool {
        self.qualifier.is_some()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "Key[{} {}]", qualifier, self.type_info),
            None => write!(f, "Key[{}]", self.type_info),
        }
    }
}
