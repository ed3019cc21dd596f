//! 作用域抽象
//!
//! 上下文作用域由宿主环境（例如 Web 集成）提供访问器，容器本身不缓存上下文实例。

use infrastructure_common::{InjectionResult, Instance, Key, Lifetime};
use std::fmt;
use std::sync::Arc;

/// 上下文访问器
///
/// 在解析期间被同步调用。`unscoped` 会调用绑定本身的提供者，访问器可以把结果
/// 缓存在当前上下文中，也可以完全忽略它。在有效上下文之外调用时必须返回
/// [`infrastructure_common::ConfigurationError::OutOfScope`]。
pub trait ContextAccessor: Send + Sync {
    /// 作用域名称，用于日志和错误信息
    fn scope_name(&self) -> &str;

    /// 取得当前上下文中 `key` 对应的实例
    fn get(
        &self,
        key: &Key,
        unscoped: &dyn Fn() -> InjectionResult<Instance>,
    ) -> InjectionResult<Instance>;
}

/// 绑定作用域
#[derive(Clone, Default)]
pub enum Scope {
    /// 每次解析都调用提供者
    #[default]
    Unscoped,
    /// 每个容器一个实例，首次解析时创建
    Singleton,
    /// 实例来自外部上下文
    Contextual(Arc<dyn ContextAccessor>),
}

impl Scope {
    /// 创建上下文作用域
    pub fn contextual<A: ContextAccessor + 'static>(accessor: A) -> Self {
        Self::Contextual(Arc::new(accessor))
    }

    /// 对应的生命周期类型
    pub fn lifetime(&self) -> Lifetime {
        match self {
            Scope::Unscoped => Lifetime::Unscoped,
            Scope::Singleton => Lifetime::Singleton,
            Scope::Contextual(_) => Lifetime::Contextual,
        }
    }

    pub fn is_singleton(&self) -> bool {
        matches!(self, Scope::Singleton)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Unscoped => f.write_str("Unscoped"),
            Scope::Singleton => f.write_str("Singleton"),
            Scope::Contextual(accessor) => {
                f.debug_tuple("Contextual").field(&accessor.scope_name()).finish()
            }
        }
    }
}
