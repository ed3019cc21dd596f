//! 绑定注册表
//!
//! 由构建器单线程填充，冻结后只读，查找不加锁也不会创建实例。

use di_abstractions::{
    BindingDefinition, BindingSource, Dependency, MemberInjector, PendingInstance,
    PendingProvider, ProviderGetFn, RawProvider, Scope, TypeDescriptor,
};
use infrastructure_common::{ConfigurationError, InjectionResult, Instance, Key};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// 已冻结的实例来源
pub(crate) enum Source {
    Instance(Instance),
    Provider(Arc<dyn RawProvider>),
    ProviderType {
        provider: Dependency,
        get: ProviderGetFn,
    },
    Constructor(TypeDescriptor),
    InjectedInstance(Deferred<Instance, PendingInstance>),
    InjectedProvider(Deferred<Arc<dyn RawProvider>, PendingProvider>),
}

impl From<BindingSource> for Source {
    fn from(source: BindingSource) -> Self {
        match source {
            BindingSource::Instance(instance) => Source::Instance(instance),
            BindingSource::InjectedInstance(pending) => {
                Source::InjectedInstance(Deferred::new(pending))
            }
            BindingSource::Provider(provider) => Source::Provider(provider),
            BindingSource::InjectedProvider(pending) => {
                Source::InjectedProvider(Deferred::new(pending))
            }
            BindingSource::ProviderType { provider, get } => Source::ProviderType { provider, get },
            BindingSource::Constructor(descriptor) => Source::Constructor(descriptor),
        }
    }
}

impl Source {
    fn name(&self) -> &'static str {
        match self {
            Source::Instance(_) => "instance",
            Source::Provider(_) => "provider",
            Source::ProviderType { .. } => "provider-type",
            Source::Constructor(_) => "constructor",
            Source::InjectedInstance(_) => "injected-instance",
            Source::InjectedProvider(_) => "injected-provider",
        }
    }
}

/// 需要在容器构建后完成成员注入的值
///
/// 初始化最多执行一次；并发的首次访问被串行化。
pub(crate) struct Deferred<V, F> {
    init: Mutex<Option<F>>,
    value: OnceCell<V>,
}

impl<V: Clone> Deferred<V, Box<dyn FnOnce(&dyn MemberInjector) -> InjectionResult<V> + Send>> {
    fn new(init: Box<dyn FnOnce(&dyn MemberInjector) -> InjectionResult<V> + Send>) -> Self {
        Self {
            init: Mutex::new(Some(init)),
            value: OnceCell::new(),
        }
    }

    /// 取得值，首次访问时执行成员注入
    pub(crate) fn force(&self, key: &Key, injector: &dyn MemberInjector) -> InjectionResult<V> {
        self.value
            .get_or_try_init(|| {
                let init = self.init.lock().take().ok_or_else(|| {
                    ConfigurationError::BindingUnavailable {
                        key: key.to_string(),
                        message: "member injection failed earlier".to_string(),
                    }
                })?;
                init(injector)
            })
            .cloned()
    }
}

/// 一条冻结后的绑定
pub struct Binding {
    key: Key,
    pub(crate) source: Source,
    scope: Scope,
    eager: bool,
}

impl Binding {
    /// 绑定键
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// 绑定的作用域
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// 是否显式声明为预先创建的单例
    pub fn is_eager(&self) -> bool {
        self.eager
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("source", &self.source.name())
            .field("scope", &self.scope)
            .field("eager", &self.eager)
            .finish()
    }
}

/// 绑定注册表
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: HashMap<Key, Binding>,
    /// 首次登记顺序，用于确定性的遍历
    order: Vec<Key>,
}

impl BindingRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 从绑定声明构建注册表
    pub fn from_definitions(definitions: impl IntoIterator<Item = BindingDefinition>) -> Self {
        let mut registry = Self::new();
        for definition in definitions {
            registry.register(definition);
        }
        registry
    }

    /// 登记或覆盖一条绑定，相同键后登记者生效（包括作用域）
    pub fn register(&mut self, definition: BindingDefinition) {
        let BindingDefinition {
            key,
            source,
            scope,
            eager,
        } = definition;
        let binding = Binding {
            key: key.clone(),
            source: Source::from(source),
            scope,
            eager,
        };
        debug!(
            "登记绑定: {} -> {} ({:?})",
            key,
            binding.source.name(),
            binding.scope
        );
        if self.bindings.insert(key.clone(), binding).is_some() {
            warn!("绑定被覆盖，后登记者生效: {}", key);
        } else {
            self.order.push(key);
        }
    }

    /// 查找绑定，不会触发实例创建
    pub fn lookup(&self, key: &Key) -> Option<&Binding> {
        self.bindings.get(key)
    }

    /// 是否存在该键的绑定
    pub fn contains(&self, key: &Key) -> bool {
        self.bindings.contains_key(key)
    }

    /// 按首次登记顺序遍历绑定
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.order.iter().filter_map(|key| self.bindings.get(key))
    }

    /// 所有已登记的键
    pub fn keys(&self) -> Vec<Key> {
        self.order.clone()
    }

    /// 绑定数量
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
