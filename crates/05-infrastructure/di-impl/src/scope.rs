//! 作用域管理
//!
//! 单例在注册表冻结时预先分配存储槽，之后槽位集合不再变化，
//! 每个槽位保证并发下最多创建一次。

use crate::registry::{Binding, BindingRegistry};
use di_abstractions::Scope;
use infrastructure_common::{InjectionResult, Instance, Key};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use tracing::debug;

/// 作用域管理器
#[derive(Debug, Default)]
pub struct ScopeManager {
    singletons: HashMap<Key, OnceCell<Instance>>,
}

impl ScopeManager {
    /// 为注册表中的单例绑定分配存储槽
    pub fn for_registry(registry: &BindingRegistry) -> Self {
        let singletons = registry
            .iter()
            .filter(|binding| binding.scope().is_singleton())
            .map(|binding| (binding.key().clone(), OnceCell::new()))
            .collect();
        Self { singletons }
    }

    /// 按绑定的作用域取得实例，`provision` 负责实际创建
    pub fn resolve(
        &self,
        binding: &Binding,
        provision: &dyn Fn() -> InjectionResult<Instance>,
    ) -> InjectionResult<Instance> {
        match binding.scope() {
            Scope::Unscoped => provision(),
            Scope::Singleton => match self.singletons.get(binding.key()) {
                Some(slot) => slot
                    .get_or_try_init(|| {
                        debug!("创建单例: {}", binding.key());
                        provision()
                    })
                    .cloned(),
                None => provision(),
            },
            Scope::Contextual(accessor) => accessor.get(binding.key(), provision),
        }
    }

    /// 单例是否已经创建
    pub fn is_instantiated(&self, key: &Key) -> bool {
        self.singletons
            .get(key)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// 单例绑定数量
    pub fn singleton_count(&self) -> usize {
        self.singletons.len()
    }

    /// 已创建的单例数量
    pub fn instantiated_count(&self) -> usize {
        self.singletons
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }
}
