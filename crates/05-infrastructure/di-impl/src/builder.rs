//! 容器构建器
//!
//! 收集模块的绑定声明，冻结为注册表后依次完成：
//! 注入预置实例和提供者的成员、静态注入、预先创建单例。任何一步失败都会中止构建。

use crate::injector::Container;
use crate::registry::{BindingRegistry, Source};
use crate::static_injection::StaticInjectionRunner;
use di_abstractions::{
    Binder, BindingDefinition, ContainerConfig, Injectable, Module, TypeDescriptor,
};
use infrastructure_common::{ConfigurationError, InjectionResult};
use tracing::{debug, info};

/// 容器构建器
#[derive(Default)]
pub struct ContainerBuilder {
    config: ContainerConfig,
    definitions: Vec<BindingDefinition>,
    static_targets: Vec<TypeDescriptor>,
}

impl ContainerBuilder {
    /// 使用默认配置创建构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 安装模块
    pub fn install(self, module: impl Module) -> Self {
        self.install_ref(&module)
    }

    /// 安装模块引用
    pub fn install_ref(mut self, module: &dyn Module) -> Self {
        module.configure(&mut self);
        self
    }

    /// 请求对 `T` 执行静态注入
    pub fn request_static_injection<T: Injectable>(mut self) -> Self {
        self.request_static_injection_for(TypeDescriptor::of::<T>());
        self
    }

    /// 构建容器
    pub fn build(self) -> InjectionResult<Container> {
        let registry = BindingRegistry::from_definitions(self.definitions);
        let container = Container::new(self.config, registry, self.static_targets);

        inject_pending_members(&container)?;
        StaticInjectionRunner::new(&container).run()?;
        create_eager_singletons(&container)?;

        let stats = container.stats();
        info!(
            "容器构建完成: {} 个绑定, {} 个单例 ({} 个已创建), {} 个静态注入目标",
            stats.registered_bindings,
            stats.singleton_bindings,
            stats.instantiated_singletons,
            stats.static_targets
        );
        Ok(container)
    }
}

impl Binder for ContainerBuilder {
    fn register(&mut self, definition: BindingDefinition) {
        self.definitions.push(definition);
    }

    fn request_static_injection_for(&mut self, target: TypeDescriptor) {
        let type_info = target.type_info();
        if self
            .static_targets
            .iter()
            .any(|existing| existing.type_info() == type_info)
        {
            debug!("重复的静态注入请求: {}", type_info);
            return;
        }
        self.static_targets.push(target);
    }

    fn install(&mut self, module: &dyn Module) {
        module.configure(self);
    }
}

/// 对通过可注入变体登记的实例和提供者执行成员注入
fn inject_pending_members(container: &Container) -> InjectionResult<()> {
    for binding in container.registry().iter() {
        let result = match &binding.source {
            Source::InjectedInstance(deferred) => {
                deferred.force(binding.key(), container).map(drop)
            }
            Source::InjectedProvider(deferred) => {
                deferred.force(binding.key(), container).map(drop)
            }
            _ => continue,
        };
        result.map_err(|source| ConfigurationError::MemberInjection {
            type_name: binding.key().to_string(),
            source: Box::new(source),
        })?;
    }
    Ok(())
}

/// 生产阶段创建全部单例，否则只创建显式声明的预先创建单例
fn create_eager_singletons(container: &Container) -> InjectionResult<()> {
    let eager_all = container.config().eager_singletons();
    for binding in container
        .registry()
        .iter()
        .filter(|binding| binding.scope().is_singleton() && (eager_all || binding.is_eager()))
    {
        debug!("预先创建单例: {}", binding.key());
        container
            .resolve_binding(binding)
            .map_err(|source| ConfigurationError::EagerSingleton {
                key: binding.key().to_string(),
                source: Box::new(source),
            })?;
    }
    Ok(())
}
