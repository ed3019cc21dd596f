//! 注入容器
//!
//! 解析顺序：显式绑定（经作用域管理器）→ 即时构造 → 配置错误。

use crate::builder::ContainerBuilder;
use crate::catalog::{InjectionPointCatalog, TypeCatalog};
use crate::registry::{Binding, BindingRegistry, Source};
use crate::scope::ScopeManager;
use di_abstractions::{
    Arguments, ContainerConfig, ContainerStats, Dependency, Injector, MemberInjector, Module,
    TypeDescriptor,
};
use infrastructure_common::{ConfigurationError, InjectionResult, Instance, Key};
use std::any::{Any, TypeId};
use std::fmt;
use tracing::{debug, trace};

/// 依赖注入容器
///
/// 构建完成后只读，可以在多个线程间共享（`Arc<Container>`）。
pub struct Container {
    config: ContainerConfig,
    registry: BindingRegistry,
    scopes: ScopeManager,
    catalog: InjectionPointCatalog,
    static_targets: Vec<TypeDescriptor>,
}

impl Container {
    pub(crate) fn new(
        config: ContainerConfig,
        registry: BindingRegistry,
        static_targets: Vec<TypeDescriptor>,
    ) -> Self {
        let scopes = ScopeManager::for_registry(&registry);
        Self {
            config,
            registry,
            scopes,
            catalog: InjectionPointCatalog::new(),
            static_targets,
        }
    }

    /// 用默认配置安装模块并构建容器
    pub fn create(modules: &[&dyn Module]) -> InjectionResult<Self> {
        modules
            .iter()
            .fold(ContainerBuilder::new(), |builder, module| {
                builder.install_ref(*module)
            })
            .build()
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 冻结后的绑定注册表
    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    pub(crate) fn catalog(&self) -> &InjectionPointCatalog {
        &self.catalog
    }

    pub(crate) fn static_targets(&self) -> &[TypeDescriptor] {
        &self.static_targets
    }

    /// 容器统计信息
    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            registered_bindings: self.registry.len(),
            singleton_bindings: self.scopes.singleton_count(),
            instantiated_singletons: self.scopes.instantiated_count(),
            static_targets: self.static_targets.len(),
            cached_catalogs: self.catalog.len(),
        }
    }

    /// 按绑定的作用域取得实例
    pub(crate) fn resolve_binding(&self, binding: &Binding) -> InjectionResult<Instance> {
        self.scopes.resolve(binding, &|| self.provision(binding))
    }

    /// 不经作用域直接创建绑定的实例
    fn provision(&self, binding: &Binding) -> InjectionResult<Instance> {
        match &binding.source {
            Source::Instance(instance) => Ok(instance.clone()),
            Source::Provider(provider) => provider.provide(),
            Source::ProviderType { provider, get } => {
                let provider = self.resolve(provider)?;
                get(&provider)
            }
            Source::Constructor(descriptor) => self.construct(descriptor),
            Source::InjectedInstance(deferred) => deferred.force(binding.key(), self),
            Source::InjectedProvider(deferred) => deferred.force(binding.key(), self)?.provide(),
        }
    }

    /// 允许即时构造时返回依赖的构造描述
    fn just_in_time<'d>(&self, dependency: &'d Dependency) -> Option<&'d TypeDescriptor> {
        if self.config.jit_bindings {
            dependency.just_in_time()
        } else {
            None
        }
    }

    /// 通过构造函数注入点创建实例，再注入实例成员
    fn construct(&self, descriptor: &TypeDescriptor) -> InjectionResult<Instance> {
        let catalog = self.catalog.points_for(descriptor)?;
        let constructor =
            catalog
                .constructor
                .as_ref()
                .ok_or_else(|| ConfigurationError::NoConstructor {
                    key: catalog.type_info.to_string(),
                    type_name: catalog.type_info.to_string(),
                })?;

        let member = format!("{}.<init>", catalog.type_info.short_name());
        let arguments = constructor
            .dependencies
            .iter()
            .map(|dependency| self.resolve_required(dependency, &member))
            .collect::<InjectionResult<Vec<_>>>()?;
        debug!("即时构造: {}", catalog.type_info);

        let mut value = (constructor.construct)(&mut Arguments::new(member, arguments))?;
        self.inject_points(&catalog, value.as_mut())?;
        descriptor.wrap(value)
    }

    /// 解析注入点的必需参数，不可解析时报告缺失绑定
    fn resolve_required(&self, dependency: &Dependency, member: &str) -> InjectionResult<Instance> {
        if self.registry.contains(dependency.key()) || self.just_in_time(dependency).is_some() {
            self.resolve(dependency)
        } else {
            Err(ConfigurationError::missing_binding(dependency.key(), member))
        }
    }

    /// 准备一个注入点的全部参数
    ///
    /// 可选注入点只要有一个依赖不可解析就整体跳过，返回 `None`。
    pub(crate) fn arguments_for(
        &self,
        member: &str,
        dependencies: &[Dependency],
        optional: bool,
    ) -> InjectionResult<Option<Vec<Instance>>> {
        if optional {
            if let Some(missing) = dependencies
                .iter()
                .find(|dependency| !self.can_resolve(dependency))
            {
                debug!("跳过可选注入点 {}: {} 不可用", member, missing.key());
                return Ok(None);
            }
        }
        dependencies
            .iter()
            .map(|dependency| self.resolve_required(dependency, member))
            .collect::<InjectionResult<Vec<_>>>()
            .map(Some)
    }

    /// 依赖是否能完整解析
    ///
    /// 显式绑定直接可用。即时构造的类型要求构造函数参数和必需成员的依赖也都可用，
    /// 递归检查整个即时构造的依赖图。`visiting` 记录当前路径上的类型。
    fn is_available(&self, dependency: &Dependency, visiting: &mut Vec<TypeId>) -> bool {
        if self.registry.contains(dependency.key()) {
            return true;
        }
        let Some(descriptor) = self.just_in_time(dependency) else {
            return false;
        };
        // 目录构建失败也算可解析，让错误在真正解析时报告出来
        let Ok(catalog) = self.catalog.points_for(descriptor) else {
            return true;
        };
        let Some(constructor) = &catalog.constructor else {
            return false;
        };
        let type_id = catalog.type_info.id;
        if visiting.contains(&type_id) {
            return true;
        }

        visiting.push(type_id);
        let available = constructor
            .dependencies
            .iter()
            .chain(
                catalog
                    .instance_points
                    .iter()
                    .filter(|point| !point.optional)
                    .flat_map(|point| point.dependencies.iter()),
            )
            .all(|inner| self.is_available(inner, visiting));
        visiting.pop();
        available
    }

    /// 按目录顺序执行实例成员注入
    fn inject_points(
        &self,
        catalog: &TypeCatalog,
        target: &mut (dyn Any + Send + Sync),
    ) -> InjectionResult<()> {
        let type_name = catalog.type_info.short_name();
        for point in &catalog.instance_points {
            let member = format!("{}.{}", type_name, point.name);
            let Some(arguments) = self.arguments_for(&member, &point.dependencies, point.optional)?
            else {
                continue;
            };
            (point.inject)(target, &mut Arguments::new(member, arguments))?;
        }
        Ok(())
    }
}

impl MemberInjector for Container {
    fn inject_raw(
        &self,
        descriptor: &TypeDescriptor,
        target: &mut (dyn Any + Send + Sync),
    ) -> InjectionResult<()> {
        let catalog = self.catalog.points_for(descriptor)?;
        self.inject_points(&catalog, target)
    }
}

impl Injector for Container {
    fn resolve(&self, dependency: &Dependency) -> InjectionResult<Instance> {
        let key = dependency.key();
        trace!("解析依赖: {}", key);
        if let Some(binding) = self.registry.lookup(key) {
            return self.resolve_binding(binding);
        }
        match self.just_in_time(dependency) {
            Some(descriptor) => self.construct(descriptor),
            None => Err(ConfigurationError::NoConstructor {
                key: key.to_string(),
                type_name: key.type_info().to_string(),
            }),
        }
    }

    fn can_resolve(&self, dependency: &Dependency) -> bool {
        self.is_available(dependency, &mut Vec::new())
    }

    fn has_binding(&self, key: &Key) -> bool {
        self.registry.contains(key)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}
