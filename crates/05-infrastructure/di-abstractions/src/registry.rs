//! 绑定声明抽象接口
//!
//! 模块通过 [`Binder`] 声明 (键, 提供者, 作用域) 三元组和静态注入目标，
//! 容器构建器收集这些声明后冻结为绑定注册表。

use crate::factory::{
    provide_through, FnProvider, Provider, ProviderGetFn, RawProvider, TypedProvider,
};
use crate::injection::{Dependency, Injectable, TypeDescriptor};
use crate::resolver::MemberInjector;
use crate::scope::Scope;
use infrastructure_common::{InjectionResult, Instance, Key, Qualifier};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 构建时完成成员注入的实例
pub type PendingInstance =
    Box<dyn FnOnce(&dyn MemberInjector) -> InjectionResult<Instance> + Send>;

/// 构建时完成成员注入的提供者
pub type PendingProvider =
    Box<dyn FnOnce(&dyn MemberInjector) -> InjectionResult<Arc<dyn RawProvider>> + Send>;

/// 绑定的实例来源
pub enum BindingSource {
    /// 预先创建的实例
    Instance(Instance),
    /// 预先创建、容器构建时注入成员的实例
    InjectedInstance(PendingInstance),
    /// 提供者实例
    Provider(Arc<dyn RawProvider>),
    /// 容器构建时注入成员的提供者实例
    InjectedProvider(PendingProvider),
    /// 提供者类型，每次提供时通过容器解析提供者本身
    ProviderType {
        provider: Dependency,
        get: ProviderGetFn,
    },
    /// 通过目标类型自身的构造函数注入点创建
    Constructor(TypeDescriptor),
}

impl fmt::Debug for BindingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingSource::Instance(instance) => f.debug_tuple("Instance").field(instance).finish(),
            BindingSource::InjectedInstance(_) => f.write_str("InjectedInstance"),
            BindingSource::Provider(_) => f.write_str("Provider"),
            BindingSource::InjectedProvider(_) => f.write_str("InjectedProvider"),
            BindingSource::ProviderType { provider, .. } => f
                .debug_struct("ProviderType")
                .field("provider", provider.key())
                .finish(),
            BindingSource::Constructor(descriptor) => {
                f.debug_tuple("Constructor").field(descriptor).finish()
            }
        }
    }
}

/// 一条绑定声明
#[derive(Debug)]
pub struct BindingDefinition {
    pub key: Key,
    pub source: BindingSource,
    pub scope: Scope,
    /// 是否在容器构建时立即创建（仅对单例有意义）
    pub eager: bool,
}

/// 绑定声明接收者
pub trait Binder {
    /// 登记一条绑定，相同键后登记者覆盖先登记者
    fn register(&mut self, definition: BindingDefinition);

    /// 登记一个静态注入目标
    fn request_static_injection_for(&mut self, target: TypeDescriptor);

    /// 安装另一个模块
    fn install(&mut self, module: &dyn Module);
}

/// 绑定模块
///
/// 模块按安装顺序执行，把绑定声明写入 [`Binder`]。
pub trait Module: Send + Sync {
    fn configure(&self, binder: &mut dyn Binder);
}

impl<F> Module for F
where
    F: Fn(&mut dyn Binder) + Send + Sync,
{
    fn configure(&self, binder: &mut dyn Binder) {
        self(binder)
    }
}

/// [`Binder`] 的类型化扩展
pub trait BinderExt: Binder {
    /// 开始声明类型 `T` 的绑定
    fn bind<T: ?Sized + Send + Sync + 'static>(&mut self) -> BindingBuilder<'_, Self, T> {
        BindingBuilder::new(self, Key::of::<T>())
    }

    /// 按键声明绑定，键的类型部分以 `T` 为准，只取其限定符
    fn bind_key<T: ?Sized + Send + Sync + 'static>(
        &mut self,
        key: &Key,
    ) -> BindingBuilder<'_, Self, T> {
        let typed = match key.qualifier() {
            Some(qualifier) => Key::of::<T>().with_qualifier(qualifier.clone()),
            None => Key::of::<T>(),
        };
        BindingBuilder::new(self, typed)
    }

    /// 请求对 `T` 的静态成员执行一次静态注入
    fn request_static_injection<T: Injectable>(&mut self) {
        self.request_static_injection_for(TypeDescriptor::of::<T>());
    }
}

impl<B: Binder + ?Sized> BinderExt for B {}

/// 类型化绑定构建器
///
/// 先设置限定符和作用域，再用 `to_*` 方法指定来源并完成登记。
pub struct BindingBuilder<'b, B: Binder + ?Sized, T: ?Sized> {
    binder: &'b mut B,
    key: Key,
    scope: Scope,
    eager: bool,
    _marker: PhantomData<fn() -> Box<T>>,
}

impl<'b, B, T> BindingBuilder<'b, B, T>
where
    B: Binder + ?Sized,
    T: ?Sized + Send + Sync + 'static,
{
    fn new(binder: &'b mut B, key: Key) -> Self {
        Self {
            binder,
            key,
            scope: Scope::Unscoped,
            eager: false,
            _marker: PhantomData,
        }
    }

    /// 名称限定
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.key = self.key.with_qualifier(Qualifier::named(name));
        self
    }

    /// 注解限定
    pub fn annotated_with<A: ?Sized + 'static>(mut self) -> Self {
        self.key = self.key.with_qualifier(Qualifier::annotation::<A>());
        self
    }

    /// 设置作用域
    pub fn in_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// 单例作用域
    pub fn singleton(self) -> Self {
        self.in_scope(Scope::Singleton)
    }

    /// 单例作用域，并在容器构建时立即创建
    pub fn as_eager_singleton(mut self) -> Self {
        self.scope = Scope::Singleton;
        self.eager = true;
        self
    }

    /// 绑定到已有实例
    ///
    /// 实例原样提供，容器不会对它执行成员注入。需要注入成员的可注入类型请使用
    /// [`BindingBuilder::to_injectable_instance`]。
    pub fn to_instance(self, instance: Arc<T>) {
        self.finish(BindingSource::Instance(Instance::new(instance)));
    }

    /// 绑定到提供者实例
    pub fn to_provider<P: Provider<T>>(self, provider: P) {
        let provider: Arc<dyn RawProvider> =
            Arc::new(TypedProvider::<T, P>::new(Arc::new(provider)));
        self.finish(BindingSource::Provider(provider));
    }

    /// 绑定到闭包提供者
    pub fn to_provider_fn<F>(self, factory_fn: F)
    where
        F: Fn() -> InjectionResult<Arc<T>> + Send + Sync + 'static,
    {
        self.to_provider(FnProvider::new(factory_fn));
    }

    /// 绑定到提供者实例，容器构建时先注入提供者自身的成员
    pub fn to_injectable_provider<P: Provider<T> + Injectable>(self, provider: P) {
        let pending: PendingProvider = Box::new(move |injector: &dyn MemberInjector| {
            let mut provider = provider;
            injector.inject_raw(&TypeDescriptor::of::<P>(), &mut provider)?;
            Ok(Arc::new(TypedProvider::<T, P>::new(Arc::new(provider))) as Arc<dyn RawProvider>)
        });
        self.finish(BindingSource::InjectedProvider(pending));
    }

    /// 绑定到提供者类型，提供者本身由容器解析（绑定或即时构造）
    pub fn to_provider_type<P: Provider<T> + Injectable>(self) {
        self.finish(BindingSource::ProviderType {
            provider: Dependency::injectable::<P>(),
            get: provide_through::<T, P>,
        });
    }

    fn finish(self, source: BindingSource) {
        self.binder.register(BindingDefinition {
            key: self.key,
            source,
            scope: self.scope,
            eager: self.eager,
        });
    }
}

impl<'b, B, T> BindingBuilder<'b, B, T>
where
    B: Binder + ?Sized,
    T: Injectable,
{
    /// 绑定到已有实例，容器构建时注入其成员
    pub fn to_injectable_instance(self, instance: T) {
        let pending: PendingInstance = Box::new(move |injector: &dyn MemberInjector| {
            let mut instance = instance;
            injector.inject_raw(&TypeDescriptor::of::<T>(), &mut instance)?;
            Ok(Instance::new(Arc::new(instance)))
        });
        self.finish(BindingSource::InjectedInstance(pending));
    }

    /// 绑定到类型自身的构造函数（常与作用域配合使用）
    pub fn to_constructor(self) {
        self.finish(BindingSource::Constructor(TypeDescriptor::of::<T>()));
    }
}
