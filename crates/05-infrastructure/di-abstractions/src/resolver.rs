//! 依赖解析抽象接口
//!
//! 提供按依赖解析实例、对既有实例执行成员注入的能力

use crate::injection::{Dependency, Injectable, TypeDescriptor};
use infrastructure_common::{InjectionResult, Instance, Key, Qualifier};
use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

/// 成员注入器
///
/// 对一个已经构造好的实例执行字段、方法注入，不尝试构造。
pub trait MemberInjector {
    fn inject_raw(
        &self,
        descriptor: &TypeDescriptor,
        target: &mut (dyn Any + Send + Sync),
    ) -> InjectionResult<()>;
}

/// 注入器 trait
///
/// 由容器实现，提供解析和成员注入的核心接口
pub trait Injector: MemberInjector + Send + Sync {
    /// 解析一个依赖：优先使用显式绑定，其次即时构造
    fn resolve(&self, dependency: &Dependency) -> InjectionResult<Instance>;

    /// 依赖是否可解析（显式绑定或可即时构造）
    fn can_resolve(&self, dependency: &Dependency) -> bool;

    /// 是否存在显式绑定
    fn has_binding(&self, key: &Key) -> bool;
}

/// [`Injector`] 的类型化扩展
pub trait InjectorExt: Injector {
    /// 获取实例，未绑定时通过构造函数注入点即时构造并注入成员
    fn get_instance<T: Injectable>(&self) -> InjectionResult<Arc<T>> {
        self.resolve(&Dependency::injectable::<T>())?.downcast::<T>()
    }

    /// 获取只能通过显式绑定得到的实例（例如 trait 对象）
    fn get<T: ?Sized + Send + Sync + 'static>(&self) -> InjectionResult<Arc<T>> {
        self.resolve(&Dependency::of::<T>())?.downcast::<T>()
    }

    /// 获取名称限定的实例
    fn get_named<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: impl Into<String>,
    ) -> InjectionResult<Arc<T>> {
        let dependency = Dependency::of::<T>().qualified(Qualifier::named(name));
        self.resolve(&dependency)?.downcast::<T>()
    }

    /// 按键获取实例
    fn get_instance_for<T: ?Sized + Send + Sync + 'static>(
        &self,
        key: Key,
    ) -> InjectionResult<Arc<T>> {
        self.resolve(&Dependency::from_key(key))?.downcast::<T>()
    }

    /// 对容器之外创建的实例执行成员注入（先字段，后方法）
    fn inject_members<T: Injectable>(&self, instance: &mut T) -> InjectionResult<()> {
        self.inject_raw(&TypeDescriptor::of::<T>(), instance)
    }

    /// 获取可即时构造类型的延迟解析句柄
    fn get_provider<T: Injectable>(&self) -> ProviderHandle<'_, Self, T> {
        self.provider_for(Dependency::injectable::<T>())
    }

    /// 获取延迟解析句柄，每次 `get` 都重新解析
    fn provider_for<T: ?Sized + Send + Sync + 'static>(
        &self,
        dependency: Dependency,
    ) -> ProviderHandle<'_, Self, T> {
        ProviderHandle {
            injector: self,
            dependency,
            _marker: PhantomData,
        }
    }
}

impl<I: Injector + ?Sized> InjectorExt for I {}

/// 延迟解析句柄
pub struct ProviderHandle<'i, I: ?Sized, T: ?Sized> {
    injector: &'i I,
    dependency: Dependency,
    _marker: PhantomData<fn() -> Box<T>>,
}

impl<'i, I, T> ProviderHandle<'i, I, T>
where
    I: Injector + ?Sized,
    T: ?Sized + Send + Sync + 'static,
{
    pub fn get(&self) -> InjectionResult<Arc<T>> {
        self.injector.resolve(&self.dependency)?.downcast::<T>()
    }

    pub fn key(&self) -> &Key {
        self.dependency.key()
    }
}
