//! 实例提供者抽象
//!
//! 提供者是零参数的实例工厂，绑定通过提供者产出实例。

use infrastructure_common::{InjectionResult, Instance};
use std::marker::PhantomData;
use std::sync::Arc;

/// 实例提供者 trait
pub trait Provider<T: ?Sized>: Send + Sync + 'static {
    /// 产出一个实例
    fn get(&self) -> InjectionResult<Arc<T>>;
}

/// 闭包提供者包装器
pub struct FnProvider<F> {
    factory_fn: F,
}

impl<F> FnProvider<F> {
    pub fn new(factory_fn: F) -> Self {
        Self { factory_fn }
    }
}

impl<T, F> Provider<T> for FnProvider<F>
where
    T: ?Sized,
    F: Fn() -> InjectionResult<Arc<T>> + Send + Sync + 'static,
{
    fn get(&self) -> InjectionResult<Arc<T>> {
        (self.factory_fn)()
    }
}

/// 类型擦除的提供者
pub trait RawProvider: Send + Sync {
    fn provide(&self) -> InjectionResult<Instance>;
}

/// 把类型化提供者适配为类型擦除的提供者
pub struct TypedProvider<T: ?Sized, P> {
    provider: Arc<P>,
    _marker: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized, P> TypedProvider<T, P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            _marker: PhantomData,
        }
    }
}

impl<T, P> RawProvider for TypedProvider<T, P>
where
    T: ?Sized + Send + Sync + 'static,
    P: Provider<T>,
{
    fn provide(&self) -> InjectionResult<Instance> {
        Ok(Instance::new(self.provider.get()?))
    }
}

/// 从已解析的提供者实例产出目标实例
///
/// 用于提供者类型绑定：提供者本身由容器构造，再调用其 `get`。
pub type ProviderGetFn = fn(&Instance) -> InjectionResult<Instance>;

/// 生成 [`ProviderGetFn`]
pub fn provide_through<T, P>(provider: &Instance) -> InjectionResult<Instance>
where
    T: ?Sized + Send + Sync + 'static,
    P: Provider<T>,
{
    let provider = provider.downcast::<P>()?;
    Ok(Instance::new(provider.get()?))
}
