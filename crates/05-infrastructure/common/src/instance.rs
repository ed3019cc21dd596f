//! 类型擦除的实例

use crate::errors::{ConfigurationError, InjectionResult};
use crate::metadata::TypeInfo;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 类型擦除的共享实例
///
/// 内部保存的是 `Arc<T>`，因此 `T` 可以是 trait 对象（`dyn Service`）。
/// 向下转换得到的 `Arc<T>` 与放入时的 `Arc<T>` 指向同一个对象。
#[derive(Clone)]
pub struct Instance {
    value: Arc<dyn Any + Send + Sync>,
    type_info: TypeInfo,
}

impl Instance {
    /// 包装一个共享实例
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            value: Arc::new(value),
            type_info: TypeInfo::of::<T>(),
        }
    }

    /// 实例的类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 检查实例是否为指定类型
    pub fn is<T: ?Sized + Send + Sync + 'static>(&self) -> bool {
        self.value.is::<Arc<T>>()
    }

    /// 向下转换为具体类型
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> InjectionResult<Arc<T>> {
        self.value
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or_else(|| ConfigurationError::TypeMismatch {
                expected: TypeInfo::of::<T>().to_string(),
                actual: self.type_info.to_string(),
            })
    }

    /// 是否为同一次包装得到的实例（克隆之间相等）
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_info.name)
            .finish()
    }
}
