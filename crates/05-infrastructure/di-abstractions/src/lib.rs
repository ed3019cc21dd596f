//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义绑定声明、注入点描述和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`Injectable`] / [`MemberDescriptor`] - 注入元数据提供者
//! - [`Provider`] - 零参数实例提供者
//! - [`Binder`] / [`Module`] - 绑定声明
//! - [`Scope`] / [`ContextAccessor`] - 作用域
//! - [`Injector`] / [`InjectorExt`] - 依赖解析

pub mod container;
pub mod factory;
pub mod injection;
pub mod registry;
pub mod resolver;
pub mod scope;

pub use container::*;
pub use factory::*;
pub use injection::*;
pub use registry::*;
pub use resolver::*;
pub use scope::*;
