//! # 依赖注入具体实现
//!
//! 提供绑定注册表、注入点目录、作用域管理和注入容器的具体实现。
//!
//! ```ignore
//! let container = ContainerBuilder::new()
//!     .install(AppModule)
//!     .request_static_injection::<Settings>()
//!     .build()?;
//! let service = container.get_instance::<Service>()?;
//! ```

pub mod builder;
pub mod catalog;
pub mod injector;
pub mod registry;
pub mod scope;
pub mod static_injection;

pub use builder::ContainerBuilder;
pub use catalog::{InjectionPointCatalog, TypeCatalog};
pub use injector::Container;
pub use registry::{Binding, BindingRegistry};
pub use scope::ScopeManager;
pub use static_injection::StaticInjectionRunner;
