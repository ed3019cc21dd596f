//! # Infrastructure Common
//!
//! 依赖注入引擎各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`Key`] - 绑定键（类型 + 可选限定符）
//! - [`Instance`] - 类型擦除的共享实例
//! - [`ConfigurationError`] - 唯一的注入错误类型
//! - [`Lifetime`] / [`Stage`] - 生命周期与容器阶段

pub mod errors;
pub mod instance;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use instance::*;
pub use lifecycle::*;
pub use metadata::*;
