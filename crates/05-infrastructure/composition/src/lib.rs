//! # 基础设施组合层
//!
//! 负责把配置加载、日志初始化和注入容器构建组合成一个启动流程。
//!
//! ## 主要功能
//!
//! - **引导配置**: 从 TOML / JSON 文件和 `LORN_INJECT_*` 环境变量加载容器配置
//! - **日志初始化**: 基于 `tracing-subscriber` 的日志配置
//! - **容器启动器**: 安装模块并构建容器
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::Bootstrapper;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let container = Bootstrapper::new()
//!         .with_config_file("inject.toml")?
//!         .with_env_overrides()?
//!         .enable_logging()
//!         .build()?;
//!     println!("{:?}", container.stats());
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod config;
pub mod logging;

pub use bootstrapper::Bootstrapper;
pub use config::{BootstrapSettings, ENV_PREFIX};
pub use logging::{init_logging, LoggingConfig};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
