//! 容器启动器
//!
//! 负责协调启动顺序：加载配置 → 初始化日志 → 安装模块并构建容器

use crate::config::BootstrapSettings;
use crate::logging::{init_logging, LoggingConfig};
use di_abstractions::Module;
use di_impl::{Container, ContainerBuilder};
use infrastructure_common::InfrastructureResult;
use std::path::Path;
use tracing::{info, warn};

/// 容器启动器
///
/// 使用建造者模式组合配置、日志和模块
pub struct Bootstrapper {
    settings: BootstrapSettings,
    /// 是否启用日志初始化
    logging_enabled: bool,
    modules: Vec<Box<dyn Module>>,
}

impl Bootstrapper {
    pub fn new() -> Self {
        Self {
            settings: BootstrapSettings::default(),
            logging_enabled: false,
            modules: Vec::new(),
        }
    }

    /// 使用给定的引导配置
    pub fn with_settings(mut self, settings: BootstrapSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 从配置文件加载引导配置
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> InfrastructureResult<Self> {
        self.settings = BootstrapSettings::from_file(path)?;
        Ok(self)
    }

    /// 用 `LORN_INJECT_*` 环境变量覆盖当前配置
    pub fn with_env_overrides(mut self) -> InfrastructureResult<Self> {
        self.settings.apply_env()?;
        Ok(self)
    }

    /// 启用日志初始化
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.settings.logging = config;
        self.logging_enabled = true;
        self
    }

    /// 使用配置中的日志设置初始化日志
    pub fn enable_logging(mut self) -> Self {
        self.logging_enabled = true;
        self
    }

    /// 安装模块
    pub fn install(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn settings(&self) -> &BootstrapSettings {
        &self.settings
    }

    /// 构建容器
    pub fn build(self) -> InfrastructureResult<Container> {
        // 只有在明确启用时才初始化日志，避免测试中重复初始化
        if self.logging_enabled {
            if let Err(e) = init_logging(&self.settings.logging) {
                warn!("{}", e);
            }
        }

        info!(
            "开始构建容器: 阶段 {:?}, {} 个模块",
            self.settings.container.stage,
            self.modules.len()
        );
        let container = self
            .modules
            .iter()
            .fold(
                ContainerBuilder::new().with_config(self.settings.container.clone()),
                |builder, module| builder.install_ref(module.as_ref()),
            )
            .build()?;
        info!("容器启动完成");
        Ok(container)
    }
}

impl Default for Bootstrapper {
    fn default() -> Self {
        Self::new()
    }
}
