//! 引导配置
//!
//! 从 TOML 或 JSON 文件读取容器与日志配置，再用 `LORN_INJECT_*` 环境变量覆盖。

use crate::logging::LoggingConfig;
use anyhow::{bail, Context};
use di_abstractions::ContainerConfig;
use infrastructure_common::{InfrastructureError, InfrastructureResult, Stage};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "LORN_INJECT_";

/// 引导配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapSettings {
    pub container: ContainerConfig,
    pub logging: LoggingConfig,
}

impl BootstrapSettings {
    /// 从配置文件加载，按扩展名选择格式
    pub fn from_file(path: impl AsRef<Path>) -> InfrastructureResult<Self> {
        let path = path.as_ref();
        let settings = read_settings(path).map_err(|e| InfrastructureError::ConfigLoad {
            message: format!("{:#}", e),
        })?;
        info!("加载引导配置: {}", path.display());
        Ok(settings)
    }

    /// 用进程环境变量覆盖配置
    pub fn apply_env(&mut self) -> InfrastructureResult<()> {
        self.apply_overrides(std::env::vars())
    }

    /// 用给定的变量覆盖配置，忽略不带前缀的变量
    pub fn apply_overrides<I, K, V>(&mut self, vars: I) -> InfrastructureResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in vars {
            let Some(setting) = name.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref();
            match setting {
                "STAGE" => {
                    self.container.stage = value
                        .parse::<Stage>()
                        .map_err(|message| InfrastructureError::ConfigLoad { message })?;
                }
                "EAGER_SINGLETONS" => {
                    self.container.eager_singletons = Some(parse_flag(name.as_ref(), value)?);
                }
                "JIT_BINDINGS" => {
                    self.container.jit_bindings = parse_flag(name.as_ref(), value)?;
                }
                "LOG_LEVEL" => self.logging.level = value.to_string(),
                _ => {
                    debug!("忽略未知的环境变量: {}", name.as_ref());
                    continue;
                }
            }
            debug!("环境变量覆盖配置: {}={}", name.as_ref(), value);
        }
        Ok(())
    }
}

fn read_settings(path: &Path) -> anyhow::Result<BootstrapSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取配置文件 {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or_default();
    let settings: BootstrapSettings = match extension {
        "toml" => toml::from_str(&content)
            .with_context(|| format!("TOML 配置解析失败 {}", path.display()))?,
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("JSON 配置解析失败 {}", path.display()))?,
        other => bail!("不支持的配置文件格式 '{}': {}", other, path.display()),
    };
    Ok(settings)
}

fn parse_flag(name: &str, value: &str) -> InfrastructureResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(InfrastructureError::ConfigLoad {
            message: format!("{} 不是有效的布尔值: {}", name, other),
        }),
    }
}
