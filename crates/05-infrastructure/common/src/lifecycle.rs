//! 实例生命周期与容器阶段

use serde::{Deserialize, Serialize};
use std::fmt;

/// 实例生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
    /// 无作用域 - 每次解析都创建新实例
    #[default]
    Unscoped,
    /// 单例模式 - 每个容器内只创建一个实例
    Singleton,
    /// 上下文模式 - 实例由外部上下文（请求、会话）提供
    Contextual,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifetime::Unscoped => "unscoped",
            Lifetime::Singleton => "singleton",
            Lifetime::Contextual => "contextual",
        };
        f.write_str(name)
    }
}

/// 容器运行阶段
///
/// 生产阶段在容器构建时预先创建所有单例，开发阶段按需创建。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Development,
    Production,
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Stage::Development),
            "production" | "prod" => Ok(Stage::Production),
            other => Err(format!("未知的容器阶段: {}", other)),
        }
    }
}
