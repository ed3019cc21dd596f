//! 容器配置与统计

use infrastructure_common::Stage;
use serde::{Deserialize, Serialize};

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 运行阶段，生产阶段默认预先创建单例
    pub stage: Stage,
    /// 覆盖阶段默认行为：`Some(true)` 预先创建全部单例，`Some(false)` 只创建显式声明的
    pub eager_singletons: Option<bool>,
    /// 是否允许即时构造未绑定的可注入类型
    pub jit_bindings: bool,
}

impl ContainerConfig {
    /// 单例是否需要在构建时创建
    pub fn eager_singletons(&self) -> bool {
        self.eager_singletons
            .unwrap_or(self.stage == Stage::Production)
    }

    /// 生产阶段配置
    pub fn production() -> Self {
        Self {
            stage: Stage::Production,
            ..Self::default()
        }
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            stage: Stage::Development,
            eager_singletons: None,
            jit_bindings: true,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 显式绑定数量
    pub registered_bindings: usize,
    /// 单例绑定数量
    pub singleton_bindings: usize,
    /// 已创建的单例数量
    pub instantiated_singletons: usize,
    /// 静态注入目标数量
    pub static_targets: usize,
    /// 已缓存的注入点目录数量
    pub cached_catalogs: usize,
}
