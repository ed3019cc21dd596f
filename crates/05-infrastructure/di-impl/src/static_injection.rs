//! 静态注入
//!
//! 容器构建时对每个静态注入目标执行一次静态成员注入，没有目标实例。

use crate::injector::Container;
use di_abstractions::{Arguments, TypeDescriptor};
use infrastructure_common::{ConfigurationError, InjectionResult};
use tracing::{debug, info};

/// 静态注入执行器
pub struct StaticInjectionRunner<'c> {
    container: &'c Container,
}

impl<'c> StaticInjectionRunner<'c> {
    pub fn new(container: &'c Container) -> Self {
        Self { container }
    }

    /// 对容器登记的全部静态注入目标执行注入
    pub fn run(&self) -> InjectionResult<()> {
        let targets = self.container.static_targets();
        for target in targets {
            self.inject(target)
                .map_err(|source| ConfigurationError::StaticInjection {
                    type_name: target.type_info().to_string(),
                    source: Box::new(source),
                })?;
        }
        if !targets.is_empty() {
            info!("静态注入完成: {} 个目标", targets.len());
        }
        Ok(())
    }

    fn inject(&self, target: &TypeDescriptor) -> InjectionResult<()> {
        let catalog = self.container.catalog().points_for(target)?;
        let type_name = catalog.type_info.short_name();
        for point in &catalog.static_points {
            let member = format!("{}.{}", type_name, point.name);
            let Some(arguments) =
                self.container
                    .arguments_for(&member, &point.dependencies, point.optional)?
            else {
                continue;
            };
            debug!("静态注入: {}", member);
            (point.invoke)(&mut Arguments::new(member, arguments))?;
        }
        Ok(())
    }
}
