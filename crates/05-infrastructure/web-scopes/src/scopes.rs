//! 请求作用域与会话作用域
//!
//! 实例缓存在当前请求（或其会话）的属性表中，核心容器不持有任何状态。

use crate::context::current_request;
use di_abstractions::{ContextAccessor, Scope};
use infrastructure_common::{ConfigurationError, InjectionResult, Instance, Key};
use once_cell::sync::Lazy;
use tracing::trace;

/// 请求作用域名称
pub const REQUEST: &str = "request";
/// 会话作用域名称
pub const SESSION: &str = "session";

static REQUEST_SCOPE: Lazy<Scope> = Lazy::new(|| Scope::contextual(RequestScope));
static SESSION_SCOPE: Lazy<Scope> = Lazy::new(|| Scope::contextual(SessionScope));

/// 每个请求一个实例
pub fn request_scope() -> Scope {
    REQUEST_SCOPE.clone()
}

/// 每个会话一个实例
pub fn session_scope() -> Scope {
    SESSION_SCOPE.clone()
}

/// 请求作用域访问器
#[derive(Debug, Default)]
pub struct RequestScope;

impl ContextAccessor for RequestScope {
    fn scope_name(&self) -> &str {
        REQUEST
    }

    fn get(
        &self,
        key: &Key,
        unscoped: &dyn Fn() -> InjectionResult<Instance>,
    ) -> InjectionResult<Instance> {
        let request =
            current_request().ok_or_else(|| ConfigurationError::out_of_scope(key, REQUEST))?;
        if let Some(instance) = request.attribute(key) {
            return Ok(instance);
        }
        // 创建期间不持有属性表的锁，并发创建时保留先写入者
        let created = unscoped()?;
        trace!("请求作用域创建实例: {}", key);
        Ok(request.attribute_or_insert(key.clone(), created))
    }
}

/// 会话作用域访问器
#[derive(Debug, Default)]
pub struct SessionScope;

impl ContextAccessor for SessionScope {
    fn scope_name(&self) -> &str {
        SESSION
    }

    fn get(
        &self,
        key: &Key,
        unscoped: &dyn Fn() -> InjectionResult<Instance>,
    ) -> InjectionResult<Instance> {
        let session = current_request()
            .map(|request| request.session())
            .ok_or_else(|| ConfigurationError::out_of_scope(key, SESSION))?;
        if let Some(instance) = session.attribute(key) {
            return Ok(instance);
        }
        let created = unscoped()?;
        trace!("会话作用域创建实例: {}", key);
        Ok(session.attribute_or_insert(key.clone(), created))
    }
}
