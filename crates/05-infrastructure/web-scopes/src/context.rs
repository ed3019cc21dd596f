//! 请求上下文
//!
//! 当前请求绑定在处理它的线程上，只在 [`RequestScopeFilter::filter`] 的调用期间可见。

use crate::http::{HttpRequest, HttpResponse};
use std::cell::RefCell;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
struct RequestContext {
    request: Arc<HttpRequest>,
    response: Arc<HttpResponse>,
}

thread_local! {
    static CURRENT: RefCell<Option<RequestContext>> = const { RefCell::new(None) };
}

/// 离开作用域时恢复外层请求，处理链 panic 时同样生效
struct ContextGuard {
    previous: Option<RequestContext>,
}

impl ContextGuard {
    fn enter(context: RequestContext) -> Self {
        let previous = CURRENT.with(|current| current.replace(Some(context)));
        Self { previous }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|current| *current.borrow_mut() = previous);
    }
}

/// 请求作用域过滤器
///
/// 在处理链执行期间把请求和响应绑定到当前线程，请求作用域和会话作用域依赖它。
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestScopeFilter;

impl RequestScopeFilter {
    pub fn new() -> Self {
        Self
    }

    /// 在请求上下文中执行处理链
    pub fn filter<R>(
        &self,
        request: Arc<HttpRequest>,
        response: Arc<HttpResponse>,
        chain: impl FnOnce() -> R,
    ) -> R {
        debug!("进入请求作用域: {} {}", request.method(), request.path());
        let _guard = ContextGuard::enter(RequestContext { request, response });
        chain()
    }
}

/// 当前线程正在处理的请求
pub fn current_request() -> Option<Arc<HttpRequest>> {
    CURRENT.with(|current| {
        current
            .borrow()
            .as_ref()
            .map(|context| Arc::clone(&context.request))
    })
}

/// 当前线程正在处理的响应
pub fn current_response() -> Option<Arc<HttpResponse>> {
    CURRENT.with(|current| {
        current
            .borrow()
            .as_ref()
            .map(|context| Arc::clone(&context.response))
    })
}

/// 当前线程是否处于请求作用域内
pub fn in_request() -> bool {
    CURRENT.with(|current| current.borrow().is_some())
}
