//! Web 绑定模块

use crate::context::{current_request, current_response};
use crate::http::{HttpRequest, HttpResponse, HttpSession, ParameterMap, RequestParameters};
use crate::scopes::REQUEST;
use di_abstractions::{Binder, BinderExt, Module};
use infrastructure_common::{ConfigurationError, InjectionResult, Key};
use std::sync::Arc;

/// 绑定当前请求、响应、会话和请求参数表
///
/// 每次解析都读取当前线程的请求，在请求作用域之外解析会失败。
#[derive(Debug, Default, Clone, Copy)]
pub struct WebModule;

fn request_for(key: Key) -> InjectionResult<Arc<HttpRequest>> {
    current_request().ok_or_else(|| ConfigurationError::out_of_scope(key, REQUEST))
}

impl Module for WebModule {
    fn configure(&self, binder: &mut dyn Binder) {
        binder
            .bind::<HttpRequest>()
            .to_provider_fn(|| request_for(Key::of::<HttpRequest>()));

        binder.bind::<HttpResponse>().to_provider_fn(|| {
            current_response()
                .ok_or_else(|| ConfigurationError::out_of_scope(Key::of::<HttpResponse>(), REQUEST))
        });

        binder
            .bind::<HttpSession>()
            .to_provider_fn(|| Ok(request_for(Key::of::<HttpSession>())?.session()));

        binder
            .bind::<ParameterMap>()
            .annotated_with::<RequestParameters>()
            .to_provider_fn(|| {
                let key = Key::annotated::<ParameterMap, RequestParameters>();
                Ok(request_for(key)?.parameters())
            });
    }
}
