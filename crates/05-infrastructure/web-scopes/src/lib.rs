//! # Web Scopes
//!
//! 为注入容器提供请求作用域和会话作用域，以及 HTTP 请求相关对象的绑定。
//!
//! ```ignore
//! let container = ContainerBuilder::new()
//!     .install(WebModule)
//!     .install(|binder: &mut dyn Binder| {
//!         binder.bind::<Cart>().in_scope(session_scope()).to_constructor();
//!     })
//!     .build()?;
//!
//! RequestScopeFilter::new().filter(request, response, || handle(&container));
//! ```

pub mod context;
pub mod http;
pub mod module;
pub mod scopes;

pub use context::{current_request, current_response, in_request, RequestScopeFilter};
pub use http::{HttpRequest, HttpResponse, HttpSession, ParameterMap, RequestParameters};
pub use module::WebModule;
pub use scopes::{request_scope, session_scope, RequestScope, SessionScope, REQUEST, SESSION};
