//! HTTP 请求、响应与会话
//!
//! 只保留作用域需要的部分：请求参数、会话和属性表。

use chrono::{DateTime, Utc};
use infrastructure_common::{Instance, Key};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// 请求参数表，同名参数可以出现多次
pub type ParameterMap = HashMap<String, Vec<String>>;

/// 请求参数表的限定注解
pub struct RequestParameters;

/// 按键存放作用域实例的属性表
#[derive(Debug, Default)]
struct Attributes {
    values: Mutex<HashMap<Key, Instance>>,
}

impl Attributes {
    fn get(&self, key: &Key) -> Option<Instance> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: Key, instance: Instance) {
        self.values.lock().insert(key, instance);
    }

    fn get_or_insert(&self, key: Key, instance: Instance) -> Instance {
        self.values.lock().entry(key).or_insert(instance).clone()
    }

    fn len(&self) -> usize {
        self.values.lock().len()
    }
}

/// HTTP 会话
#[derive(Debug)]
pub struct HttpSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    attributes: Attributes,
}

impl HttpSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            attributes: Attributes::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn attribute(&self, key: &Key) -> Option<Instance> {
        self.attributes.get(key)
    }

    pub fn set_attribute(&self, key: Key, instance: Instance) {
        self.attributes.set(key, instance);
    }

    /// 属性不存在时写入，返回最终保存的实例
    pub fn attribute_or_insert(&self, key: Key, instance: Instance) -> Instance {
        self.attributes.get_or_insert(key, instance)
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

impl Default for HttpSession {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP 请求
#[derive(Debug)]
pub struct HttpRequest {
    method: String,
    path: String,
    parameters: Arc<ParameterMap>,
    session: Mutex<Option<Arc<HttpSession>>>,
    attributes: Attributes,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            parameters: Arc::new(ParameterMap::new()),
            session: Mutex::new(None),
            attributes: Attributes::default(),
        }
    }

    /// 追加一个请求参数
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.parameters)
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// 关联到已有会话
    pub fn with_session(self, session: Arc<HttpSession>) -> Self {
        *self.session.lock() = Some(session);
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 全部请求参数
    pub fn parameters(&self) -> Arc<ParameterMap> {
        Arc::clone(&self.parameters)
    }

    /// 参数的第一个值
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// 当前会话，不存在时创建
    pub fn session(&self) -> Arc<HttpSession> {
        let mut slot = self.session.lock();
        let session = slot.get_or_insert_with(|| {
            let created = Arc::new(HttpSession::new());
            debug!("创建会话: {}", created.id());
            created
        });
        Arc::clone(session)
    }

    /// 当前会话，不创建
    pub fn existing_session(&self) -> Option<Arc<HttpSession>> {
        self.session.lock().clone()
    }

    pub fn attribute(&self, key: &Key) -> Option<Instance> {
        self.attributes.get(key)
    }

    pub fn set_attribute(&self, key: Key, instance: Instance) {
        self.attributes.set(key, instance);
    }

    /// 属性不存在时写入，返回最终保存的实例
    pub fn attribute_or_insert(&self, key: Key, instance: Instance) -> Instance {
        self.attributes.get_or_insert(key, instance)
    }
}

/// HTTP 响应
#[derive(Debug)]
pub struct HttpResponse {
    status: AtomicU16,
    headers: Mutex<Vec<(String, String)>>,
}

impl HttpResponse {
    pub fn new() -> Self {
        Self {
            status: AtomicU16::new(200),
            headers: Mutex::new(Vec::new()),
        }
    }

    pub fn status(&self) -> u16 {
        self.status.load(Ordering::Relaxed)
    }

    pub fn set_status(&self, status: u16) {
        self.status.store(status, Ordering::Relaxed);
    }

    /// 追加响应头
    pub fn add_header(&self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.lock().push((name.into(), value.into()));
    }

    /// 第一个同名响应头（大小写不敏感）
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .lock()
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}
