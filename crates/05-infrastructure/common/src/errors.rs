//! 错误类型定义

use thiserror::Error;

/// 注入配置错误
///
/// 容器构建、依赖解析和成员注入过程中唯一的错误类型。
/// 所有变体都携带可读的错误信息，错误总是同步地返回给触发解析的调用方。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// 构造函数注入点被标记为可选
    #[error("optional injection is not allowed on constructors: {type_name}")]
    OptionalConstructor { type_name: String },

    /// 一个类型声明了多个构造函数注入点
    #[error("{type_name} declares {count} injectable constructors, at most one is allowed")]
    MultipleConstructors { type_name: String, count: usize },

    /// 必需注入点的依赖既没有绑定也无法即时构造
    #[error("no binding for {key}, required by {required_by}")]
    MissingBinding { key: String, required_by: String },

    /// 没有绑定，类型也没有可用的构造函数
    #[error("no binding for {key} and {type_name} cannot be constructed implicitly")]
    NoConstructor { key: String, type_name: String },

    /// 实例类型与期望不符
    #[error("expected an instance of {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// 注入点取出的参数多于解析得到的参数
    #[error("{member} expects at least {expected} arguments")]
    MissingArgument { member: String, expected: usize },

    /// 在作用域上下文之外访问上下文作用域的绑定
    #[error("cannot access {key} outside of a {scope} scope")]
    OutOfScope { key: String, scope: String },

    /// 提供者报告失败
    #[error("provider for {key} failed: {message}")]
    ProviderFailed { key: String, message: String },

    /// 绑定在容器构建时初始化失败，之后不可再用
    #[error("binding for {key} is unavailable: {message}")]
    BindingUnavailable { key: String, message: String },

    /// 构建时对预置实例或提供者执行成员注入失败
    #[error("member injection of {type_name} failed: {source}")]
    MemberInjection {
        type_name: String,
        #[source]
        source: Box<ConfigurationError>,
    },

    /// 静态注入失败
    #[error("static injection of {type_name} failed: {source}")]
    StaticInjection {
        type_name: String,
        #[source]
        source: Box<ConfigurationError>,
    },

    /// 预先创建单例失败
    #[error("eager singleton {key} could not be created: {source}")]
    EagerSingleton {
        key: String,
        #[source]
        source: Box<ConfigurationError>,
    },
}

impl ConfigurationError {
    /// 创建缺失绑定错误
    pub fn missing_binding(key: impl ToString, required_by: impl Into<String>) -> Self {
        Self::MissingBinding {
            key: key.to_string(),
            required_by: required_by.into(),
        }
    }

    /// 创建作用域外访问错误
    pub fn out_of_scope(key: impl ToString, scope: impl Into<String>) -> Self {
        Self::OutOfScope {
            key: key.to_string(),
            scope: scope.into(),
        }
    }

    /// 创建提供者失败错误
    pub fn provider_failed(key: impl ToString, message: impl Into<String>) -> Self {
        Self::ProviderFailed {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// 可读的错误信息
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// 基础设施错误类型
///
/// 组合层（配置加载、日志初始化、容器引导）使用
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("注入配置错误: {source}")]
    Configuration {
        #[from]
        source: ConfigurationError,
    },

    #[error("配置加载失败: {message}")]
    ConfigLoad { message: String },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type InjectionResult<T> = Result<T, ConfigurationError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
