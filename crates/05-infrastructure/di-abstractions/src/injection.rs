//! 注入点描述抽象
//!
//! 注入元数据提供者为每个目标类型给出一张注入成员描述表（构造函数、字段、方法），
//! 容器据此构建注入点目录，无需运行时反射。

use infrastructure_common::{
    ConfigurationError, InjectionResult, Instance, Key, Qualifier, TypeInfo,
};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 成员类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemberKind {
    /// 构造函数，每个类型至多一个
    Constructor,
    /// 字段，先于方法注入
    Field,
    /// 方法
    Method,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemberKind::Constructor => "constructor",
            MemberKind::Field => "field",
            MemberKind::Method => "method",
        };
        f.write_str(name)
    }
}

/// 可注入类型
///
/// 注入元数据提供者：返回该类型全部可注入成员的原始描述。
pub trait Injectable: Send + Sync + Sized + 'static {
    /// 可注入成员描述表，按声明顺序排列
    fn members() -> Vec<MemberDescriptor<Self>>;
}

/// 注入点的一个依赖
///
/// 对未限定且可构造的类型，附带即时（just-in-time）构造所需的类型描述。
#[derive(Debug, Clone)]
pub struct Dependency {
    key: Key,
    just_in_time: Option<TypeDescriptor>,
}

impl Dependency {
    /// 只能通过显式绑定满足的依赖（例如 trait 对象）
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            key: Key::of::<T>(),
            just_in_time: None,
        }
    }

    /// 未绑定时可以通过自身构造函数即时构造的依赖
    pub fn injectable<T: Injectable>() -> Self {
        Self {
            key: Key::of::<T>(),
            just_in_time: Some(TypeDescriptor::of::<T>()),
        }
    }

    /// 使用给定键的依赖
    pub fn from_key(key: Key) -> Self {
        Self {
            key,
            just_in_time: None,
        }
    }

    /// 附加限定符
    pub fn qualified(mut self, qualifier: Qualifier) -> Self {
        self.key = self.key.with_qualifier(qualifier);
        self
    }

    /// 依赖的绑定键
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// 即时构造描述，带限定符的键永远不会即时构造
    pub fn just_in_time(&self) -> Option<&TypeDescriptor> {
        if self.key.is_qualified() {
            None
        } else {
            self.just_in_time.as_ref()
        }
    }
}

/// 注入点收到的已解析参数，按声明顺序依次取出
#[derive(Debug)]
pub struct Arguments {
    member: String,
    values: std::vec::IntoIter<Instance>,
    taken: usize,
}

impl Arguments {
    /// 为注入点 `member` 包装按声明顺序解析好的参数
    pub fn new(member: impl Into<String>, values: Vec<Instance>) -> Self {
        Self {
            member: member.into(),
            values: values.into_iter(),
            taken: 0,
        }
    }

    /// 取出下一个参数
    pub fn next<T: ?Sized + Send + Sync + 'static>(&mut self) -> InjectionResult<Arc<T>> {
        self.taken += 1;
        let value = self
            .values
            .next()
            .ok_or_else(|| ConfigurationError::MissingArgument {
                member: self.member.clone(),
                expected: self.taken,
            })?;
        value.downcast::<T>()
    }
}

type ConstructFn<T> = Arc<dyn Fn(&mut Arguments) -> InjectionResult<T> + Send + Sync>;
type InjectFn<T> = Arc<dyn Fn(&mut T, &mut Arguments) -> InjectionResult<()> + Send + Sync>;
/// 静态成员注入函数
pub type RawStaticFn = Arc<dyn Fn(&mut Arguments) -> InjectionResult<()> + Send + Sync>;

enum Action<T> {
    Construct(ConstructFn<T>),
    Inject(InjectFn<T>),
    Static(RawStaticFn),
}

/// 单个可注入成员的原始描述
///
/// 通过 `constructor` / `field` / `method` / `static_field` / `static_method` 创建，
/// 再用 `param`、`named`、`optional` 等方法补充依赖与可选性。
pub struct MemberDescriptor<T> {
    kind: MemberKind,
    name: String,
    dependencies: Vec<Dependency>,
    optional: bool,
    action: Action<T>,
}

impl<T: Send + Sync + 'static> MemberDescriptor<T> {
    /// 构造函数注入点
    pub fn constructor<F>(construct: F) -> Self
    where
        F: Fn(&mut Arguments) -> InjectionResult<T> + Send + Sync + 'static,
    {
        Self {
            kind: MemberKind::Constructor,
            name: "<init>".to_string(),
            dependencies: Vec::new(),
            optional: false,
            action: Action::Construct(Arc::new(construct)),
        }
    }

    /// 字段注入点，字段类型即依赖键的类型
    pub fn field<D, F>(name: impl Into<String>, assign: F) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
        F: Fn(&mut T, Arc<D>) + Send + Sync + 'static,
    {
        Self::field_with(name, Dependency::of::<D>(), assign)
    }

    /// 字段注入点，未绑定时字段类型可以即时构造
    pub fn injectable_field<D, F>(name: impl Into<String>, assign: F) -> Self
    where
        D: Injectable,
        F: Fn(&mut T, Arc<D>) + Send + Sync + 'static,
    {
        Self::field_with(name, Dependency::injectable::<D>(), assign)
    }

    fn field_with<D, F>(name: impl Into<String>, dependency: Dependency, assign: F) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
        F: Fn(&mut T, Arc<D>) + Send + Sync + 'static,
    {
        Self {
            kind: MemberKind::Field,
            name: name.into(),
            dependencies: vec![dependency],
            optional: false,
            action: Action::Inject(Arc::new(move |target: &mut T, arguments: &mut Arguments| {
                assign(target, arguments.next::<D>()?);
                Ok(())
            })),
        }
    }

    /// 方法注入点，参数通过 `param` 系列方法按顺序声明
    pub fn method<F>(name: impl Into<String>, invoke: F) -> Self
    where
        F: Fn(&mut T, &mut Arguments) -> InjectionResult<()> + Send + Sync + 'static,
    {
        Self {
            kind: MemberKind::Method,
            name: name.into(),
            dependencies: Vec::new(),
            optional: false,
            action: Action::Inject(Arc::new(invoke)),
        }
    }

    /// 静态字段注入点，只在静态注入时执行
    pub fn static_field<D, F>(name: impl Into<String>, assign: F) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<D>) + Send + Sync + 'static,
    {
        Self {
            kind: MemberKind::Field,
            name: name.into(),
            dependencies: vec![Dependency::of::<D>()],
            optional: false,
            action: Action::Static(Arc::new(move |arguments: &mut Arguments| {
                assign(arguments.next::<D>()?);
                Ok(())
            })),
        }
    }

    /// 静态方法注入点，只在静态注入时执行
    pub fn static_method<F>(name: impl Into<String>, invoke: F) -> Self
    where
        F: Fn(&mut Arguments) -> InjectionResult<()> + Send + Sync + 'static,
    {
        Self {
            kind: MemberKind::Method,
            name: name.into(),
            dependencies: Vec::new(),
            optional: false,
            action: Action::Static(Arc::new(invoke)),
        }
    }

    /// 追加一个只能通过显式绑定满足的参数
    pub fn param<D: ?Sized + 'static>(self) -> Self {
        self.dependency(Dependency::of::<D>())
    }

    /// 追加一个可即时构造的参数
    pub fn injectable_param<D: Injectable>(self) -> Self {
        self.dependency(Dependency::injectable::<D>())
    }

    /// 追加一个名称限定的参数
    pub fn named_param<D: ?Sized + 'static>(self, name: impl Into<String>) -> Self {
        self.dependency(Dependency::of::<D>().qualified(Qualifier::named(name)))
    }

    /// 追加一个注解限定的参数
    pub fn annotated_param<D: ?Sized + 'static, A: ?Sized + 'static>(self) -> Self {
        self.dependency(Dependency::of::<D>().qualified(Qualifier::annotation::<A>()))
    }

    /// 追加任意依赖
    pub fn dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// 为最后一个依赖加上名称限定（字段注入时即字段本身）
    pub fn named(self, name: impl Into<String>) -> Self {
        self.qualify_last(Qualifier::named(name))
    }

    /// 为最后一个依赖加上注解限定
    pub fn annotated_with<A: ?Sized + 'static>(self) -> Self {
        self.qualify_last(Qualifier::annotation::<A>())
    }

    fn qualify_last(mut self, qualifier: Qualifier) -> Self {
        if let Some(last) = self.dependencies.pop() {
            self.dependencies.push(last.qualified(qualifier));
        }
        self
    }

    /// 标记为可选注入点
    ///
    /// 构造函数上的可选标记会在目录构建时报错。
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// 把内嵌类型的成员提升为外层类型的成员
    ///
    /// 构造函数无法提升，返回 `None`。
    pub fn project<U: Send + Sync + 'static>(
        self,
        inner: fn(&mut U) -> &mut T,
    ) -> Option<MemberDescriptor<U>> {
        let action = match self.action {
            Action::Construct(_) => return None,
            Action::Inject(inject) => Action::Inject(Arc::new(
                move |outer: &mut U, arguments: &mut Arguments| inject(inner(outer), arguments),
            ) as InjectFn<U>),
            Action::Static(invoke) => Action::Static(invoke),
        };
        Some(MemberDescriptor {
            kind: self.kind,
            name: self.name,
            dependencies: self.dependencies,
            optional: self.optional,
            action,
        })
    }

    /// 擦除类型，交给注入点目录使用
    pub fn into_raw(self) -> RawMember {
        let type_info = TypeInfo::of::<T>();
        let action = match self.action {
            Action::Construct(construct) => {
                RawAction::Construct(Arc::new(move |arguments: &mut Arguments| {
                    let value = construct(arguments)?;
                    Ok(Box::new(value) as Box<dyn Any + Send + Sync>)
                }))
            }
            Action::Inject(inject) => RawAction::Inject(Arc::new(
                move |target: &mut (dyn Any + Send + Sync), arguments: &mut Arguments| {
                    let target = target.downcast_mut::<T>().ok_or_else(|| {
                        ConfigurationError::TypeMismatch {
                            expected: type_info.to_string(),
                            actual: "injection target".to_string(),
                        }
                    })?;
                    inject(target, arguments)
                },
            )),
            Action::Static(invoke) => RawAction::Static(invoke),
        };
        RawMember {
            kind: self.kind,
            name: self.name,
            dependencies: self.dependencies,
            optional: self.optional,
            action,
        }
    }
}

impl<T> fmt::Debug for MemberDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("optional", &self.optional)
            .finish()
    }
}

/// 类型擦除后的构造函数
pub type RawConstructFn =
    Arc<dyn Fn(&mut Arguments) -> InjectionResult<Box<dyn Any + Send + Sync>> + Send + Sync>;

/// 类型擦除后的实例成员注入函数
pub type RawInjectFn = Arc<
    dyn Fn(&mut (dyn Any + Send + Sync), &mut Arguments) -> InjectionResult<()> + Send + Sync,
>;

/// 类型擦除后的成员动作
#[derive(Clone)]
pub enum RawAction {
    Construct(RawConstructFn),
    Inject(RawInjectFn),
    Static(RawStaticFn),
}

/// 类型擦除后的成员描述
#[derive(Clone)]
pub struct RawMember {
    pub kind: MemberKind,
    pub name: String,
    pub dependencies: Vec<Dependency>,
    pub optional: bool,
    pub action: RawAction,
}

impl RawMember {
    /// 是否为静态成员
    pub fn is_static(&self) -> bool {
        matches!(self.action, RawAction::Static(_))
    }
}

impl fmt::Debug for RawMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawMember")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("optional", &self.optional)
            .field("static", &self.is_static())
            .finish()
    }
}

/// 可注入类型的类型擦除描述
///
/// 只包含函数指针，可以随意复制，并作为即时构造配方附在依赖上。
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    type_info: fn() -> TypeInfo,
    members: fn() -> Vec<RawMember>,
    wrap: fn(Box<dyn Any + Send + Sync>) -> InjectionResult<Instance>,
}

impl TypeDescriptor {
    pub fn of<T: Injectable>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>,
            members: raw_members_of::<T>,
            wrap: wrap_boxed::<T>,
        }
    }

    pub fn type_info(&self) -> TypeInfo {
        (self.type_info)()
    }

    /// 读取原始成员描述
    pub fn raw_members(&self) -> Vec<RawMember> {
        (self.members)()
    }

    /// 把构造函数产出的值包装为共享实例
    pub fn wrap(&self, value: Box<dyn Any + Send + Sync>) -> InjectionResult<Instance> {
        (self.wrap)(value)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeDescriptor")
            .field(&self.type_info().name)
            .finish()
    }
}

fn raw_members_of<T: Injectable>() -> Vec<RawMember> {
    T::members()
        .into_iter()
        .map(MemberDescriptor::into_raw)
        .collect()
}

fn wrap_boxed<T: Injectable>(value: Box<dyn Any + Send + Sync>) -> InjectionResult<Instance> {
    value
        .downcast::<T>()
        .map(|value| Instance::new(Arc::<T>::from(value)))
        .map_err(|_| ConfigurationError::TypeMismatch {
            expected: TypeInfo::of::<T>().to_string(),
            actual: "constructed value".to_string(),
        })
}
