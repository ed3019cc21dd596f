//! 注入点目录
//!
//! 按类型缓存校验过的注入点列表。目录只在第一次需要时构建，构建失败不缓存，
//! 之后的每次请求都会重新报告同一个配置错误。

use dashmap::DashMap;
use di_abstractions::{
    Dependency, MemberKind, RawConstructFn, RawInjectFn, RawMember, RawAction, RawStaticFn,
    TypeDescriptor,
};
use infrastructure_common::{ConfigurationError, InjectionResult, TypeInfo};
use std::any::TypeId;
use std::sync::Arc;
use tracing::debug;

/// 构造函数注入点
#[derive(Clone)]
pub struct ConstructorPoint {
    pub dependencies: Vec<Dependency>,
    pub(crate) construct: RawConstructFn,
}

/// 实例成员注入点
#[derive(Clone)]
pub struct InjectionPoint {
    pub kind: MemberKind,
    pub name: String,
    pub dependencies: Vec<Dependency>,
    pub optional: bool,
    pub(crate) inject: RawInjectFn,
}

/// 静态成员注入点
#[derive(Clone)]
pub struct StaticPoint {
    pub kind: MemberKind,
    pub name: String,
    pub dependencies: Vec<Dependency>,
    pub optional: bool,
    pub(crate) invoke: RawStaticFn,
}

/// 单个类型的注入点目录
pub struct TypeCatalog {
    pub type_info: TypeInfo,
    pub constructor: Option<ConstructorPoint>,
    /// 字段在前，方法在后，同类保持声明顺序
    pub instance_points: Vec<InjectionPoint>,
    pub static_points: Vec<StaticPoint>,
}

impl TypeCatalog {
    /// 从原始成员描述构建并校验目录
    pub fn build(descriptor: &TypeDescriptor) -> InjectionResult<Self> {
        let type_info = descriptor.type_info();
        let mut constructors = Vec::new();
        let mut instance_points = Vec::new();
        let mut static_points = Vec::new();

        for member in descriptor.raw_members() {
            let RawMember {
                kind,
                name,
                dependencies,
                optional,
                action,
            } = member;
            match action {
                RawAction::Construct(construct) => {
                    if optional {
                        return Err(ConfigurationError::OptionalConstructor {
                            type_name: type_info.to_string(),
                        });
                    }
                    constructors.push(ConstructorPoint {
                        dependencies,
                        construct,
                    });
                }
                RawAction::Inject(inject) => instance_points.push(InjectionPoint {
                    kind,
                    name,
                    dependencies,
                    optional,
                    inject,
                }),
                RawAction::Static(invoke) => static_points.push(StaticPoint {
                    kind,
                    name,
                    dependencies,
                    optional,
                    invoke,
                }),
            }
        }

        if constructors.len() > 1 {
            return Err(ConfigurationError::MultipleConstructors {
                type_name: type_info.to_string(),
                count: constructors.len(),
            });
        }

        // 稳定排序：字段先于方法
        instance_points.sort_by_key(|point| point.kind);
        static_points.sort_by_key(|point| point.kind);

        Ok(Self {
            type_info,
            constructor: constructors.pop(),
            instance_points,
            static_points,
        })
    }

    /// 是否声明了构造函数注入点
    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }
}

impl std::fmt::Debug for TypeCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeCatalog")
            .field("type_info", &self.type_info)
            .field("constructible", &self.is_constructible())
            .field(
                "instance_points",
                &self
                    .instance_points
                    .iter()
                    .map(|point| point.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("static_points", &self.static_points.len())
            .finish()
    }
}

/// 注入点目录缓存
#[derive(Default)]
pub struct InjectionPointCatalog {
    cache: DashMap<TypeId, Arc<TypeCatalog>>,
}

impl InjectionPointCatalog {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取类型的注入点目录，首次访问时构建
    pub fn points_for(&self, descriptor: &TypeDescriptor) -> InjectionResult<Arc<TypeCatalog>> {
        let type_id = descriptor.type_info().id;
        if let Some(catalog) = self.cache.get(&type_id) {
            return Ok(Arc::clone(catalog.value()));
        }

        // 在 map 锁之外构建，并发构建时保留先写入者
        let catalog = Arc::new(TypeCatalog::build(descriptor)?);
        debug!(
            "构建注入点目录: {} ({} 个实例成员, {} 个静态成员)",
            catalog.type_info,
            catalog.instance_points.len(),
            catalog.static_points.len()
        );
        let entry = self.cache.entry(type_id).or_insert(catalog);
        Ok(Arc::clone(entry.value()))
    }

    /// 已缓存的目录数量
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
