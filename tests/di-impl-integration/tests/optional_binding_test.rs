//! 可选注入集成测试
//!
//! 对 get_instance、inject_members、预置实例、提供者实例和提供者类型五种注入方式，
//! 分别验证依赖全部绑定、部分绑定和完全未绑定时的行为。

use di_abstractions::{Binder, BinderExt, Injectable, InjectorExt, MemberDescriptor};
use di_impl::{Container, ContainerBuilder};
use di_impl_integration_tests::*;
use infrastructure_common::ConfigurationError;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn container(modules: &[&dyn di_abstractions::Module]) -> Container {
    Container::create(modules).unwrap()
}

#[test]
fn everything_injector_get_instance() {
    container(&[&everything_module])
        .get_instance::<HasOptionalInjections>()
        .unwrap()
        .assert_everything_injected();
}

#[test]
fn partial_injector_get_instance() {
    container(&[&partial_module])
        .get_instance::<HasOptionalInjections>()
        .unwrap()
        .assert_nothing_injected();
}

#[test]
fn nothing_injector_get_instance() {
    container(&[])
        .get_instance::<HasOptionalInjections>()
        .unwrap()
        .assert_nothing_injected();
}

#[test]
fn everything_injector_inject_members() {
    let mut instance = HasOptionalInjections::new();
    container(&[&everything_module])
        .inject_members(&mut instance)
        .unwrap();
    instance.assert_everything_injected();
}

#[test]
fn partial_injector_inject_members() {
    let mut instance = HasOptionalInjections::new();
    container(&[&partial_module])
        .inject_members(&mut instance)
        .unwrap();
    instance.assert_nothing_injected();
}

#[test]
fn nothing_injector_inject_members() {
    let mut instance = HasOptionalInjections::new();
    container(&[]).inject_members(&mut instance).unwrap();
    instance.assert_nothing_injected();
}

#[test]
fn everything_injector_to_instance() {
    container(&[&everything_module, &to_instance_module])
        .get_instance::<HasOptionalInjections>()
        .unwrap()
        .assert_everything_injected();
}

#[test]
fn partial_injector_to_instance() {
    container(&[&partial_module, &to_instance_module])
        .get_instance::<HasOptionalInjections>()
        .unwrap()
        .assert_nothing_injected();
}

#[test]
fn nothing_injector_to_instance() {
    container(&[&to_instance_module])
        .get_instance::<HasOptionalInjections>()
        .unwrap()
        .assert_nothing_injected();
}

#[test]
fn everything_injector_to_provider_instance() {
    container(&[&everything_module, &to_provider_instance_module])
        .get_instance::<HasOptionalInjections>()
        .unwrap()
        .assert_everything_injected();
}

#[test]
fn partial_injector_to_provider_instance() {
    container(&[&partial_module, &to_provider_instance_module])
        .get_instance::<HasOptionalInjections>()
        .unwrap()
        .assert_nothing_injected();
}

#[test]
fn nothing_injector_to_provider_instance() {
    container(&[&to_provider_instance_module])
        .get_instance::<HasOptionalInjections>()
        .unwrap()
        .assert_nothing_injected();
}

#[test]
fn everything_injector_to_provider() {
    container(&[&everything_module, &to_provider_module])
        .get_instance::<HasOptionalInjections>()
        .unwrap()
        .assert_everything_injected();
}

#[test]
fn partial_injector_to_provider() {
    container(&[&partial_module, &to_provider_module])
        .get_instance::<HasOptionalInjections>()
        .unwrap()
        .assert_nothing_injected();
}

#[test]
fn nothing_injector_to_provider() {
    container(&[&to_provider_module])
        .get_instance::<HasOptionalInjections>()
        .unwrap()
        .assert_nothing_injected();
}

#[test]
fn to_instance_members_are_injected_once_at_build() {
    let container = container(&[&everything_module, &to_instance_module]);
    let first = container.get_instance::<HasOptionalInjections>().unwrap();
    let second = container.get_instance::<HasOptionalInjections>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn optional_constructor_blows_up() {
    let error = container(&[])
        .get_instance::<HasOptionalConstructor>()
        .err()
        .expect("optional constructor must be rejected");
    assert!(error
        .message()
        .contains("optional injection is not allowed on constructors"));

    // 失败不缓存，再次请求报告同一个错误
    let again = container(&[])
        .get_instance::<HasOptionalConstructor>()
        .err()
        .expect("optional constructor must be rejected again");
    assert_eq!(error, again);
}

#[test]
fn qualified_optional_points_never_fall_back_to_unqualified_bindings() {
    let module = |binder: &mut dyn Binder| {
        binder
            .bind::<dyn E>()
            .to_instance(Arc::clone(&*INJECT_E));
    };
    let instance = container(&[&module])
        .get_instance::<HasOptionalInjections>()
        .unwrap();
    assert!(instance.e.is_none());
    assert!(!instance.invoked_annotated);
}

/// 构造时需要 `A`
struct NeedsA {
    a: Arc<dyn A>,
}

impl Injectable for NeedsA {
    fn members() -> Vec<MemberDescriptor<Self>> {
        vec![MemberDescriptor::constructor(|arguments| {
            Ok(NeedsA {
                a: arguments.next::<dyn A>()?,
            })
        })
        .param::<dyn A>()]
    }
}

/// 可选方法的参数只能即时构造
#[derive(Default)]
struct Holder {
    needs_a: Option<Arc<NeedsA>>,
    invoked: bool,
}

impl Injectable for Holder {
    fn members() -> Vec<MemberDescriptor<Self>> {
        vec![
            MemberDescriptor::constructor(|_| Ok(Holder::default())),
            MemberDescriptor::method("set_needs_a", |target: &mut Self, arguments| {
                target.needs_a = Some(arguments.next::<NeedsA>()?);
                target.invoked = true;
                Ok(())
            })
            .injectable_param::<NeedsA>()
            .optional(),
        ]
    }
}

#[test]
fn optional_point_skips_unbuildable_just_in_time_dependency() {
    let nothing = container(&[]);
    let holder = nothing.get_instance::<Holder>().unwrap();
    assert!(!holder.invoked);
    assert!(holder.needs_a.is_none());

    let mut existing = Holder::default();
    nothing.inject_members(&mut existing).unwrap();
    assert!(!existing.invoked);

    let holder = container(&[&everything_module])
        .get_instance::<Holder>()
        .unwrap();
    assert!(holder.invoked);
    let needs_a = holder.needs_a.as_ref().unwrap();
    assert!(Arc::ptr_eq(&needs_a.a, &*INJECT_A));
}

#[test]
fn plain_instance_bindings_are_provided_as_is() {
    let module = |binder: &mut dyn Binder| {
        binder
            .bind::<HasOptionalInjections>()
            .to_instance(Arc::new(HasOptionalInjections::new()));
    };
    let instance = container(&[&everything_module, &module])
        .get_instance::<HasOptionalInjections>()
        .unwrap();
    assert!(Arc::ptr_eq(&instance.original_a, &instance.a));
    assert!(!instance.invoked0);
    assert!(instance.b.is_none());
}

static STATIC_INJECT_A: Lazy<RwLock<Option<Arc<dyn A>>>> = Lazy::new(|| RwLock::new(None));

/// 只有一个可选静态字段
struct StaticOptionalA;

impl Injectable for StaticOptionalA {
    fn members() -> Vec<MemberDescriptor<Self>> {
        vec![
            MemberDescriptor::static_field::<dyn A, _>("static_inject_a", |a| {
                *STATIC_INJECT_A.write() = Some(a);
            })
            .optional(),
        ]
    }
}

#[test]
fn unsatisfied_optional_static_injection_keeps_the_current_value() {
    *STATIC_INJECT_A.write() = Some(Arc::clone(&*INJECT_A));
    ContainerBuilder::new()
        .request_static_injection::<StaticOptionalA>()
        .build()
        .unwrap();
    let current = STATIC_INJECT_A.read().clone().unwrap();
    assert!(Arc::ptr_eq(&current, &*INJECT_A));
}

static STATIC_RUNS: AtomicUsize = AtomicUsize::new(0);
static STATIC_B: Lazy<RwLock<Option<Arc<dyn B>>>> = Lazy::new(|| RwLock::new(None));

/// 静态方法注入，记录执行次数
struct CountingStatics;

impl Injectable for CountingStatics {
    fn members() -> Vec<MemberDescriptor<Self>> {
        vec![MemberDescriptor::static_method("configure", |arguments| {
            *STATIC_B.write() = Some(arguments.next::<dyn B>()?);
            STATIC_RUNS.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .param::<dyn B>()]
    }
}

#[test]
fn static_injection_runs_once_per_container() {
    let before = STATIC_RUNS.load(Ordering::SeqCst);
    let container = ContainerBuilder::new()
        .install(everything_module)
        .request_static_injection::<CountingStatics>()
        .install(|binder: &mut dyn Binder| {
            binder.request_static_injection::<CountingStatics>();
        })
        .build()
        .unwrap();

    assert_eq!(STATIC_RUNS.load(Ordering::SeqCst), before + 1);
    assert_eq!(container.stats().static_targets, 1);
    let injected = STATIC_B.read().clone().unwrap();
    assert!(Arc::ptr_eq(&injected, &*INJECT_B));

    container.get_instance::<HasOptionalInjections>().unwrap();
    assert_eq!(STATIC_RUNS.load(Ordering::SeqCst), before + 1);
}

/// 必需的静态依赖缺失
struct RequiredStatic;

impl Injectable for RequiredStatic {
    fn members() -> Vec<MemberDescriptor<Self>> {
        vec![MemberDescriptor::static_field::<dyn D, _>("d", |_| {})]
    }
}

#[test]
fn missing_static_dependency_aborts_construction() {
    let error = ContainerBuilder::new()
        .request_static_injection::<RequiredStatic>()
        .build()
        .unwrap_err();
    let ConfigurationError::StaticInjection { type_name, source } = error else {
        panic!("expected a static injection error");
    };
    assert!(type_name.contains("RequiredStatic"));
    assert!(matches!(*source, ConfigurationError::MissingBinding { .. }));
}
