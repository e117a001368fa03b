use crate::common::context_with;
use asupersync_authctx::config::ConfigurationLifecycle;
use asupersync_authctx::security::{AuthContext, ComparisonOutcome};

const PROTOCOL: &str = "baz";

/// Test comparator: the first `foo` values must match.
fn first_foo_equal(one: &AuthContext, two: &AuthContext) -> bool {
    let a = one.find_properties_by_name("foo").next();
    let b = two.find_properties_by_name("foo").next();
    matches!((a, b), (Some(a), Some(b)) if a.value() == b.value())
}

fn lifecycle() -> ConfigurationLifecycle {
    let lifecycle = ConfigurationLifecycle::new();
    lifecycle.register_ephemeral_builder(|builder| {
        builder
            .auth_context_comparator_registry()
            .register_comparator(PROTOCOL, first_foo_equal);
    });
    lifecycle
}

fn with_protocol(mut ctx: AuthContext, protocol: &str) -> AuthContext {
    ctx.set_protocol(protocol);
    ctx
}

#[test]
fn compare_equal_props_is_equal() {
    let registry = lifecycle().comparator_registry();
    let one = with_protocol(context_with(&[("foo", "bar")]), PROTOCOL);
    let two = with_protocol(context_with(&[("foo", "bar")]), PROTOCOL);
    let outcome = one.compare_auth_context(&two, &registry);
    assert_eq!(outcome, ComparisonOutcome::Equal);
    assert_eq!(outcome.as_option(), Some(true));
}

#[test]
fn compare_unequal_props_is_not_equal() {
    let registry = lifecycle().comparator_registry();
    let one = with_protocol(context_with(&[("foo", "bar")]), PROTOCOL);
    let two = with_protocol(context_with(&[("foo", "baz")]), PROTOCOL);
    let outcome = one.compare_auth_context(&two, &registry);
    assert_eq!(outcome, ComparisonOutcome::NotEqual);
    assert_eq!(outcome.as_option(), Some(false));
}

#[test]
fn compare_without_protocol_is_undetermined() {
    let registry = lifecycle().comparator_registry();
    let one = AuthContext::new();
    let two = AuthContext::new();
    let outcome = one.compare_auth_context(&two, &registry);
    assert_eq!(outcome, ComparisonOutcome::Undetermined);
    assert_eq!(outcome.as_option(), None);
    assert_ne!(outcome, ComparisonOutcome::NotEqual);
}

#[test]
fn compare_with_unregistered_protocol_is_undetermined() {
    let registry = lifecycle().comparator_registry();
    let one = with_protocol(AuthContext::new(), "NO_COMPARATOR_SET");
    let two = with_protocol(AuthContext::new(), "NO_COMPARATOR_SET");
    let outcome = one.compare_auth_context(&two, &registry);
    assert_eq!(outcome, ComparisonOutcome::Undetermined);
    assert!(!outcome.is_determined());
}

#[test]
fn compare_with_one_sided_protocol_is_undetermined() {
    let registry = lifecycle().comparator_registry();
    let one = with_protocol(context_with(&[("foo", "bar")]), PROTOCOL);
    let two = context_with(&[("foo", "bar")]);
    assert_eq!(
        one.compare_auth_context(&two, &registry),
        ComparisonOutcome::Undetermined
    );
    assert_eq!(
        two.compare_auth_context(&one, &registry),
        ComparisonOutcome::Undetermined
    );
}

#[test]
fn comparator_sees_the_whole_chain() {
    let registry = lifecycle().comparator_registry();
    let parent = context_with(&[("foo", "bar")]).into_shared();
    let layered = with_protocol(AuthContext::with_parent(parent), PROTOCOL);
    let flat = with_protocol(context_with(&[("foo", "bar")]), PROTOCOL);
    assert_eq!(
        layered.compare_auth_context(&flat, &registry),
        ComparisonOutcome::Equal
    );
}

#[test]
fn ephemeral_comparator_is_gone_after_reset() {
    let lifecycle = lifecycle();
    let one = with_protocol(context_with(&[("foo", "bar")]), PROTOCOL);
    let two = with_protocol(context_with(&[("foo", "bar")]), PROTOCOL);
    let held = lifecycle.comparator_registry();

    lifecycle.reset();
    assert_eq!(
        one.compare_auth_context(&two, &lifecycle.comparator_registry()),
        ComparisonOutcome::Undetermined
    );
    // A registry obtained before the reset keeps working.
    assert_eq!(one.compare_auth_context(&two, &held), ComparisonOutcome::Equal);
}
