use crate::common::context_with;
use asupersync_authctx::config::ConfigurationLifecycle;
use asupersync_authctx::security::{AuthContext, ComparisonOutcome, SharedAuthContext};
use std::sync::{Arc, Barrier};
use std::thread;

const READERS: usize = 8;

fn populated() -> SharedAuthContext {
    let mut root = context_with(&[("transport_security_type", "ssl"), ("x509_common_name", "svc")]);
    assert!(root.set_peer_identity_property_name("x509_common_name"));
    let mut leaf = AuthContext::with_parent(root.into_shared());
    for i in 0..64 {
        leaf.add_property("token_scope", format!("scope-{i}"));
    }
    leaf.add_property("x509_common_name", "svc-alias");
    assert!(leaf.set_peer_identity_property_name("x509_common_name"));
    leaf.set_protocol("ssl");
    leaf.into_shared()
}

#[test]
fn concurrent_readers_see_identical_sequences() {
    let ctx = populated();
    let expected: Vec<Vec<u8>> = ctx
        .property_iterator()
        .map(|p| p.value().to_vec())
        .collect();
    let barrier = Arc::new(Barrier::new(READERS));

    let handles: Vec<_> = (0..READERS)
        .map(|_| {
            let ctx = ctx.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..50 {
                    assert_eq!(ctx.peer_identity().count(), 2);
                    assert_eq!(ctx.property_iterator().count(), 67);
                }
                ctx.property_iterator()
                    .map(|p| p.value().to_vec())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("reader panicked"), expected);
    }
    assert_eq!(SharedAuthContext::strong_count(&ctx), 1);
}

#[test]
fn concurrent_comparisons_share_one_registry() {
    let registry = ConfigurationLifecycle::with_builtin_comparators().comparator_registry();
    let one = populated();
    let two = populated();
    let barrier = Arc::new(Barrier::new(READERS));

    let handles: Vec<_> = (0..READERS)
        .map(|_| {
            let (one, two) = (one.clone(), two.clone());
            let registry = registry.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..100)
                    .map(|_| one.compare_auth_context(&two, &registry))
                    .all(|o| o == ComparisonOutcome::Equal)
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().expect("comparer panicked"));
    }
}

#[test]
fn lifecycle_get_is_safe_from_many_threads() {
    let lifecycle = Arc::new(ConfigurationLifecycle::with_builtin_comparators());
    let handles: Vec<_> = (0..READERS)
        .map(|_| {
            let lifecycle = Arc::clone(&lifecycle);
            thread::spawn(move || lifecycle.comparator_registry().contains("ssl"))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().expect("lookup panicked"));
    }
    assert!(lifecycle.is_built());
}
