use asupersync_authctx::security::{AuthContext, Extension};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct SampleExtension {
    drops: Arc<AtomicUsize>,
}

impl Drop for SampleExtension {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

fn sample(drops: &Arc<AtomicUsize>) -> SampleExtension {
    SampleExtension {
        drops: Arc::clone(drops),
    }
}

#[test]
fn extension_destroyed_once_with_last_reference() {
    let drops = Arc::new(AtomicUsize::new(0));
    let mut ctx = AuthContext::new();
    ctx.set_extension(Extension::new(sample(&drops)));

    let shared = ctx.into_shared();
    let call_ref = shared.clone();
    drop(shared);
    assert_eq!(drops.load(Ordering::SeqCst), 0);
    assert!(call_ref.extension_ref::<SampleExtension>().is_some());

    drop(call_ref);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn parent_extension_destroyed_when_chain_released() {
    let drops = Arc::new(AtomicUsize::new(0));
    let mut root = AuthContext::new();
    root.set_extension_value(sample(&drops));
    let mut leaf = AuthContext::with_parent(root.into_shared());
    leaf.set_extension_value(sample(&drops));

    let leaf = leaf.into_shared();
    assert_eq!(drops.load(Ordering::SeqCst), 0);
    drop(leaf);
    assert_eq!(drops.load(Ordering::SeqCst), 2);
}

#[test]
fn replacing_extension_destroys_previous() {
    let drops = Arc::new(AtomicUsize::new(0));
    let mut ctx = AuthContext::new();
    ctx.set_extension_value(sample(&drops));
    ctx.set_extension_value(sample(&drops));
    assert_eq!(drops.load(Ordering::SeqCst), 1);
    drop(ctx);
    assert_eq!(drops.load(Ordering::SeqCst), 2);
}

#[test]
fn taken_extension_outlives_context() {
    let drops = Arc::new(AtomicUsize::new(0));
    let mut ctx = AuthContext::new();
    ctx.set_extension_value(sample(&drops));
    let ext = ctx.take_extension().expect("extension set");
    drop(ctx);
    assert_eq!(drops.load(Ordering::SeqCst), 0);
    assert!(ext.is::<SampleExtension>());
    drop(ext);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn extension_is_opaque_to_other_types() {
    let mut ctx = AuthContext::new();
    ctx.set_extension_value(String::from("session-cache-key"));
    assert!(ctx.extension_ref::<u64>().is_none());
    assert_eq!(
        ctx.extension_ref::<String>().map(String::as_str),
        Some("session-cache-key")
    );
    assert!(ctx.extension().unwrap().type_name().contains("String"));
}
