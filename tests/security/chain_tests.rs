use crate::common::{context_with, pair};
use asupersync_authctx::security::{AuthContext, SharedAuthContext};

fn chained() -> (SharedAuthContext, AuthContext) {
    let parent = context_with(&[("name", "padapo"), ("foo", "baz")]).into_shared();
    let mut child = AuthContext::with_parent(parent.clone());
    child.add_property("name", "chapi");
    child.add_property("name", "chap0");
    child.add_property("foo", "bar");
    assert!(child.set_peer_identity_property_name("name"));
    (parent, child)
}

#[test]
fn chained_property_iterator_visits_child_then_parent() {
    let (parent, child) = chained();
    assert_eq!(child.peer_identity_property_name(), Some(&b"name"[..]));

    let mut it = child.property_iterator();
    for expected in child.properties() {
        assert!(std::ptr::eq(it.next().unwrap(), expected));
    }
    for expected in parent.properties() {
        assert!(std::ptr::eq(it.next().unwrap(), expected));
    }
    assert!(it.next().is_none());
}

#[test]
fn chained_find_by_name_continues_into_parent() {
    let (parent, child) = chained();
    let mut it = child.find_properties_by_name("foo");
    assert!(std::ptr::eq(it.next().unwrap(), &child.properties().as_slice()[2]));
    assert!(std::ptr::eq(it.next().unwrap(), &parent.properties().as_slice()[1]));
    assert!(it.next().is_none());
}

#[test]
fn chained_peer_identity_spans_the_chain() {
    let (_parent, child) = chained();
    let ids: Vec<_> = child.peer_identity().map(pair).collect();
    assert_eq!(
        ids,
        [("name", "chapi"), ("name", "chap0"), ("name", "padapo")]
    );
    let mut it = child.peer_identity();
    while it.next().is_some() {}
    assert!(it.next().is_none());
}

#[test]
fn own_store_excludes_ancestors() {
    let (parent, child) = chained();
    assert_eq!(child.properties().count(), 3);
    assert_eq!(parent.properties().count(), 2);
    assert_eq!(child.property_iterator().count(), 5);
    assert_eq!(child.chain_depth(), 2);
}

#[test]
fn parent_peer_identity_designation_is_not_inherited() {
    let mut root = context_with(&[("x509_common_name", "root")]);
    assert!(root.set_peer_identity_property_name("x509_common_name"));
    let child = AuthContext::with_parent(root.into_shared());
    assert!(child.peer_identity_property_name().is_none());
    assert!(child.peer_identity().next().is_none());
    assert_eq!(child.find_properties_by_name("x509_common_name").count(), 1);
}

#[test]
fn three_level_chain_orders_innermost_last() {
    let root = context_with(&[("layer", "transport")]).into_shared();
    let mut middle = AuthContext::with_parent(root);
    middle.add_property("layer", "channel");
    let mut top = AuthContext::with_parent(middle.into_shared());
    top.add_property("layer", "call");

    let layers: Vec<_> = top
        .find_properties_by_name("layer")
        .filter_map(|p| p.value_str())
        .collect();
    assert_eq!(layers, ["call", "channel", "transport"]);
    assert_eq!(top.chain_depth(), 3);
}

#[test]
fn parent_outlives_child_when_shared_elsewhere() {
    let (parent, child) = chained();
    assert_eq!(SharedAuthContext::strong_count(&parent), 2);
    drop(child);
    assert_eq!(SharedAuthContext::strong_count(&parent), 1);
    assert_eq!(parent.property_iterator().count(), 2);
}
