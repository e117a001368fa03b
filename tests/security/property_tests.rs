use asupersync_authctx::security::AuthContext;
use proptest::prelude::*;

fn prop_strategy() -> impl Strategy<Value = Vec<(u8, Vec<u8>)>> {
    // Small name alphabet so by-name filters actually match.
    prop::collection::vec((0u8..4, prop::collection::vec(any::<u8>(), 0..8)), 0..12)
}

fn name(n: u8) -> Vec<u8> {
    format!("n{n}").into_bytes()
}

fn build_chain(levels: &[Vec<(u8, Vec<u8>)>]) -> Option<AuthContext> {
    let mut current: Option<AuthContext> = None;
    for level in levels {
        let mut ctx = AuthContext::from_parent(current.take().map(AuthContext::into_shared));
        for (n, v) in level {
            ctx.add_property(name(*n), v.clone());
        }
        current = Some(ctx);
    }
    current
}

proptest! {
    /// Iterating a chain equals concatenating each level's own store,
    /// outermost first.
    #[test]
    fn chain_iteration_is_level_concatenation(levels in prop::collection::vec(prop_strategy(), 1..5)) {
        let ctx = build_chain(&levels).expect("at least one level");
        let expected: Vec<(Vec<u8>, Vec<u8>)> = levels
            .iter()
            .rev()
            .flat_map(|level| level.iter().map(|(n, v)| (name(*n), v.clone())))
            .collect();
        let actual: Vec<(Vec<u8>, Vec<u8>)> = ctx
            .property_iterator()
            .map(|p| (p.name().to_vec(), p.value().to_vec()))
            .collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(ctx.chain_depth(), levels.len());
    }

    /// A by-name walk is the filtered full walk.
    #[test]
    fn by_name_is_filtered_full_walk(levels in prop::collection::vec(prop_strategy(), 1..4), n in 0u8..5) {
        let ctx = build_chain(&levels).expect("at least one level");
        let wanted = name(n);
        let filtered: Vec<_> = ctx
            .property_iterator()
            .filter(|p| p.name() == wanted.as_slice())
            .collect();
        let by_name: Vec<_> = ctx.find_properties_by_name(&wanted).collect();
        prop_assert_eq!(by_name, filtered);
    }

    /// Designation succeeds exactly when the name is in the context's own store.
    #[test]
    fn designation_requires_own_property(levels in prop::collection::vec(prop_strategy(), 1..4), n in 0u8..5) {
        let mut ctx = build_chain(&levels).expect("at least one level");
        let wanted = name(n);
        let own = levels.last().unwrap().iter().any(|(m, _)| *m == n);
        prop_assert_eq!(ctx.set_peer_identity_property_name(&wanted), own);
        prop_assert_eq!(ctx.is_peer_authenticated(), own);
    }
}
