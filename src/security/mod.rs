//! Authentication context and comparison infrastructure.
//!
//! This module holds the facts a connection or call learned while
//! authenticating its peer, and the protocol-specific rules used to decide
//! whether two such fact sets describe the same peer.
//!
//! # Design Principles
//!
//! 1. **Facts, not policy**: contexts record what was established; they
//!    never decide whether a peer is authorized
//! 2. **Append-only**: properties are never removed or reordered
//! 3. **No ambient registry**: comparators are looked up in an explicitly
//!    passed [`ComparatorRegistry`]
//! 4. **Three-valued comparison**: "cannot determine" is never reported as
//!    "not equal"
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  SharedAuthContext (Arc)                  │
//! │  ┌─────────────────────────────────────────────────────┐ │
//! │  │                    AuthContext                      │ │
//! │  │  • PropertyStore (ordered, duplicates allowed)     │ │
//! │  │  • peer identity property name, protocol           │ │
//! │  │  • Extension (type-erased, single owner)           │ │
//! │  │  • parent ──► SharedAuthContext (lower layer)      │ │
//! │  └─────────────────────────────────────────────────────┘ │
//! │                          │                               │
//! │                          ▼                               │
//! │  ┌─────────────────────────────────────────────────────┐ │
//! │  │                 PropertyIterator                    │ │
//! │  │  • own properties, then parent's, then ...         │ │
//! │  │  • optional name filter (peer identity, by name)   │ │
//! │  └─────────────────────────────────────────────────────┘ │
//! │                          │                               │
//! │                          ▼                               │
//! │  ┌─────────────────────────────────────────────────────┐ │
//! │  │                ComparatorRegistry                   │ │
//! │  │  • protocol → AuthContextComparator                │ │
//! │  │  • Equal / NotEqual / Undetermined                 │ │
//! │  └─────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use asupersync_authctx::security::{AuthContext, ComparatorRegistry, ComparisonOutcome};
//!
//! let registry = ComparatorRegistry::builder()
//!     .register_comparator("baz", |a: &AuthContext, b: &AuthContext| {
//!         a.find_property_values("foo") == b.find_property_values("foo")
//!     })
//!     .build();
//!
//! let mut one = AuthContext::new();
//! one.add_property("foo", "bar");
//! one.set_protocol("baz");
//! let mut two = AuthContext::new();
//! two.add_property("foo", "bar");
//! two.set_protocol("baz");
//!
//! assert_eq!(one.compare_auth_context(&two, &registry), ComparisonOutcome::Equal);
//! ```

pub mod comparators;
pub mod compare;
pub mod context;
pub mod extension;
pub mod iter;
pub mod property;

pub use comparators::BuiltinComparator;
pub use compare::{
    AuthContextComparator, ComparatorRegistry, ComparatorRegistryBuilder, ComparisonOutcome,
};
pub use context::{AuthContext, SharedAuthContext};
pub use extension::Extension;
pub use iter::PropertyIterator;
pub use property::{Property, PropertyStore};
